//! # REST API
//!
//! Builds the axum router that exposes the node's HTTP interface.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                          |
//! |--------|-------------------------------|--------------------------------------|
//! | GET    | `/health`                     | Liveness probe                       |
//! | GET    | `/status`                     | Node version and network profile     |
//! | GET    | `/identities/:id/registration` | Registration status of an identity  |

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use idreg_protocol::identity::IdentityAddress;
use idreg_protocol::network::{NetworkDefinition, NetworkProfile};
use idreg_protocol::registration::RegistrationStatusResolver;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone; everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// Network profile the node was started with.
    pub network: NetworkProfile,
    /// Resolves registration status for `/identities/:id/registration`.
    pub resolver: Arc<RegistrationStatusResolver>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
///
/// The returned router is ready to be served on the configured RPC port.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route(
            "/identities/:id/registration",
            get(registration_status_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Node software version.
    pub version: String,
    /// Network profile name.
    pub network: String,
    /// Endpoints of the active network profile.
    pub network_definition: NetworkDefinition,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Error body for every non-2xx response from this API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorMessage {
            message: message.into(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: liveness probe.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status`: returns node version and network profile.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        version: state.version.clone(),
        network: state.network.name().to_string(),
        network_definition: state.network.definition(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /identities/:id/registration`: registration status of one identity.
///
/// 200 with the status object, 400 when `id` is not an identity address,
/// 500 when the registry or the data provider fails.
async fn registration_status_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let identity: IdentityAddress = match id.parse() {
        Ok(identity) => identity,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid identity '{}': {}", id, e),
            )
        }
    };

    let started = Instant::now();
    let outcome = state.resolver.resolve(&identity).await;
    state.metrics.observe_lookup(&outcome, started.elapsed());

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            tracing::error!(identity = %identity, kind = e.kind(), error = %e, "registration status lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
