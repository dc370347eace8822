//! # Prometheus Metrics
//!
//! Exposes operational metrics for the node. Scraped by Prometheus at the
//! `/metrics` HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] under
//! the `idreg` namespace so they do not collide with any default global
//! registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

use idreg_protocol::registration::{RegistrationStatusResult, ResolveError};

/// Holds all Prometheus metric handles for the node.
///
/// Clone-friendly (prometheus handles are `Arc`s internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total number of registration status lookups served.
    pub registration_lookups_total: IntCounter,
    /// Lookups answered "registered".
    pub registration_lookups_registered: IntCounter,
    /// Lookups answered "unregistered" with registration data attached.
    pub registration_lookups_unregistered: IntCounter,
    /// Lookups that ended in a resolver error.
    pub registration_lookups_failed: IntCounter,
    /// Histogram of resolver latency in seconds.
    pub registration_lookup_latency_seconds: Histogram,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("idreg".into()), None)?;

        let registration_lookups_total = counter(
            &registry,
            "registration_lookups_total",
            "Total number of registration status lookups",
        )?;
        let registration_lookups_registered = counter(
            &registry,
            "registration_lookups_registered_total",
            "Lookups answered with a registered identity",
        )?;
        let registration_lookups_unregistered = counter(
            &registry,
            "registration_lookups_unregistered_total",
            "Lookups answered with registration data for an unregistered identity",
        )?;
        let registration_lookups_failed = counter(
            &registry,
            "registration_lookups_failed_total",
            "Lookups that failed in the registry or the data provider",
        )?;

        let registration_lookup_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "registration_lookup_latency_seconds",
                "Registration status resolution latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
        )?;
        registry.register(Box::new(registration_lookup_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            registration_lookups_total,
            registration_lookups_registered,
            registration_lookups_unregistered,
            registration_lookups_failed,
            registration_lookup_latency_seconds,
        })
    }

    /// Record the outcome of one resolver call.
    pub fn observe_lookup(
        &self,
        outcome: &Result<RegistrationStatusResult, ResolveError>,
        elapsed: Duration,
    ) {
        self.registration_lookups_total.inc();
        self.registration_lookup_latency_seconds
            .observe(elapsed.as_secs_f64());
        match outcome {
            Ok(RegistrationStatusResult::Registered) => self.registration_lookups_registered.inc(),
            Ok(RegistrationStatusResult::Unregistered { .. }) => {
                self.registration_lookups_unregistered.inc()
            }
            Err(_) => self.registration_lookups_failed.inc(),
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
