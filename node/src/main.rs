// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Identity Registration Node
//!
//! Entry point for the `idreg-node` binary. Parses CLI arguments, initializes
//! logging and metrics, loads identity keys, and serves the HTTP API.
//!
//! The binary supports three subcommands:
//!
//! - `run`: start the node
//! - `keygen`: generate an identity key file
//! - `version`: print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use zeroize::Zeroizing;

use idreg_protocol::crypto::IdentityKeypair;
use idreg_protocol::identity::{IdentityAddress, IdentityKeystore};
use idreg_protocol::registration::{
    InMemoryRegistry, KeystoreDataProvider, RegistrationStatusResolver,
};

use cli::{Commands, IdregNodeCli};
use metrics::NodeMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = IdregNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Keygen(args) => keygen(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the node: API server and metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "idreg_node=info,idreg_protocol=info,tower_http=debug",
        args.log_format,
    );

    let network = args.network.definition();
    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        network = %args.network,
        discovery_api = network.discovery_api_address,
        payments_contract = network.payments_contract_address,
        "starting idreg-node"
    );

    // --- Identity keys ---
    let keystore = load_keystore(&args)?;
    tracing::info!(identities = ?keystore.addresses(), "identity keystore loaded");

    // --- Registry ---
    let registry = InMemoryRegistry::with_registered(args.registered.iter().copied());

    // --- Resolver ---
    let resolver = Arc::new(RegistrationStatusResolver::new(
        Arc::new(registry),
        Arc::new(KeystoreDataProvider::new(keystore)),
    ));

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new().context("failed to register metrics")?);

    // --- Application state ---
    let app_state = api::AppState {
        version: format!(
            "{} (protocol {})",
            env!("CARGO_PKG_VERSION"),
            idreg_protocol::config::PROTOCOL_VERSION,
        ),
        network: args.network,
        resolver,
        metrics: Arc::clone(&node_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind RPC listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        res = shutdown_signal() => {
            res?;
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("idreg-node stopped");
    Ok(())
}

/// Builds the keystore from `--identity-key-file` and `--identity-key`.
fn load_keystore(args: &cli::RunArgs) -> Result<IdentityKeystore> {
    let keystore = IdentityKeystore::new();

    for path in &args.identity_key_files {
        let keypair = read_key_file(path)?;
        let address = keystore.import(keypair);
        tracing::info!(identity = %address, path = %path.display(), "identity key loaded");
    }

    for (i, hex_key) in args.identity_keys.iter().enumerate() {
        let keypair = IdentityKeypair::from_hex(hex_key)
            .with_context(|| format!("identity key #{} is not a valid secret key", i + 1))?;
        keystore.import(keypair);
    }

    if keystore.is_empty() {
        tracing::warn!("no identity keys loaded; every unregistered lookup will fail");
    }
    Ok(keystore)
}

fn read_key_file(path: &Path) -> Result<IdentityKeypair> {
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read identity key file {}", path.display()))?,
    );
    IdentityKeypair::from_hex(&contents)
        .with_context(|| format!("identity key file {} is malformed", path.display()))
}

/// Writes `keypair`'s secret to `path` with owner-only permissions.
fn write_key_file(path: &Path, keypair: &IdentityKeypair, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, keypair.to_hex().as_bytes())
        .with_context(|| format!("failed to write identity key to {}", path.display()))?;

    // Restrict permissions on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Generates a fresh identity key and prints its address.
fn keygen(args: cli::KeygenArgs) -> Result<()> {
    logging::init_logging("idreg_node=info", logging::LogFormat::Pretty);

    let keypair = IdentityKeypair::generate();
    let address: IdentityAddress = keypair.address();
    write_key_file(&args.output, &keypair, args.force)?;

    tracing::info!(
        identity = %address,
        key_path = %args.output.display(),
        "identity key generated"
    );

    println!("Identity key generated.");
    println!("  Identity : {}", address);
    println!("  Key file : {}", args.output.display());

    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("idreg-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol   {}", idreg_protocol::config::PROTOCOL_VERSION);
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;
        tokio::select! {
            res = signal::ctrl_c() => res.context("failed to listen for Ctrl+C")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    Ok(())
}
