//! # CLI Interface
//!
//! Defines the command-line argument structure for `idreg-node` using
//! `clap` derive. Supports three subcommands: `run`, `keygen`, and
//! `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use idreg_protocol::config::{DEFAULT_METRICS_PORT, DEFAULT_RPC_PORT};
use idreg_protocol::identity::IdentityAddress;
use idreg_protocol::network::NetworkProfile;

use crate::logging::LogFormat;

/// Identity registration status node.
///
/// Serves the registration status of identities over HTTP: whether an
/// identity is registered with the payments contract, and if not, the
/// public key parts and signature needed to register it.
#[derive(Parser, Debug)]
#[command(
    name = "idreg-node",
    about = "Identity registration status node",
    version,
    propagate_version = true
)]
pub struct IdregNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the node.
    Run(RunArgs),
    /// Generate a fresh identity key and write it to a file.
    Keygen(KeygenArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the HTTP API.
    #[arg(long, env = "IDREG_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "IDREG_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Network profile: testnet or localnet.
    #[arg(long, short = 'n', env = "IDREG_NETWORK", default_value_t = NetworkProfile::default())]
    pub network: NetworkProfile,

    /// Files holding hex-encoded secp256k1 identity keys, one key per file.
    #[arg(long = "identity-key-file", env = "IDREG_IDENTITY_KEY_FILES", value_delimiter = ',')]
    pub identity_key_files: Vec<PathBuf>,

    /// Hex-encoded secp256k1 identity keys.
    ///
    /// **Never pass this flag in production.** Use a key file instead.
    #[arg(long = "identity-key", env = "IDREG_IDENTITY_KEYS", value_delimiter = ',')]
    pub identity_keys: Vec<String>,

    /// Identities the in-memory registry reports as already registered.
    #[arg(long = "registered", env = "IDREG_REGISTERED", value_delimiter = ',')]
    pub registered: Vec<IdentityAddress>,

    /// Log output format: pretty or json.
    #[arg(long, env = "IDREG_LOG_FORMAT", default_value = "pretty", value_parser = LogFormat::parse)]
    pub log_format: LogFormat,
}

/// Arguments for the `keygen` subcommand.
#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Where to write the hex-encoded secret key.
    #[arg(long, short = 'o', default_value = "identity.key")]
    pub output: PathBuf,

    /// Overwrite an existing key file.
    #[arg(long)]
    pub force: bool,
}
