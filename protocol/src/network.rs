//! # Network Profiles
//!
//! Static parameters describing which discovery API, message broker and
//! payments contract a node talks to. A profile is chosen once at startup and
//! handed to whatever needs it; nothing in the library reads it from global
//! state.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// All parameters which describe a particular network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkDefinition {
    /// Base URL of the discovery API.
    #[serde(rename = "DiscoveryAPIAddress")]
    pub discovery_api_address: &'static str,
    /// Host of the message broker.
    pub broker_address: &'static str,
    /// Address of the payments contract identities register with.
    pub payments_contract_address: &'static str,
}

/// Test network (the default network).
pub const TESTNET: NetworkDefinition = NetworkDefinition {
    discovery_api_address: "https://testnet-api.mysterium.network/v1",
    broker_address: "testnet-broker.mysterium.network",
    payments_contract_address: "0x617ad5e514e8117Bb6F18E68FA65cc479483df88",
};

/// Local network; expects discovery and broker services on localhost. No
/// payments contract is deployed there yet.
pub const LOCALNET: NetworkDefinition = NetworkDefinition {
    discovery_api_address: "http://localhost/v1",
    broker_address: "localhost",
    payments_contract_address: "<undefined yet>",
};

/// Network used when no runtime parameters are given.
pub const DEFAULT_NETWORK: NetworkDefinition = TESTNET;

/// Error for an unrecognised profile name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown network profile '{0}' (expected 'testnet' or 'localnet')")]
pub struct UnknownNetwork(pub String);

/// Named network presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkProfile {
    #[default]
    Testnet,
    Localnet,
}

impl NetworkProfile {
    /// The static definition behind this preset.
    pub fn definition(self) -> NetworkDefinition {
        match self {
            NetworkProfile::Testnet => TESTNET,
            NetworkProfile::Localnet => LOCALNET,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NetworkProfile::Testnet => "testnet",
            NetworkProfile::Localnet => "localnet",
        }
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkProfile {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(NetworkProfile::Testnet),
            "localnet" => Ok(NetworkProfile::Localnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}
