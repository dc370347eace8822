//! # Identity Addresses
//!
//! An identity is addressed the way EVM accounts are: the last 20 bytes of
//! the Keccak-256 digest of its 64-byte uncompressed public key body.
//!
//! ```text
//! secp256k1 public key (65 bytes, 0x04 || X || Y)
//!     -> strip 0x04          -> 64 bytes
//!     -> Keccak-256          -> 32 bytes
//!     -> last 20 bytes       -> 0x<40 lowercase hex digits>
//! ```
//!
//! Parsing is strict about length: the HTTP layer rejects anything that is
//! not exactly 40 hex digits (with or without the `0x` prefix) instead of
//! silently padding or truncating it.

use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, HEX_PREFIX};
use crate::crypto::keccak256;
use crate::registration::PublicKeyParts;

/// Errors that can occur while parsing an identity address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Wrong number of hex digits after the optional prefix.
    #[error("invalid address length: expected {expected} hex digits, got {got}")]
    InvalidLength {
        /// Expected number of hex digits.
        expected: usize,
        /// Number of hex digits actually present.
        got: usize,
    },

    /// Non-hex characters in the address.
    #[error("invalid address hex: {0}")]
    InvalidHex(String),
}

/// A 20-byte identity address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityAddress([u8; ADDRESS_LENGTH]);

impl IdentityAddress {
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Derive the address of a 64-byte public key body.
    pub fn from_key_body(body: &[u8]) -> Self {
        let hash = keccak256(body);
        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&hash[32 - ADDRESS_LENGTH..]);
        Self(address)
    }

    /// Derive the address owned by a secp256k1 verifying key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        // Skip the 0x04 SEC1 tag.
        Self::from_key_body(&point.as_bytes()[1..])
    }

    /// Derive the address owned by the key described by `parts`.
    pub fn from_public_key_parts(parts: &PublicKeyParts) -> Self {
        Self::from_key_body(&parts.to_key_body())
    }

    /// Canonical form: `0x` followed by 40 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("{}{}", HEX_PREFIX, hex::encode(self.0))
    }
}

impl FromStr for IdentityAddress {
    type Err = AddressError;

    /// Accepts `0x`/`0X`-prefixed or bare hex in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != 2 * ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: 2 * ADDRESS_LENGTH,
                got: digits.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LENGTH]> for IdentityAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for IdentityAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for IdentityAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityAddress({})", self.to_hex())
    }
}

impl Serialize for IdentityAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for IdentityAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let bytes: [u8; ADDRESS_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
                serde::de::Error::custom(format!(
                    "expected {}-byte address, got {}",
                    ADDRESS_LENGTH,
                    bytes.len()
                ))
            })?;
            Ok(Self(bytes))
        }
    }
}
