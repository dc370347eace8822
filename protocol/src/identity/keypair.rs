//! Re-exports of the identity key types.
//!
//! The canonical implementations live in [`crate::crypto::keys`]; this module
//! lets identity-level code import everything from one namespace.

pub use crate::crypto::keys::{public_key_parts, IdentityKeypair, KeyError};
