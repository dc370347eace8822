//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited implementations:
//!
//! - **secp256k1 ECDSA** (`k256`) for identity keys and recoverable
//!   signatures, because that is what the payments contract verifies.
//! - **Keccak-256** (`sha3`) for address derivation and the registration
//!   digest.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{keccak256, keccak256_concat};
pub use keys::{public_key_parts, IdentityKeypair, KeyError};
pub use signatures::{recover_address, recover_verifying_key, verify_signer, SignatureError};
