//! # Hashing Utilities
//!
//! Keccak-256 is the only hash the registration flow needs: it derives
//! identity addresses from public keys and produces the digest the
//! registration signature is made over. Note that this is the original
//! Keccak padding, not NIST SHA3-256; the payments contract (and every EVM
//! tool) expects the former.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of `data`.
///
/// # Example
///
/// ```
/// use idreg_protocol::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(hash[0], 0xc5);
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Keccak-256 over several slices, as if they were concatenated.
///
/// Avoids building a temporary buffer when hashing a prefix plus key parts.
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
