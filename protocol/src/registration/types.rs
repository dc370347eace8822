//! Raw registration material: fixed-width byte fields exactly as the payments
//! contract consumes them. See [`super::encoding`] for the wire form.

use std::fmt;
use thiserror::Error;

use crate::config::{
    PUBLIC_KEY_BODY_LENGTH, PUBLIC_KEY_PART_LENGTH, RECOVERY_ID_EVEN, RECOVERY_ID_ODD,
    RECOVERY_ID_OFFSET, SIGNATURE_SCALAR_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
    UNCOMPRESSED_PUBLIC_KEY_PREFIX,
};

/// Errors raised while assembling registration parts from raw values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartsError {
    /// V must be 27 or 28; anything else cannot be passed to `ecrecover`.
    #[error("invalid recovery id {0}: expected 27 or 28")]
    InvalidRecoveryId(u8),

    /// The public key is not a 65-byte uncompressed SEC1 point.
    #[error("invalid uncompressed public key: expected 65 bytes with leading 0x04, got {len} bytes with leading {prefix:#04x}")]
    InvalidUncompressedKey {
        /// Length of the rejected input.
        len: usize,
        /// First byte of the rejected input (0 if empty).
        prefix: u8,
    },
}

// ---------------------------------------------------------------------------
// PublicKeyParts
// ---------------------------------------------------------------------------

/// A secp256k1 public key with the `0x04` format byte stripped, split into
/// its two 32-byte halves (the X and Y coordinates).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeyParts {
    part1: [u8; PUBLIC_KEY_PART_LENGTH],
    part2: [u8; PUBLIC_KEY_PART_LENGTH],
}

impl PublicKeyParts {
    pub fn new(part1: [u8; PUBLIC_KEY_PART_LENGTH], part2: [u8; PUBLIC_KEY_PART_LENGTH]) -> Self {
        Self { part1, part2 }
    }

    /// Split a 64-byte key body into its halves.
    pub fn from_key_body(body: &[u8; PUBLIC_KEY_BODY_LENGTH]) -> Self {
        let mut part1 = [0u8; PUBLIC_KEY_PART_LENGTH];
        let mut part2 = [0u8; PUBLIC_KEY_PART_LENGTH];
        part1.copy_from_slice(&body[..PUBLIC_KEY_PART_LENGTH]);
        part2.copy_from_slice(&body[PUBLIC_KEY_PART_LENGTH..]);
        Self { part1, part2 }
    }

    /// Strip the format byte from a 65-byte uncompressed SEC1 key and split
    /// the remainder.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self, PartsError> {
        if bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH
            || bytes[0] != UNCOMPRESSED_PUBLIC_KEY_PREFIX
        {
            return Err(PartsError::InvalidUncompressedKey {
                len: bytes.len(),
                prefix: bytes.first().copied().unwrap_or(0),
            });
        }
        let mut body = [0u8; PUBLIC_KEY_BODY_LENGTH];
        body.copy_from_slice(&bytes[1..]);
        Ok(Self::from_key_body(&body))
    }

    /// High half (X coordinate).
    pub fn part1(&self) -> &[u8; PUBLIC_KEY_PART_LENGTH] {
        &self.part1
    }

    /// Low half (Y coordinate).
    pub fn part2(&self) -> &[u8; PUBLIC_KEY_PART_LENGTH] {
        &self.part2
    }

    /// `part1 || part2`.
    pub fn to_key_body(&self) -> [u8; PUBLIC_KEY_BODY_LENGTH] {
        let mut body = [0u8; PUBLIC_KEY_BODY_LENGTH];
        body[..PUBLIC_KEY_PART_LENGTH].copy_from_slice(&self.part1);
        body[PUBLIC_KEY_PART_LENGTH..].copy_from_slice(&self.part2);
        body
    }

    /// `0x04 || part1 || part2`, ready for SEC1 parsing.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        out[0] = UNCOMPRESSED_PUBLIC_KEY_PREFIX;
        out[1..].copy_from_slice(&self.to_key_body());
        out
    }
}

impl fmt::Debug for PublicKeyParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyParts")
            .field("part1", &hex::encode(self.part1))
            .field("part2", &hex::encode(self.part2))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SignatureParts
// ---------------------------------------------------------------------------

/// An ECDSA signature decomposed into R, S and the `ecrecover` V value.
///
/// V is checked at construction, so a `SignatureParts` always carries 27 or
/// 28.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureParts {
    r: [u8; SIGNATURE_SCALAR_LENGTH],
    s: [u8; SIGNATURE_SCALAR_LENGTH],
    v: u8,
}

impl SignatureParts {
    /// Build from R, S and V. Rejects V outside {27, 28}; the value is never
    /// coerced into range.
    pub fn new(
        r: [u8; SIGNATURE_SCALAR_LENGTH],
        s: [u8; SIGNATURE_SCALAR_LENGTH],
        v: u8,
    ) -> Result<Self, PartsError> {
        match v {
            RECOVERY_ID_EVEN | RECOVERY_ID_ODD => Ok(Self { r, s, v }),
            other => Err(PartsError::InvalidRecoveryId(other)),
        }
    }

    /// Build from a raw recovery id (0 or 1) as produced by signing libraries.
    pub fn from_recovery_id(
        r: [u8; SIGNATURE_SCALAR_LENGTH],
        s: [u8; SIGNATURE_SCALAR_LENGTH],
        recovery_id: u8,
    ) -> Result<Self, PartsError> {
        let v = recovery_id
            .checked_add(RECOVERY_ID_OFFSET)
            .ok_or(PartsError::InvalidRecoveryId(recovery_id))?;
        Self::new(r, s, v)
    }

    pub fn r(&self) -> &[u8; SIGNATURE_SCALAR_LENGTH] {
        &self.r
    }

    pub fn s(&self) -> &[u8; SIGNATURE_SCALAR_LENGTH] {
        &self.s
    }

    /// 27 or 28.
    pub fn v(&self) -> u8 {
        self.v
    }

    /// The raw recovery id (0 or 1).
    pub fn recovery_id(&self) -> u8 {
        self.v - RECOVERY_ID_OFFSET
    }

    /// `r || s`, the compact 64-byte form.
    pub fn to_compact(&self) -> [u8; 2 * SIGNATURE_SCALAR_LENGTH] {
        let mut out = [0u8; 2 * SIGNATURE_SCALAR_LENGTH];
        out[..SIGNATURE_SCALAR_LENGTH].copy_from_slice(&self.r);
        out[SIGNATURE_SCALAR_LENGTH..].copy_from_slice(&self.s);
        out
    }
}

impl fmt::Debug for SignatureParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureParts")
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .field("v", &self.v)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RegistrationData
// ---------------------------------------------------------------------------

/// What a [`RegistrationDataProvider`](super::RegistrationDataProvider)
/// hands back for one identity.
///
/// Both fields are optional because providers may be backed by remote
/// signers whose responses are decoded field by field. A well-behaved
/// provider always fills both (use [`RegistrationData::new`]); the resolver
/// refuses anything less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationData {
    pub public_key: Option<PublicKeyParts>,
    pub signature: Option<SignatureParts>,
}

impl RegistrationData {
    /// Fully populated registration data.
    pub fn new(public_key: PublicKeyParts, signature: SignatureParts) -> Self {
        Self {
            public_key: Some(public_key),
            signature: Some(signature),
        }
    }

    /// Both parts, or `None` if either is missing.
    pub fn complete(&self) -> Option<(PublicKeyParts, SignatureParts)> {
        match (self.public_key, self.signature) {
            (Some(public_key), Some(signature)) => Some((public_key, signature)),
            _ => None,
        }
    }
}
