//! # Key Management
//!
//! secp256k1 keypairs for identities. The public half is what gets split
//! into [`PublicKeyParts`] for registration; the secret half signs the
//! registration digest.
//!
//! Secret bytes are zeroized on drop (by `k256`) and never logged. Exports
//! hand back [`Zeroizing`] buffers so callers don't leave copies lying around
//! either.

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::SECRET_KEY_LENGTH;
use crate::identity::IdentityAddress;
use crate::registration::{PartsError, PublicKeyParts, SignatureParts};

/// Errors that can occur during key operations.
///
/// Deliberately vague about the secret material involved.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: wrong length or not a valid secp256k1 scalar")]
    InvalidSecretKey,

    #[error("signing failed")]
    SigningFailed,

    #[error(transparent)]
    Parts(#[from] PartsError),
}

/// An identity keypair wrapping a secp256k1 signing key.
///
/// Not `Serialize`: exporting a secret must be an explicit call to
/// [`to_hex`](Self::to_hex) or [`secret_key_bytes`](Self::secret_key_bytes).
///
/// # Examples
///
/// ```
/// use idreg_protocol::crypto::IdentityKeypair;
///
/// let kp = IdentityKeypair::generate();
/// let digest = [7u8; 32];
/// let sig = kp.sign_prehash(&digest).unwrap();
/// assert!(sig.v() == 27 || sig.v() == 28);
/// ```
#[derive(Clone)]
pub struct IdentityKeypair {
    signing_key: SigningKey,
}

impl IdentityKeypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Load from a raw 32-byte secret scalar. Zero and values at or above
    /// the curve order are rejected.
    pub fn from_bytes(secret: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_slice(secret).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Load from hex, with or without a `0x` prefix. Surrounding whitespace
    /// is ignored so key files with a trailing newline load cleanly.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let trimmed = hex_str.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut secret = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        hex::decode_to_slice(digits, &mut secret[..])
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_bytes(&secret)
    }

    /// The raw secret scalar. Handle with care.
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        let mut out = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Hex encoding of the secret scalar, no prefix.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.secret_key_bytes()[..]))
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// Address of the identity this key controls.
    pub fn address(&self) -> IdentityAddress {
        IdentityAddress::from_verifying_key(self.signing_key.verifying_key())
    }

    /// The public key split for registration.
    pub fn public_key_parts(&self) -> PublicKeyParts {
        public_key_parts(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest and return R, S and V (27/28).
    ///
    /// `k256` emits low-S signatures and adjusts the recovery id to match,
    /// so the result is accepted by EIP-2 style verifiers as-is.
    pub fn sign_prehash(&self, digest: &[u8; 32]) -> Result<SignatureParts, KeyError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| KeyError::SigningFailed)?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(SignatureParts::from_recovery_id(r, s, recovery_id.to_byte())?)
    }
}

/// Split a verifying key into registration parts.
pub fn public_key_parts(key: &VerifyingKey) -> PublicKeyParts {
    let point = key.to_encoded_point(false);
    let bytes = point.as_bytes();
    let mut part1 = [0u8; 32];
    let mut part2 = [0u8; 32];
    part1.copy_from_slice(&bytes[1..33]);
    part2.copy_from_slice(&bytes[33..65]);
    PublicKeyParts::new(part1, part2)
}

impl fmt::Debug for IdentityKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKeypair(address={})", self.address())
    }
}

impl PartialEq for IdentityKeypair {
    /// Compares public keys only.
    fn eq(&self, other: &Self) -> bool {
        self.signing_key.verifying_key() == other.signing_key.verifying_key()
    }
}

impl Eq for IdentityKeypair {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_distinct() {
        let a = IdentityKeypair::generate();
        let b = IdentityKeypair::generate();
        assert_ne!(a, b);
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn hex_roundtrip_preserves_identity() {
        let kp = IdentityKeypair::generate();
        let restored = IdentityKeypair::from_hex(&kp.to_hex()).unwrap();
        assert_eq!(kp, restored);
        assert_eq!(kp.address(), restored.address());
    }

    #[test]
    fn from_hex_tolerates_prefix_and_newline() {
        let kp = IdentityKeypair::generate();
        let file_contents = format!("0x{}\n", kp.to_hex().as_str());
        assert_eq!(IdentityKeypair::from_hex(&file_contents).unwrap(), kp);
    }

    #[test]
    fn invalid_secrets_rejected() {
        assert!(matches!(
            IdentityKeypair::from_bytes(&[0u8; 32]),
            Err(KeyError::InvalidSecretKey)
        ));
        assert!(matches!(
            IdentityKeypair::from_bytes(&[0xFF; 32]),
            Err(KeyError::InvalidSecretKey)
        ));
        assert!(IdentityKeypair::from_hex("abcd").is_err());
        assert!(IdentityKeypair::from_hex("not hex at all").is_err());
    }

    #[test]
    fn public_key_parts_match_sec1_encoding() {
        let kp = IdentityKeypair::generate();
        let point = kp.verifying_key().to_encoded_point(false);
        assert_eq!(kp.public_key_parts().to_uncompressed().as_slice(), point.as_bytes());
    }

    #[test]
    fn signature_recovery_id_in_range() {
        let kp = IdentityKeypair::generate();
        for i in 0..16u8 {
            let sig = kp.sign_prehash(&[i; 32]).unwrap();
            assert!(matches!(sig.v(), 27 | 28));
        }
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = IdentityKeypair::generate();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(kp.to_hex().as_str()));
        assert!(debug.contains(&kp.address().to_hex()));
    }
}
