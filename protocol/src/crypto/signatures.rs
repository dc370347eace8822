//! # Signature Recovery
//!
//! `ecrecover`-style public key recovery from [`SignatureParts`]. This is
//! what the payments contract does with the registration payload, so
//! running it off-chain catches a bad payload before a transaction is
//! wasted on it.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use thiserror::Error;

use crate::identity::IdentityAddress;
use crate::registration::SignatureParts;

/// Errors during signature recovery and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// R or S is zero or not below the curve order.
    #[error("invalid signature scalars")]
    InvalidFormat,

    /// No public key can be recovered from this signature.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// A key was recovered, but it is not the expected one.
    #[error("signer mismatch: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        expected: IdentityAddress,
        recovered: IdentityAddress,
    },
}

/// Recover the verifying key that produced `signature` over `digest`.
pub fn recover_verifying_key(
    digest: &[u8; 32],
    signature: &SignatureParts,
) -> Result<VerifyingKey, SignatureError> {
    let sig =
        Signature::from_slice(&signature.to_compact()).map_err(|_| SignatureError::InvalidFormat)?;
    let recovery_id =
        RecoveryId::try_from(signature.recovery_id()).map_err(|_| SignatureError::InvalidFormat)?;
    VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)
}

/// Recover the identity address that produced `signature` over `digest`.
pub fn recover_address(
    digest: &[u8; 32],
    signature: &SignatureParts,
) -> Result<IdentityAddress, SignatureError> {
    let key = recover_verifying_key(digest, signature)?;
    Ok(IdentityAddress::from_verifying_key(&key))
}

/// Check that `signature` over `digest` was made by `expected`.
pub fn verify_signer(
    digest: &[u8; 32],
    signature: &SignatureParts,
    expected: &IdentityAddress,
) -> Result<(), SignatureError> {
    let recovered = recover_address(digest, signature)?;
    if &recovered != expected {
        return Err(SignatureError::SignerMismatch {
            expected: *expected,
            recovered,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{keccak256, IdentityKeypair};

    #[test]
    fn recovers_signer_address() {
        let kp = IdentityKeypair::generate();
        let digest = keccak256(b"recover me");
        let sig = kp.sign_prehash(&digest).unwrap();
        assert_eq!(recover_address(&digest, &sig).unwrap(), kp.address());
        assert_eq!(recover_verifying_key(&digest, &sig).unwrap(), kp.verifying_key());
    }

    #[test]
    fn flipped_v_recovers_a_different_key() {
        let kp = IdentityKeypair::generate();
        let digest = keccak256(b"parity");
        let sig = kp.sign_prehash(&digest).unwrap();
        let flipped_v = if sig.v() == 27 { 28 } else { 27 };
        let flipped = SignatureParts::new(*sig.r(), *sig.s(), flipped_v).unwrap();

        match recover_address(&digest, &flipped) {
            Ok(addr) => assert_ne!(addr, kp.address()),
            Err(e) => assert_eq!(e, SignatureError::RecoveryFailed),
        }
    }

    #[test]
    fn zero_scalars_rejected() {
        let sig = SignatureParts::new([0u8; 32], [0u8; 32], 27).unwrap();
        assert_eq!(
            recover_address(&[1u8; 32], &sig),
            Err(SignatureError::InvalidFormat)
        );
    }

    #[test]
    fn verify_signer_reports_mismatch() {
        let signer = IdentityKeypair::generate();
        let other = IdentityKeypair::generate();
        let digest = keccak256(b"who signed this");
        let sig = signer.sign_prehash(&digest).unwrap();

        assert!(verify_signer(&digest, &sig, &signer.address()).is_ok());
        assert!(matches!(
            verify_signer(&digest, &sig, &other.address()),
            Err(SignatureError::SignerMismatch { .. })
        ));
    }
}
