//! The message an identity signs to authorise its own registration, and the
//! off-chain check that mirrors what the payments contract does with it.
//!
//! ```text
//! digest = Keccak256("Register prefix:" || Part1 || Part2)
//! ```
//!
//! The contract recovers a key from (digest, R, S, V), requires it to equal
//! `Part1 || Part2`, and registers the address derived from that key.

use thiserror::Error;

use super::types::{PublicKeyParts, RegistrationData};
use crate::config::REGISTRATION_MESSAGE_PREFIX;
use crate::crypto::{keccak256_concat, public_key_parts, recover_verifying_key, SignatureError};
use crate::identity::IdentityAddress;

/// Why a registration payload would be rejected on-chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("registration data is missing {0}")]
    Incomplete(&'static str),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The signature recovers to a key other than the one in the payload.
    #[error("signature does not match the registration public key")]
    KeyMismatch,

    /// The public key belongs to a different identity.
    #[error("public key derives {derived}, not {expected}")]
    IdentityMismatch {
        expected: IdentityAddress,
        derived: IdentityAddress,
    },
}

/// Digest the identity signs to authorise registration of `public_key`.
pub fn registration_digest(public_key: &PublicKeyParts) -> [u8; 32] {
    keccak256_concat(&[
        REGISTRATION_MESSAGE_PREFIX,
        public_key.part1(),
        public_key.part2(),
    ])
}

/// Check that `data` would register `identity`: complete, the signature
/// recovers to the enclosed key, and that key derives `identity`.
pub fn verify_registration(
    identity: &IdentityAddress,
    data: &RegistrationData,
) -> Result<(), VerificationError> {
    let public_key = data
        .public_key
        .ok_or(VerificationError::Incomplete("PublicKey"))?;
    let signature = data
        .signature
        .ok_or(VerificationError::Incomplete("Signature"))?;

    let derived = IdentityAddress::from_public_key_parts(&public_key);
    if &derived != identity {
        return Err(VerificationError::IdentityMismatch {
            expected: *identity,
            derived,
        });
    }

    let recovered = recover_verifying_key(&registration_digest(&public_key), &signature)?;
    if public_key_parts(&recovered) != public_key {
        return Err(VerificationError::KeyMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::IdentityKeypair;
    use crate::registration::SignatureParts;

    fn signed(kp: &IdentityKeypair) -> RegistrationData {
        let pk = kp.public_key_parts();
        let sig = kp.sign_prehash(&registration_digest(&pk)).unwrap();
        RegistrationData::new(pk, sig)
    }

    #[test]
    fn digest_depends_on_both_parts() {
        let a = PublicKeyParts::new([1; 32], [2; 32]);
        let b = PublicKeyParts::new([1; 32], [3; 32]);
        let swapped = PublicKeyParts::new([2; 32], [1; 32]);
        assert_ne!(registration_digest(&a), registration_digest(&b));
        assert_ne!(registration_digest(&a), registration_digest(&swapped));
    }

    #[test]
    fn honest_registration_verifies() {
        let kp = IdentityKeypair::generate();
        assert_eq!(verify_registration(&kp.address(), &signed(&kp)), Ok(()));
    }

    #[test]
    fn wrong_identity_rejected() {
        let kp = IdentityKeypair::generate();
        let other = IdentityKeypair::generate();
        assert!(matches!(
            verify_registration(&other.address(), &signed(&kp)),
            Err(VerificationError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn signature_from_another_key_rejected() {
        let kp = IdentityKeypair::generate();
        let impostor = IdentityKeypair::generate();
        let pk = kp.public_key_parts();
        let sig = impostor.sign_prehash(&registration_digest(&pk)).unwrap();
        assert_eq!(
            verify_registration(&kp.address(), &RegistrationData::new(pk, sig)),
            Err(VerificationError::KeyMismatch)
        );
    }

    #[test]
    fn incomplete_data_rejected() {
        let kp = IdentityKeypair::generate();
        let mut data = signed(&kp);
        data.signature = None;
        assert_eq!(
            verify_registration(&kp.address(), &data),
            Err(VerificationError::Incomplete("Signature"))
        );
    }

    #[test]
    fn garbage_signature_rejected() {
        let kp = IdentityKeypair::generate();
        let data = RegistrationData::new(
            kp.public_key_parts(),
            SignatureParts::new([0; 32], [0; 32], 27).unwrap(),
        );
        assert_eq!(
            verify_registration(&kp.address(), &data),
            Err(VerificationError::Signature(SignatureError::InvalidFormat))
        );
    }
}
