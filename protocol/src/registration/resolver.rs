//! # Registration Status Resolver
//!
//! Answers "is this identity registered, and if not, what does a client need
//! to register it?" by combining two collaborators:
//!
//! 1. [`IdentityRegistry`]: is the identity already registered?
//! 2. [`RegistrationDataProvider`]: public key parts and signature for an
//!    identity that is not.
//!
//! The registry is always asked first, and the provider is only consulted
//! for unregistered identities; signing can be slow (remote signers,
//! hardware) and its output is meaningless for a registered identity.
//!
//! The resolver is stateless. It does not retry, time out, or cache; callers
//! and collaborators own those policies. If registration status changes
//! between the two calls, the result reflects what the registry reported.

use async_trait::async_trait;
use std::sync::Arc;

use super::encoding::RegistrationStatusResult;
use super::error::ResolveError;
use super::types::RegistrationData;
use crate::identity::IdentityAddress;

/// Source of truth for whether an identity is registered.
///
/// Implementations must be side-effect free: the resolver may call this any
/// number of times for the same identity.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    async fn is_registered(&self, identity: &IdentityAddress) -> anyhow::Result<bool>;
}

/// Produces registration data for an identity.
///
/// Must return fully populated data or an error.
#[async_trait]
pub trait RegistrationDataProvider: Send + Sync {
    async fn provide_registration_data(
        &self,
        identity: &IdentityAddress,
    ) -> anyhow::Result<RegistrationData>;
}

/// Orchestrates the registry check, data provisioning and wire encoding.
///
/// Cheap to clone: both collaborators are behind `Arc`.
#[derive(Clone)]
pub struct RegistrationStatusResolver {
    registry: Arc<dyn IdentityRegistry>,
    provider: Arc<dyn RegistrationDataProvider>,
}

impl RegistrationStatusResolver {
    pub fn new(
        registry: Arc<dyn IdentityRegistry>,
        provider: Arc<dyn RegistrationDataProvider>,
    ) -> Self {
        Self { registry, provider }
    }

    /// Resolve one identity's registration status.
    ///
    /// `identity` is assumed well-formed; parsing belongs to the caller.
    pub async fn resolve(
        &self,
        identity: &IdentityAddress,
    ) -> Result<RegistrationStatusResult, ResolveError> {
        let registered = self
            .registry
            .is_registered(identity)
            .await
            .map_err(|source| {
                tracing::warn!(identity = %identity, error = %source, "registry query failed");
                ResolveError::RegistryQueryFailed {
                    identity: *identity,
                    source,
                }
            })?;

        if registered {
            tracing::debug!(identity = %identity, "identity already registered");
            return Ok(RegistrationStatusResult::Registered);
        }

        let data = self
            .provider
            .provide_registration_data(identity)
            .await
            .map_err(|source| {
                tracing::warn!(identity = %identity, error = %source, "registration data provisioning failed");
                ResolveError::DataProvisioningFailed {
                    identity: *identity,
                    source,
                }
            })?;

        let (public_key, signature) = match (data.public_key, data.signature) {
            (Some(public_key), Some(signature)) => (public_key, signature),
            (None, _) => return Err(incomplete(identity, "PublicKey")),
            (Some(_), None) => return Err(incomplete(identity, "Signature")),
        };

        tracing::debug!(identity = %identity, "identity unregistered, registration data attached");
        Ok(RegistrationStatusResult::unregistered(&public_key, &signature))
    }
}

fn incomplete(identity: &IdentityAddress, missing: &'static str) -> ResolveError {
    tracing::error!(identity = %identity, missing, "provider returned incomplete registration data");
    ResolveError::IncompleteRegistrationData {
        identity: *identity,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{PublicKeyParts, SignatureParts};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -- Mock collaborators ----------------------------------------------------

    enum RegistryAnswer {
        Registered(bool),
        Fail,
    }

    struct MockRegistry {
        answer: RegistryAnswer,
        calls: AtomicUsize,
    }

    impl MockRegistry {
        fn new(answer: RegistryAnswer) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl IdentityRegistry for MockRegistry {
        async fn is_registered(&self, _identity: &IdentityAddress) -> anyhow::Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                RegistryAnswer::Registered(b) => Ok(b),
                RegistryAnswer::Fail => Err(anyhow::anyhow!("contract call reverted")),
            }
        }
    }

    struct MockProvider {
        data: Option<RegistrationData>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn returning(data: Option<RegistrationData>) -> Arc<Self> {
            Arc::new(Self {
                data,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RegistrationDataProvider for MockProvider {
        async fn provide_registration_data(
            &self,
            _identity: &IdentityAddress,
        ) -> anyhow::Result<RegistrationData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.data
                .ok_or_else(|| anyhow::anyhow!("signer unavailable"))
        }
    }

    fn identity(last: u8) -> IdentityAddress {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        IdentityAddress::from_bytes(bytes)
    }

    fn sample_data() -> RegistrationData {
        RegistrationData::new(
            PublicKeyParts::new([0u8; 32], [1u8; 32]),
            SignatureParts::new([0xAA; 32], [0xBB; 32], 27).unwrap(),
        )
    }

    fn resolver(
        registry: &Arc<MockRegistry>,
        provider: &Arc<MockProvider>,
    ) -> RegistrationStatusResolver {
        RegistrationStatusResolver::new(registry.clone(), provider.clone())
    }

    // -- Tests -----------------------------------------------------------------

    #[tokio::test]
    async fn registered_identity_short_circuits() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(true));
        let provider = MockProvider::returning(Some(sample_data()));

        let result = resolver(&registry, &provider).resolve(&identity(1)).await.unwrap();

        assert_eq!(result, RegistrationStatusResult::Registered);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "Registered": true })
        );
    }

    #[tokio::test]
    async fn unregistered_identity_gets_encoded_data() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let provider = MockProvider::returning(Some(sample_data()));

        let result = resolver(&registry, &provider).resolve(&identity(2)).await.unwrap();

        match &result {
            RegistrationStatusResult::Unregistered {
                public_key,
                signature,
            } => {
                assert_eq!(public_key.part1, format!("0x{}", "00".repeat(32)));
                assert_eq!(public_key.part2, format!("0x{}", "01".repeat(32)));
                assert_eq!(signature.r, format!("0x{}", "aa".repeat(32)));
                assert_eq!(signature.s, format!("0x{}", "bb".repeat(32)));
                assert_eq!(signature.v, 27);
            }
            other => panic!("expected unregistered result, got {:?}", other),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn registry_failure_skips_provider() {
        let registry = MockRegistry::new(RegistryAnswer::Fail);
        let provider = MockProvider::returning(Some(sample_data()));

        let err = resolver(&registry, &provider)
            .resolve(&identity(3))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::RegistryQueryFailed { .. }));
        assert_eq!(err.identity(), &identity(3));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_data_provisioning_failed() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let provider = MockProvider::returning(None);

        let err = resolver(&registry, &provider)
            .resolve(&identity(5))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::DataProvisioningFailed { .. }));
        assert!(err.to_string().contains("signer unavailable"));
    }

    #[tokio::test]
    async fn missing_public_key_is_incomplete() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let mut data = sample_data();
        data.public_key = None;
        let provider = MockProvider::returning(Some(data));

        let err = resolver(&registry, &provider)
            .resolve(&identity(4))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::IncompleteRegistrationData {
                missing: "PublicKey",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_signature_is_incomplete() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let mut data = sample_data();
        data.signature = None;
        let provider = MockProvider::returning(Some(data));

        let err = resolver(&registry, &provider)
            .resolve(&identity(6))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::IncompleteRegistrationData {
                missing: "Signature",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn out_of_domain_v_surfaces_as_provisioning_failure() {
        struct BadVProvider;

        #[async_trait]
        impl RegistrationDataProvider for BadVProvider {
            async fn provide_registration_data(
                &self,
                _identity: &IdentityAddress,
            ) -> anyhow::Result<RegistrationData> {
                let signature = SignatureParts::new([1; 32], [2; 32], 29)?;
                Ok(RegistrationData::new(
                    PublicKeyParts::new([3; 32], [4; 32]),
                    signature,
                ))
            }
        }

        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let resolver = RegistrationStatusResolver::new(registry, Arc::new(BadVProvider));
        let err = resolver.resolve(&identity(7)).await.unwrap_err();

        assert!(matches!(err, ResolveError::DataProvisioningFailed { .. }));
        assert!(err.to_string().contains("invalid recovery id 29"));
    }

    #[tokio::test]
    async fn resolver_is_reusable_across_concurrent_calls() {
        let registry = MockRegistry::new(RegistryAnswer::Registered(false));
        let provider = MockProvider::returning(Some(sample_data()));
        let resolver = resolver(&registry, &provider);

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve(&identity(i)).await })
            })
            .collect();
        for handle in handles {
            assert!(!handle.await.unwrap().unwrap().is_registered());
        }

        assert_eq!(registry.calls.load(Ordering::SeqCst), 8);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 8);
    }
}
