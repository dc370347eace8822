//! Keystore-backed [`RegistrationDataProvider`]: signs the registration
//! digest with the identity's own key.

use async_trait::async_trait;
use thiserror::Error;

use super::message::registration_digest;
use super::resolver::RegistrationDataProvider;
use super::types::RegistrationData;
use crate::identity::{IdentityAddress, IdentityKeystore};

/// Failures specific to keystore-backed provisioning.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// This process holds no key for the identity, so it cannot sign for it.
    #[error("no key for identity {0} in keystore")]
    UnknownIdentity(IdentityAddress),

    #[error("signing registration digest failed: {0}")]
    Signing(#[from] crate::crypto::KeyError),
}

/// Produces registration data for identities whose keys live in an
/// [`IdentityKeystore`].
#[derive(Debug, Clone)]
pub struct KeystoreDataProvider {
    keystore: IdentityKeystore,
}

impl KeystoreDataProvider {
    pub fn new(keystore: IdentityKeystore) -> Self {
        Self { keystore }
    }

    pub fn keystore(&self) -> &IdentityKeystore {
        &self.keystore
    }

    /// Synchronous core of [`RegistrationDataProvider::provide_registration_data`].
    pub fn sign_registration(
        &self,
        identity: &IdentityAddress,
    ) -> Result<RegistrationData, ProviderError> {
        let keypair = self
            .keystore
            .get(identity)
            .ok_or(ProviderError::UnknownIdentity(*identity))?;

        let public_key = keypair.public_key_parts();
        let signature = keypair.sign_prehash(&registration_digest(&public_key))?;
        Ok(RegistrationData::new(public_key, signature))
    }
}

#[async_trait]
impl RegistrationDataProvider for KeystoreDataProvider {
    async fn provide_registration_data(
        &self,
        identity: &IdentityAddress,
    ) -> anyhow::Result<RegistrationData> {
        Ok(self.sign_registration(identity)?)
    }
}
