//! Errors surfaced by [`RegistrationStatusResolver`](super::RegistrationStatusResolver).
//!
//! The resolver only classifies by which step failed. Collaborator errors
//! are carried through untouched as the `source`.

use thiserror::Error;

use crate::identity::IdentityAddress;

/// Every way resolving an identity's registration status can fail.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The registry could not answer whether the identity is registered.
    #[error("registry query failed for {identity}: {source}")]
    RegistryQueryFailed {
        identity: IdentityAddress,
        #[source]
        source: anyhow::Error,
    },

    /// The identity is unregistered but no registration data could be
    /// produced for it.
    #[error("registration data provisioning failed for {identity}: {source}")]
    DataProvisioningFailed {
        identity: IdentityAddress,
        #[source]
        source: anyhow::Error,
    },

    /// The provider reported success but left a part out. This is a defect
    /// in the provider and is never papered over with zero-filled fields.
    #[error("provider returned incomplete registration data for {identity}: missing {missing}")]
    IncompleteRegistrationData {
        identity: IdentityAddress,
        missing: &'static str,
    },
}

impl ResolveError {
    /// Short, stable name of the failing step, for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::RegistryQueryFailed { .. } => "registry_query_failed",
            ResolveError::DataProvisioningFailed { .. } => "data_provisioning_failed",
            ResolveError::IncompleteRegistrationData { .. } => "incomplete_registration_data",
        }
    }

    pub fn identity(&self) -> &IdentityAddress {
        match self {
            ResolveError::RegistryQueryFailed { identity, .. }
            | ResolveError::DataProvisioningFailed { identity, .. }
            | ResolveError::IncompleteRegistrationData { identity, .. } => identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn collaborator_error_is_kept_as_source() {
        let identity = IdentityAddress::from_bytes([3; 20]);
        let err = ResolveError::RegistryQueryFailed {
            identity,
            source: anyhow::anyhow!("rpc timeout"),
        };
        assert_eq!(err.kind(), "registry_query_failed");
        assert_eq!(err.identity(), &identity);
        assert!(err.to_string().contains("rpc timeout"));
        assert_eq!(err.source().unwrap().to_string(), "rpc timeout");
    }

    #[test]
    fn incomplete_data_names_missing_part() {
        let err = ResolveError::IncompleteRegistrationData {
            identity: IdentityAddress::from_bytes([4; 20]),
            missing: "PublicKey",
        };
        assert_eq!(err.kind(), "incomplete_registration_data");
        assert!(err.to_string().ends_with("missing PublicKey"));
        assert!(err.source().is_none());
    }
}
