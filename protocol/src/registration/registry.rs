//! In-memory [`IdentityRegistry`] for local networks and tests, where there
//! is no deployed payments contract to query.

use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::Arc;

use super::resolver::IdentityRegistry;
use crate::identity::IdentityAddress;

/// A concurrent set of registered identities.
///
/// Cheap to clone; clones share the same set, so a handle kept by the node
/// can mark identities registered while the resolver reads through another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    registered: Arc<DashSet<IdentityAddress>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an initial set of registered identities.
    pub fn with_registered(identities: impl IntoIterator<Item = IdentityAddress>) -> Self {
        let registry = Self::new();
        for identity in identities {
            registry.mark_registered(identity);
        }
        registry
    }

    /// Returns `true` if the identity was not registered before.
    pub fn mark_registered(&self, identity: IdentityAddress) -> bool {
        let added = self.registered.insert(identity);
        if added {
            tracing::info!(identity = %identity, "identity marked registered");
        }
        added
    }

    /// Returns `true` if the identity was registered before.
    pub fn unregister(&self, identity: &IdentityAddress) -> bool {
        self.registered.remove(identity).is_some()
    }

    pub fn contains(&self, identity: &IdentityAddress) -> bool {
        self.registered.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryRegistry {
    async fn is_registered(&self, identity: &IdentityAddress) -> anyhow::Result<bool> {
        Ok(self.contains(identity))
    }
}
