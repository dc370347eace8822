//! In-process keystore: the identities this node can produce registration
//! signatures for, keyed by address.

use dashmap::DashMap;
use std::sync::Arc;

use super::{IdentityAddress, IdentityKeypair};

/// Concurrent map from identity address to its keypair.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Clone, Default)]
pub struct IdentityKeystore {
    keys: Arc<DashMap<IdentityAddress, IdentityKeypair>>,
}

impl IdentityKeystore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keypair and return the address it controls. Importing the same
    /// key twice is a no-op.
    pub fn import(&self, keypair: IdentityKeypair) -> IdentityAddress {
        let address = keypair.address();
        self.keys.insert(address, keypair);
        tracing::debug!(identity = %address, "identity key imported");
        address
    }

    /// Generate a fresh identity, store it, and return its address.
    pub fn generate(&self) -> IdentityAddress {
        self.import(IdentityKeypair::generate())
    }

    pub fn contains(&self, address: &IdentityAddress) -> bool {
        self.keys.contains_key(address)
    }

    /// Copy of the keypair for `address`, if present.
    pub fn get(&self, address: &IdentityAddress) -> Option<IdentityKeypair> {
        self.keys.get(address).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, address: &IdentityAddress) -> bool {
        self.keys.remove(address).is_some()
    }

    /// All addresses in the keystore, sorted.
    pub fn addresses(&self) -> Vec<IdentityAddress> {
        let mut out: Vec<_> = self.keys.iter().map(|entry| *entry.key()).collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for IdentityKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityKeystore")
            .field("identities", &self.addresses())
            .finish()
    }
}
