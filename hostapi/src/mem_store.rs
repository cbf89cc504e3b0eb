//! In-memory contract store and an empty role provider for testing.
//!
//! `MemContractStore` implements `ContractStore` using a `BTreeMap` for
//! deterministic key ordering. Useful for unit tests and integration tests
//! where a real storage backend is not needed.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::contract_store::ContractStore;
use crate::error::HostError;
use crate::traits::RoleProvider;

type StoreKey = (Vec<u8>, Vec<u8>, Vec<u8>);

/// In-memory contract store backed by `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemContractStore {
    data: RwLock<BTreeMap<StoreKey, Vec<u8>>>,
}

fn store_key(contract: &[u8], object: &[u8], key: &[u8]) -> StoreKey {
    (contract.to_vec(), object.to_vec(), key.to_vec())
}

fn poisoned<T>(_: T) -> HostError {
    HostError::Internal("contract store lock poisoned".into())
}

impl MemContractStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value directly, bypassing the trait.
    pub fn insert(&self, contract: &str, object: &str, key: &str, value: &[u8]) {
        if let Ok(mut data) = self.data.write() {
            data.insert(
                store_key(contract.as_bytes(), object.as_bytes(), key.as_bytes()),
                value.to_vec(),
            );
        }
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContractStore for MemContractStore {
    fn get_str_value(&self, contract: &[u8], object: &[u8], key: &[u8]) -> Result<Vec<u8>, HostError> {
        let data = self.data.read().map_err(poisoned)?;
        data.get(&store_key(contract, object, key))
            .cloned()
            .ok_or(HostError::NotFound)
    }

    fn set_str_value(&self, contract: &[u8], object: &[u8], key: &[u8], value: &[u8]) -> Result<(), HostError> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(store_key(contract, object, key), value.to_vec());
        Ok(())
    }

    fn remove_str_value(&self, contract: &[u8], object: &[u8], key: &[u8]) -> Result<(), HostError> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.remove(&store_key(contract, object, key));
        Ok(())
    }
}

/// Role provider for embedders without a chain behind them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoles;

impl RoleProvider for NoRoles {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = MemContractStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_str_value(b"c", b"o", b"k"), Err(HostError::NotFound));
    }

    #[test]
    fn test_set_and_get() {
        let store = MemContractStore::new();
        store.set_str_value(b"bank", b"balances", b"alice", b"100").unwrap();
        assert_eq!(store.get_str_value(b"bank", b"balances", b"alice").unwrap(), b"100");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = MemContractStore::new();
        store.insert("bank", "balances", "alice", b"100");
        assert!(store.get_str_value(b"other", b"balances", b"alice").is_err());
        assert!(store.get_str_value(b"bank", b"limits", b"alice").is_err());
    }

    #[test]
    fn test_overwrite() {
        let store = MemContractStore::new();
        store.set_str_value(b"c", b"o", b"k", b"v1").unwrap();
        store.set_str_value(b"c", b"o", b"k", b"v2").unwrap();
        assert_eq!(store.get_str_value(b"c", b"o", b"k").unwrap(), b"v2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = MemContractStore::new();
        store.insert("c", "o", "k", b"v");
        store.remove_str_value(b"c", b"o", b"k").unwrap();
        assert!(store.is_empty());
        // Removing again is fine.
        store.remove_str_value(b"c", b"o", b"k").unwrap();
    }

    #[test]
    fn test_empty_key_and_value() {
        let store = MemContractStore::new();
        store.set_str_value(b"c", b"", b"", b"").unwrap();
        assert_eq!(store.get_str_value(b"c", b"", b"").unwrap(), Vec::<u8>::new());
    }
}
