//! Persistent contract storage abstraction.
//!
//! Values are addressed by `(contract, object, key)`: the contract is the
//! namespace that owns the value, the object groups related keys inside it.
//! Implementations use interior mutability so a single store can be shared
//! by a VM and every sub-context it spawns.

use crate::error::HostError;

pub trait ContractStore: Send + Sync {
    /// Read a value. Returns `Err(HostError::NotFound)` if the key is absent.
    fn get_str_value(&self, contract: &[u8], object: &[u8], key: &[u8]) -> Result<Vec<u8>, HostError>;

    /// Insert or overwrite a value.
    fn set_str_value(&self, contract: &[u8], object: &[u8], key: &[u8], value: &[u8]) -> Result<(), HostError>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove_str_value(&self, contract: &[u8], object: &[u8], key: &[u8]) -> Result<(), HostError>;
}
