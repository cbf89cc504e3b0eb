//! Context types shared between the bridge and its collaborators.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use envcall_primitives::Transaction;

use crate::contract_store::ContractStore;
use crate::error::HostError;
use crate::traits::{MessageSource, RoleProvider};

/// Interpreter state saved before a host call and handed back verbatim after it.
///
/// The bridge never looks inside; only the interpreter that produced it can
/// interpret the bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeContext(Vec<u8>);

impl ResumeContext {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self(raw.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Everything a running contract can reach: roles, storage and the
/// transaction that invoked it.
///
/// Shared by reference between a VM and the sub-contexts it spawns.
#[derive(Clone)]
pub struct ContractContext {
    pub roles: Arc<dyn RoleProvider>,
    pub store: Arc<dyn ContractStore>,
    pub trx: Transaction,
}

impl ContractContext {
    pub fn new(roles: Arc<dyn RoleProvider>, store: Arc<dyn ContractStore>, trx: Transaction) -> Self {
        Self { roles, store, trx }
    }

    /// A context for `trx` sharing this context's roles and store.
    pub fn child(&self, trx: Transaction) -> Self {
        Self {
            roles: Arc::clone(&self.roles),
            store: Arc::clone(&self.store),
            trx,
        }
    }

    /// The contract this context executes as.
    pub fn contract(&self) -> &str {
        &self.trx.contract
    }

    pub fn method(&self) -> &str {
        &self.trx.method
    }
}

impl fmt::Debug for ContractContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractContext")
            .field("trx", &self.trx)
            .finish_non_exhaustive()
    }
}

impl MessageSource for ContractContext {
    fn current_message_bytes(&self) -> Result<Bytes, HostError> {
        Ok(self.trx.param.clone())
    }
}
