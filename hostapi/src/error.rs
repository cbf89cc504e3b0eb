//! Host-side error type for collaborator failures.
//!
//! `HostError` is what allocators and stores report back to the bridge.
//! The bridge decides whether a failure aborts the host call (allocation)
//! or is downgraded to a status flag (storage).

use envcall_primitives::ErrorCode;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The allocator cannot satisfy a request.
    OutOfMemory { requested: usize, available: usize },
    /// The key does not exist in the store.
    NotFound,
    /// The backing store failed.
    Store(String),
    /// An internal host error not directly mapped to a guest code.
    Internal(String),
}

impl HostError {
    /// The code reported to the contract.
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            Self::OutOfMemory { .. } => ErrorCode::Allocation,
            Self::NotFound => ErrorCode::NotFound,
            Self::Store(_) | Self::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn out_of_memory(requested: usize, available: usize) -> Self {
        Self::OutOfMemory { requested, available }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested, available } => write!(
                f,
                "out of memory: requested {} bytes, {} available",
                requested, available
            ),
            Self::NotFound => write!(f, "key not found"),
            Self::Store(msg) => write!(f, "store error: {}", msg),
            Self::Internal(msg) => write!(f, "internal host error: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}
