//! `envcall-primitives` — foundational types for the envcall host bridge.
//!
//! This crate provides the types shared by the host-function bridge and its
//! collaborators:
//!
//! - [`types`] — memory addresses, semantic type tags, little-endian helpers
//! - [`error`] — guest-visible error codes
//! - [`codec`] — the sequential binary parameter stream (length-prefix escaping)
//! - [`typed_value`] — `{type, val}` JSON documents used for dynamic marshaling
//! - [`transaction`] — transactions and the context envelope exchanged between contracts

pub mod types;
pub mod error;
pub mod codec;
pub mod typed_value;
pub mod transaction;

// Re-export commonly used types at the crate root for convenience.
pub use types::{Address, Hash, SemanticType, TypeTag};
pub use error::ErrorCode;
pub use codec::{CodecError, ParamReader, ParamWriter};
pub use typed_value::{ParamList, ParamType, TypedValue};
pub use transaction::{ContextEnvelope, Transaction};
