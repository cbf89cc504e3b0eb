//! Bridge error types.

use std::num::ParseIntError;

use envcall_hostapi::HostError;
use envcall_primitives::{CodecError, ErrorCode};

/// Failure of a single host call.
///
/// Every variant aborts the call and is surfaced to the calling contract;
/// nothing here is retried. Storage failures never appear here: they are
/// reported to the contract as a status flag instead.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Wrong number of parameter words for the called function.
    #[error("{func}: expected {expected} parameters, got {got}")]
    Arity {
        func: &'static str,
        expected: usize,
        got: usize,
    },

    /// Address range outside linear memory.
    #[error("memory access out of bounds: addr={addr}, len={len}, memory size={size}")]
    Bounds { addr: u64, len: u64, size: usize },

    /// Forward-overlapping copy.
    #[error("overlapping copy: dst={dst}, src={src}, len={len}")]
    Overlap { dst: u64, src: u64, len: u64 },

    /// No type tag is recorded at the address.
    #[error("no tagged region at address {0}")]
    Untagged(u64),

    /// Parameter stream read past its end.
    #[error(transparent)]
    TruncatedInput(#[from] CodecError),

    /// Unknown type name in a typed-value document.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Unregistered host function.
    #[error("host function not found: {0}")]
    NotFound(String),

    /// Decimal text in a typed-value document did not parse.
    #[error("invalid number {text:?}: {source}")]
    InvalidNumber {
        text: String,
        #[source]
        source: ParseIntError,
    },

    /// Destination buffer cannot hold the data.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: u64, available: u64 },

    /// Caller-declared length disagrees with the data.
    #[error("length mismatch: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: u64, got: u64 },

    /// Bytes that must be UTF-8 are not.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),

    /// Allocator or message source failure.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Malformed typed-value document.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The consumer of the call-context handoff has gone away.
    #[error("call context handoff closed")]
    HandoffClosed,
}

impl BridgeError {
    /// The code reported to the contract.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Arity { .. } => ErrorCode::Arity,
            Self::Bounds { .. } | Self::Untagged(_) => ErrorCode::Bounds,
            Self::Overlap { .. } => ErrorCode::Overlap,
            Self::TruncatedInput(_) => ErrorCode::TruncatedInput,
            Self::UnsupportedType(_) => ErrorCode::UnsupportedType,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InvalidNumber { .. } => ErrorCode::InvalidNumber,
            Self::BufferTooSmall { .. } => ErrorCode::BufferTooSmall,
            Self::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            Self::InvalidEncoding(_) | Self::Json(_) => ErrorCode::InvalidEncoding,
            Self::Host(err) => err.to_error_code(),
            Self::HandoffClosed => ErrorCode::HandoffClosed,
        }
    }
}

/// Errors from loading and running a contract module under Wasmtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Wasmtime engine, compilation, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module validation failed (missing memory, unknown imports, etc.).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The transaction names a method the module does not export.
    #[error("module does not export method {0:?}")]
    MissingMethod(String),

    /// Memory operation failed (grow failure, missing export).
    #[error("memory error: {0}")]
    MemoryError(String),

    /// A host call failed and aborted the contract.
    #[error("host call failed: {0}")]
    HostCall(BridgeError),

    /// Fuel exhausted during execution.
    #[error("fuel exhausted (instruction limit)")]
    FuelExhausted,

    /// WASM guest trapped.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}
