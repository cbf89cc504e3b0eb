//! Guest-visible error codes.
//!
//! Every failed host call surfaces to the calling contract as one of these
//! codes. The repr values are part of the contract ABI and must not change.

use std::fmt;

/// Host-call error codes. `0` = OK, non-zero = error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    Arity = 1,
    Bounds = 2,
    Overlap = 3,
    TruncatedInput = 4,
    UnsupportedType = 5,
    NotFound = 6,
    InvalidNumber = 7,
    BufferTooSmall = 8,
    LengthMismatch = 9,
    Allocation = 10,
    InvalidEncoding = 11,
    HandoffClosed = 12,
    Internal = 13,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Arity => write!(f, "ERR_ARITY"),
            Self::Bounds => write!(f, "ERR_BOUNDS"),
            Self::Overlap => write!(f, "ERR_OVERLAP"),
            Self::TruncatedInput => write!(f, "ERR_TRUNCATED_INPUT"),
            Self::UnsupportedType => write!(f, "ERR_UNSUPPORTED_TYPE"),
            Self::NotFound => write!(f, "ERR_NOT_FOUND"),
            Self::InvalidNumber => write!(f, "ERR_INVALID_NUMBER"),
            Self::BufferTooSmall => write!(f, "ERR_BUFFER_TOO_SMALL"),
            Self::LengthMismatch => write!(f, "ERR_LENGTH_MISMATCH"),
            Self::Allocation => write!(f, "ERR_ALLOCATION"),
            Self::InvalidEncoding => write!(f, "ERR_INVALID_ENCODING"),
            Self::HandoffClosed => write!(f, "ERR_HANDOFF_CLOSED"),
            Self::Internal => write!(f, "ERR_INTERNAL"),
        }
    }
}
