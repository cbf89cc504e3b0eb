//! Built-in host function implementations, grouped by concern.
//!
//! Each handler validates its arity first, then reads and writes memory only
//! through the call's [`MemoryView`](crate::memory::MemoryView).

pub mod calls;
pub mod console;
pub mod marshal;
pub mod memory_ops;
pub mod params;
pub mod storage;

use crate::error::BridgeError;

/// A guest-supplied size as a host size.
///
/// Sizes that do not fit saturate and are then refused by the allocator.
pub(crate) fn host_size(size: u64) -> usize {
    usize::try_from(size).unwrap_or(usize::MAX)
}

/// An address that must fit a 32-bit inline slot.
pub(crate) fn addr32(addr: u64) -> Result<u32, BridgeError> {
    u32::try_from(addr).map_err(|_| BridgeError::Bounds {
        addr,
        len: 0,
        size: u32::MAX as usize,
    })
}

pub(crate) fn utf8<'a>(bytes: &'a [u8], what: &'static str) -> Result<&'a str, BridgeError> {
    std::str::from_utf8(bytes).map_err(|_| BridgeError::InvalidEncoding(what))
}
