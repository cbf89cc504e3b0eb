//! Bump allocator over a fixed region of linear memory.
//!
//! Allocations are bump-pointer style with 8-byte alignment and no
//! deallocation: a VM instance is short-lived and its memory is discarded
//! with it.

use envcall_primitives::{Address, SemanticType};

use crate::error::HostError;
use crate::traits::Allocator;

#[derive(Debug, Clone)]
pub struct BumpAllocator {
    /// Base address of the allocation region.
    base: usize,
    /// Current bump offset from base.
    bump: usize,
    /// Total bytes available in the region.
    capacity: usize,
}

impl BumpAllocator {
    /// Create an allocator for the region `[base, base + capacity)`.
    pub fn new(base: usize, capacity: usize) -> Self {
        Self {
            base,
            bump: 0,
            capacity,
        }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.bump
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.bump
    }
}

impl Allocator for BumpAllocator {
    fn allocate(&mut self, size: usize, _ty: SemanticType) -> Result<Address, HostError> {
        // Zero-sized requests still get a distinct address.
        let aligned = size
            .max(1)
            .checked_add(7)
            .map(|n| n & !7)
            .ok_or_else(|| HostError::out_of_memory(size, self.remaining()))?;
        if aligned > self.remaining() {
            return Err(HostError::out_of_memory(size, self.remaining()));
        }
        let ptr = self.base + self.bump;
        self.bump += aligned;
        Ok(ptr as Address)
    }
}
