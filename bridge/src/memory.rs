//! Bounds-checked linear memory access plus the type-tag table.
//!
//! Every address handed to a host function is validated against the current
//! memory size before any byte is touched. Host-side allocations go through
//! [`MemoryView::allocate`], which is the only writer of the tag table.

use std::collections::BTreeMap;
use std::ops::Range;

use envcall_hostapi::Allocator;
use envcall_primitives::{types::until_nul, Address, SemanticType, TypeTag};

use crate::error::BridgeError;

/// Validate `[addr, addr+len)` against a memory of `size` bytes.
pub fn checked_range(size: usize, addr: u64, len: u64) -> Result<Range<usize>, BridgeError> {
    let bounds = || BridgeError::Bounds { addr, len, size };
    let start = usize::try_from(addr).map_err(|_| bounds())?;
    let count = usize::try_from(len).map_err(|_| bounds())?;
    let end = start.checked_add(count).ok_or_else(bounds)?;
    if end > size {
        return Err(bounds());
    }
    Ok(start..end)
}

/// Address-keyed record of what each host-allocated region holds.
#[derive(Debug, Clone, Default)]
pub struct TypeTagTable {
    tags: BTreeMap<Address, TypeTag>,
}

impl TypeTagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: Address) -> Option<TypeTag> {
        self.tags.get(&addr).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub(crate) fn record(&mut self, addr: Address, tag: TypeTag) {
        self.tags.insert(addr, tag);
    }
}

/// Borrowed view of one instance's memory, tag table, and allocator for the
/// duration of a host call.
pub struct MemoryView<'a> {
    bytes: &'a mut [u8],
    tags: &'a mut TypeTagTable,
    allocator: &'a mut dyn Allocator,
}

impl<'a> MemoryView<'a> {
    pub fn new(
        bytes: &'a mut [u8],
        tags: &'a mut TypeTagTable,
        allocator: &'a mut dyn Allocator,
    ) -> Self {
        Self {
            bytes,
            tags,
            allocator,
        }
    }

    /// Current memory size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Fail unless `[addr, addr+len)` lies inside memory.
    pub fn check(&self, addr: u64, len: u64) -> Result<(), BridgeError> {
        checked_range(self.size(), addr, len).map(|_| ())
    }

    pub fn read(&self, addr: u64, len: u64) -> Result<&[u8], BridgeError> {
        let range = checked_range(self.size(), addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write(&mut self, addr: u64, data: &[u8]) -> Result<(), BridgeError> {
        let range = checked_range(self.size(), addr, data.len() as u64)?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Copy `len` bytes from `src` to `dst`.
    ///
    /// A destination that starts below the source and runs into it is
    /// rejected before any bounds check. Every other ordering copies
    /// byte-for-byte as if through a temporary buffer.
    pub fn copy(&mut self, dst: u64, src: u64, len: u64) -> Result<(), BridgeError> {
        if dst < src && dst.saturating_add(len) > src {
            return Err(BridgeError::Overlap { dst, src, len });
        }
        let from = checked_range(self.size(), src, len)?;
        let to = checked_range(self.size(), dst, len)?;
        self.bytes.copy_within(from, to.start);
        Ok(())
    }

    pub fn fill(&mut self, dst: u64, value: u8, len: u64) -> Result<(), BridgeError> {
        let range = checked_range(self.size(), dst, len)?;
        self.bytes[range].fill(value);
        Ok(())
    }

    pub fn tag(&self, addr: Address) -> Option<TypeTag> {
        self.tags.get(addr)
    }

    /// Element count of the region at `addr`, or 0 when untagged.
    pub fn length_of(&self, addr: Address) -> u64 {
        self.tags.get(addr).map_or(0, |tag| tag.element_count() as u64)
    }

    /// Reserve `size` bytes and tag the region with `ty`.
    pub fn allocate(&mut self, size: usize, ty: SemanticType) -> Result<Address, BridgeError> {
        let addr = self.allocator.allocate(size, ty)?;
        checked_range(self.size(), addr, size as u64)?;
        self.tags.record(addr, TypeTag::new(ty, size));
        Ok(addr)
    }

    /// Write externally supplied bytes at `addr` and tag them.
    pub fn ingest(&mut self, addr: Address, data: &[u8], ty: SemanticType) -> Result<(), BridgeError> {
        self.write(addr, data)?;
        self.tags.record(addr, TypeTag::new(ty, data.len()));
        Ok(())
    }

    /// The full tagged region starting at `addr`.
    pub fn read_typed(&self, addr: Address) -> Result<&[u8], BridgeError> {
        let tag = self.tags.get(addr).ok_or(BridgeError::Untagged(addr))?;
        self.read(addr, tag.len as u64)
    }

    /// The tagged region at `addr` up to its first NUL.
    pub fn read_c_str(&self, addr: Address) -> Result<&[u8], BridgeError> {
        self.read_typed(addr).map(until_nul)
    }

    /// Allocate a region for `data` and copy it in.
    pub fn store_bytes(&mut self, data: &[u8], ty: SemanticType) -> Result<Address, BridgeError> {
        let addr = self.allocate(data.len(), ty)?;
        self.write(addr, data)?;
        Ok(addr)
    }

    /// Store `text` NUL-terminated; the tag length includes the terminator.
    pub fn store_str(&mut self, text: &[u8]) -> Result<Address, BridgeError> {
        let addr = self.allocate(text.len() + 1, SemanticType::String)?;
        self.write(addr, text)?;
        self.write(addr + text.len() as u64, &[0])?;
        Ok(addr)
    }
}

/// Owned linear memory for instances hosted outside Wasmtime.
#[derive(Debug, Clone)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    tags: TypeTagTable,
}

impl LinearMemory {
    /// Zero-filled memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            tags: TypeTagTable::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn tags(&self) -> &TypeTagTable {
        &self.tags
    }

    pub fn view<'a>(&'a mut self, allocator: &'a mut dyn Allocator) -> MemoryView<'a> {
        MemoryView::new(&mut self.bytes, &mut self.tags, allocator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envcall_hostapi::BumpAllocator;

    fn setup() -> (LinearMemory, BumpAllocator) {
        (LinearMemory::new(256), BumpAllocator::new(128, 128))
    }

    #[test]
    fn test_checked_range() {
        assert_eq!(checked_range(100, 0, 100).unwrap(), 0..100);
        assert!(checked_range(100, 0, 101).is_err());
        assert!(checked_range(100, 100, 0).is_ok());
        assert!(checked_range(100, 101, 0).is_err());
        assert!(checked_range(100, u64::MAX, 2).is_err());
    }

    #[test]
    fn test_read_write() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        view.write(10, &[1, 2, 3]).unwrap();
        assert_eq!(view.read(10, 3).unwrap(), &[1, 2, 3]);
        assert!(matches!(view.read(250, 10), Err(BridgeError::Bounds { .. })));
        assert!(view.write(255, &[1, 2]).is_err());
    }

    #[test]
    fn test_copy_forward_overlap_rejected() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        let err = view.copy(0, 2, 4).unwrap_err();
        assert!(matches!(err, BridgeError::Overlap { dst: 0, src: 2, len: 4 }));
    }

    #[test]
    fn test_copy_overlap_checked_before_bounds() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        assert!(matches!(view.copy(1000, 1002, 8), Err(BridgeError::Overlap { .. })));
    }

    #[test]
    fn test_copy_backward_overlap_allowed() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        view.write(0, &[1, 2, 3, 4]).unwrap();
        view.copy(2, 0, 4).unwrap();
        assert_eq!(view.read(0, 6).unwrap(), &[1, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn test_copy_adjacent() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        view.write(4, &[9, 8]).unwrap();
        view.copy(2, 4, 2).unwrap();
        assert_eq!(view.read(2, 2).unwrap(), &[9, 8]);
    }

    #[test]
    fn test_fill() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        view.fill(5, 0x41, 3).unwrap();
        assert_eq!(view.read(4, 5).unwrap(), &[0, 0x41, 0x41, 0x41, 0]);
        assert!(view.fill(254, 0, 3).is_err());
    }

    #[test]
    fn test_allocate_records_tag() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        let addr = view.allocate(12, SemanticType::Int32).unwrap();
        assert_eq!(addr, 128);
        assert_eq!(view.tag(addr), Some(TypeTag::new(SemanticType::Int32, 12)));
        assert_eq!(view.length_of(addr), 3);
        assert_eq!(view.length_of(addr + 1), 0);
    }

    #[test]
    fn test_store_str_is_nul_terminated() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        let addr = view.store_str(b"abc").unwrap();
        assert_eq!(view.tag(addr).unwrap().len, 4);
        assert_eq!(view.read(addr, 4).unwrap(), b"abc\0");
        assert_eq!(view.read_c_str(addr).unwrap(), b"abc");
    }

    #[test]
    fn test_read_typed_untagged() {
        let (mut mem, mut alloc) = setup();
        let view = mem.view(&mut alloc);
        assert!(matches!(view.read_typed(3), Err(BridgeError::Untagged(3))));
    }

    #[test]
    fn test_allocation_exhausted() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        assert!(matches!(
            view.allocate(512, SemanticType::Unknown),
            Err(BridgeError::Host(_))
        ));
        assert_eq!(mem.tags().len(), 0);
    }

    #[test]
    fn test_ingest_tags_region() {
        let (mut mem, mut alloc) = setup();
        let mut view = mem.view(&mut alloc);
        view.ingest(16, b"payload", SemanticType::Unknown).unwrap();
        assert_eq!(view.read_typed(16).unwrap(), b"payload");
        assert_eq!(mem.bytes()[16], b'p');
    }
}
