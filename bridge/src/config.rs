//! Bridge configuration.

/// Size of one linear-memory page.
pub const PAGE_SIZE: usize = 65536;

/// Configuration for a contract VM instance.
///
/// Controls memory layout and instruction fuel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Linear memory size in pages for natively hosted instances.
    /// Default: 16 pages = 1 MiB.
    pub memory_pages: u32,

    /// Pages reserved for host-side allocations (strings, arrays, documents).
    /// Natively hosted instances carve this region off the top of memory;
    /// Wasmtime instances grow memory by this many pages after instantiation.
    pub host_alloc_pages: u32,

    /// Wasmtime fuel limit (instruction metering).
    pub fuel_limit: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            memory_pages: 16,
            host_alloc_pages: 4, // 256 KiB
            fuel_limit: 100_000_000,
        }
    }
}

impl BridgeConfig {
    /// Total linear memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.memory_pages as usize * PAGE_SIZE
    }

    /// `(base, capacity)` of the host allocation region in native memory.
    pub fn host_alloc_region(&self) -> (usize, usize) {
        let capacity = self.host_alloc_pages.min(self.memory_pages) as usize * PAGE_SIZE;
        (self.memory_size() - capacity, capacity)
    }
}
