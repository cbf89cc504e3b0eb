//! Core type aliases, type tags and byte helpers.

/// Offset into a contract's linear memory.
pub type Address = u64;

/// 32-byte digest used to identify transactions.
pub type Hash = [u8; 32];

/// Semantic type of a region of linear memory.
///
/// Recorded alongside the byte length of every allocation so that
/// `arrayLen`-style queries can recover an element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    /// The writer could not state a type; treated as raw bytes.
    Unknown,
}

impl SemanticType {
    /// Width in bytes of one element of this type.
    pub fn element_width(self) -> usize {
        match self {
            Self::Int8 | Self::String | Self::Unknown => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }
}

/// Type and byte length of the region starting at some base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    pub ty: SemanticType,
    pub len: usize,
}

impl TypeTag {
    pub fn new(ty: SemanticType, len: usize) -> Self {
        Self { ty, len }
    }

    /// Number of whole elements in the region.
    pub fn element_count(&self) -> usize {
        self.len / self.ty.element_width()
    }
}

/// Bytes up to (not including) the first NUL, or the whole slice.
pub fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Convert a `Hash` to a hex string for display purposes.
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut s = String::with_capacity(66);
    s.push_str("0x");
    for byte in hash {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", byte);
    }
    s
}
