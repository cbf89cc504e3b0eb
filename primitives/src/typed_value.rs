//! `{type, val}` typed-value documents.
//!
//! Script-level callers build contract parameters as JSON:
//!
//! ```json
//! {"params": [{"type": "int", "val": "7"}, {"type": "int_array", "val": "1,2,3"}]}
//! ```
//!
//! Values are decimal text; arrays are comma-separated decimal text. Type
//! names are matched case-insensitively.

use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The value types a typed-value document can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Int64,
    String,
    IntArray,
    Int64Array,
}

impl ParamType {
    /// Parse a type name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "int" => Some(Self::Int),
            "int64" => Some(Self::Int64),
            "string" => Some(Self::String),
            "int_array" => Some(Self::IntArray),
            "int64_array" => Some(Self::Int64Array),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::IntArray => "int_array",
            Self::Int64Array => "int64_array",
        }
    }

    /// Bytes this value occupies inline in a packed blob.
    ///
    /// Strings and arrays are stored out-of-line; the blob holds their address.
    pub fn inline_width(self) -> usize {
        match self {
            Self::Int | Self::String | Self::IntArray => 4,
            Self::Int64 | Self::Int64Array => 8,
        }
    }
}

/// One `{type, val}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    #[serde(rename = "type")]
    pub ty: String,
    pub val: String,
}

impl TypedValue {
    pub fn new(ty: ParamType, val: impl Into<String>) -> Self {
        Self {
            ty: ty.as_str().to_string(),
            val: val.into(),
        }
    }

    pub fn param_type(&self) -> Option<ParamType> {
        ParamType::parse(&self.ty)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// An ordered list of typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamList {
    pub params: Vec<TypedValue>,
}

impl ParamList {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Parse comma-separated decimal text. Empty text is an empty list.
pub fn parse_list<T: FromStr<Err = ParseIntError>>(text: &str) -> Result<Vec<T>, ParseIntError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(|item| item.trim().parse()).collect()
}

/// Format values as comma-separated decimal text.
pub fn format_list<T: Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn encode_i32_array(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn encode_i64_array(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decode packed i32 LE elements. Trailing partial elements are ignored.
pub fn decode_i32_array(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Decode packed i64 LE elements. Trailing partial elements are ignored.
pub fn decode_i64_array(bytes: &[u8]) -> Vec<i64> {
    bytes
        .chunks_exact(8)
        .map(|c| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(c);
            i64::from_le_bytes(buf)
        })
        .collect()
}
