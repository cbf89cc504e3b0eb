//! Sequential binary parameter stream.
//!
//! Contract parameters travel as a packed little-endian byte stream read
//! front to back by a cursor:
//!
//! - `int32` / `int64`: 4 / 8 bytes LE
//! - `string`: a variable-width length prefix followed by that many bytes
//!
//! Length prefix:
//!
//! ```text
//! < 0xFD        length is the byte itself
//! 0xFD u16 LE   16-bit length
//! 0xFE u32 LE   32-bit length
//! 0xFF u64 LE   64-bit length
//! ```
//!
//! Reads past the end fail with [`CodecError::TruncatedInput`] and leave the
//! cursor where it was.

/// Escape byte for a 16-bit length.
pub const PREFIX_U16: u8 = 0xFD;
/// Escape byte for a 32-bit length.
pub const PREFIX_U32: u8 = 0xFE;
/// Escape byte for a 64-bit length.
pub const PREFIX_U64: u8 = 0xFF;

/// Errors produced while decoding a parameter stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("truncated input: need {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: u64,
        available: usize,
    },
}

/// A cursor over an encoded parameter stream.
#[derive(Debug, Clone)]
pub struct ParamReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at `pos` (a cursor saved from an earlier reader).
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn truncated(&self, needed: u64) -> CodecError {
        CodecError::TruncatedInput {
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.truncated(n as u64))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let b = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_le_bytes(buf))
    }

    /// Read a length prefix.
    pub fn read_var_len(&mut self) -> Result<u64, CodecError> {
        let start = self.pos;
        let result = match self.read_u8()? {
            PREFIX_U16 => self.read_u16().map(u64::from),
            PREFIX_U32 => self.read_u32().map(u64::from),
            PREFIX_U64 => self.read_u64(),
            n => Ok(u64::from(n)),
        };
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    /// Read a length-prefixed string, returning its raw bytes.
    pub fn read_string(&mut self) -> Result<&'a [u8], CodecError> {
        let start = self.pos;
        let len = self.read_var_len()?;
        let body = usize::try_from(len)
            .map_err(|_| self.truncated(len))
            .and_then(|n| self.read_bytes(n));
        if body.is_err() {
            self.pos = start;
        }
        body
    }
}

/// Builds an encoded parameter stream.
#[derive(Debug, Clone, Default)]
pub struct ParamWriter {
    buf: Vec<u8>,
}

impl ParamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// Write a length prefix using the shortest form.
    pub fn write_var_len(&mut self, len: u64) -> &mut Self {
        if len < u64::from(PREFIX_U16) {
            self.buf.push(len as u8);
        } else if len <= u64::from(u16::MAX) {
            self.buf.push(PREFIX_U16);
            self.buf.extend_from_slice(&(len as u16).to_le_bytes());
        } else if len <= u64::from(u32::MAX) {
            self.buf.push(PREFIX_U32);
            self.buf.extend_from_slice(&(len as u32).to_le_bytes());
        } else {
            self.buf.push(PREFIX_U64);
            self.buf.extend_from_slice(&len.to_le_bytes());
        }
        self
    }

    pub fn write_string(&mut self, s: &[u8]) -> &mut Self {
        self.write_var_len(s.len() as u64);
        self.buf.extend_from_slice(s);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
