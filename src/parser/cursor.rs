use nom::{
    Parser,
    bytes::complete::take,
    multi::count,
    number::complete::{le_u32, le_u64, u8},
};

use super::error::{DecodeError, Result};
use super::string::LuaString;

/// Size byte announcing that the real string size follows as a `size_t`
pub const LONG_STRING_ESCAPE: u8 = 0xFF;

pub const DEFAULT_MAX_STRING_LEN: usize = 1 << 30;

/// Forward-only reader over an immutable chunk buffer.
///
/// Every read either consumes exactly the bytes it decodes or fails without
/// moving; there is no way to look ahead or step back.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    max_string_len: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            max_string_len: DEFAULT_MAX_STRING_LEN,
        }
    }

    /// Caps the payload size accepted by [`ByteCursor::read_string`]
    pub fn with_max_string_len(mut self, limit: usize) -> Self {
        self.max_string_len = limit;
        self
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Runs a complete-input nom parser on the unread bytes and commits the
    /// position only on success.
    fn run<T, P>(&mut self, needed: usize, mut parser: P) -> Result<T>
    where
        P: Parser<&'a [u8], Output = T, Error = nom::error::Error<&'a [u8]>>,
    {
        let data = self.data;
        let offset = self.pos;
        let input = &data[offset..];

        match parser.parse(input) {
            Ok((rest, value)) => {
                self.pos = data.len() - rest.len();
                Ok(value)
            }
            Err(_) => Err(DecodeError::TruncatedInput {
                offset,
                needed,
                available: input.len(),
            }),
        }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.run(1, u8)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.run(4, le_u32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.run(8, le_u64)
    }

    /// Reads a `lua_Integer`: the 8 bytes of a `u64`, reinterpreted as signed
    pub fn read_lua_integer(&mut self) -> Result<i64> {
        self.read_u64().map(|bits| bits as i64)
    }

    /// Reads a `lua_Number`: the 8 bytes of a `u64`, reinterpreted as an IEEE-754 double
    pub fn read_lua_number(&mut self) -> Result<f64> {
        self.read_u64().map(f64::from_bits)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.run(n, take(n))
    }

    /// Reads `n` consecutive little-endian words
    pub fn read_u32_array(&mut self, n: usize) -> Result<Vec<u32>> {
        self.run(n.saturating_mul(4), count(le_u32, n))
    }

    /// Reads a length-prefixed string.
    ///
    /// The size byte holds `len + 1`, with 0 meaning "no string" and
    /// [`LONG_STRING_ESCAPE`] meaning the size follows as a `u64`.
    pub fn read_string(&mut self) -> Result<LuaString> {
        let offset = self.pos;
        let mut size = u64::from(self.read_byte()?);
        if size == u64::from(LONG_STRING_ESCAPE) {
            size = self.read_u64()?;
        }
        if size == 0 {
            return Ok(LuaString::new());
        }

        let declared = size - 1;
        let len = usize::try_from(declared)
            .ok()
            .filter(|&len| len <= self.max_string_len)
            .ok_or(DecodeError::AllocationLimitExceeded {
                what: "string",
                declared,
                limit: self.max_string_len,
                offset,
            })?;

        self.read_bytes(len).map(LuaString::from)
    }
}
