use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Header field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Signature,
    Version,
    Format,
    LuacData,
    IntSize,
    SizeTSize,
    InstructionSize,
    IntegerSize,
    NumberSize,
    Endianness,
    FloatFormat,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            HeaderField::Signature => "not a precompiled chunk",
            HeaderField::Version => "version mismatch",
            HeaderField::Format => "format mismatch",
            HeaderField::LuacData => "corrupted",
            HeaderField::IntSize => "int size mismatch",
            HeaderField::SizeTSize => "size_t size mismatch",
            HeaderField::InstructionSize => "Instruction size mismatch",
            HeaderField::IntegerSize => "lua_Integer size mismatch",
            HeaderField::NumberSize => "lua_Number size mismatch",
            HeaderField::Endianness => "endianness mismatch",
            HeaderField::FloatFormat => "float format mismatch",
        };
        f.write_str(reason)
    }
}

/// Errors raised while decoding a binary chunk.
///
/// Every variant is fatal. Offsets are byte positions into the chunk where the
/// failing read started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("bad header: {field} (offset {offset:#x})")]
    HeaderMismatch { field: HeaderField, offset: usize },

    #[error("truncated chunk: needed {needed} byte(s) at offset {offset:#x}, {available} left")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("corrupted constant tag {tag:#04x} at offset {offset:#x}")]
    CorruptedConstantTag { tag: u8, offset: usize },

    #[error("{what} size {declared} exceeds limit {limit} at offset {offset:#x}")]
    AllocationLimitExceeded {
        what: &'static str,
        declared: u64,
        limit: usize,
        offset: usize,
    },

    #[error("functions nested deeper than {limit} levels at offset {offset:#x}")]
    NestingTooDeep { limit: usize, offset: usize },

    #[error("{count} trailing byte(s) after the main function at offset {offset:#x}")]
    TrailingBytes { offset: usize, count: usize },
}

impl DecodeError {
    /// Byte offset at which decoding stopped
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::HeaderMismatch { offset, .. }
            | DecodeError::TruncatedInput { offset, .. }
            | DecodeError::CorruptedConstantTag { offset, .. }
            | DecodeError::AllocationLimitExceeded { offset, .. }
            | DecodeError::NestingTooDeep { offset, .. }
            | DecodeError::TrailingBytes { offset, .. } => offset,
        }
    }
}
