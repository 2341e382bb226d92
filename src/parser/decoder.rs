use std::mem::size_of;

use log::{debug, trace, warn};

use super::cursor::ByteCursor;
use super::error::{DecodeError, Result};
use super::function::Prototype;
use super::options::DecoderOptions;
use super::string::LuaString;

/// Upper bound, in bytes, on what a section reserves before its elements are decoded
const MAX_INITIAL_CAPACITY_BYTES: usize = 64 * 1024;

/// Decodes one binary chunk into a tree of [`Prototype`]s.
///
/// A decoder owns its cursor, so independent chunks can be decoded in
/// parallel by giving each one its own decoder.
#[derive(Debug, Clone)]
pub struct ChunkDecoder<'a> {
    pub(super) cursor: ByteCursor<'a>,
    pub(super) options: DecoderOptions,
    pub(super) depth: usize,
}

impl<'a> ChunkDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, DecoderOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: DecoderOptions) -> Self {
        let cursor = ByteCursor::new(data).with_max_string_len(options.max_string_len);
        Self {
            cursor,
            options,
            depth: 0,
        }
    }

    pub fn cursor(&self) -> &ByteCursor<'a> {
        &self.cursor
    }

    /// Decodes the whole chunk: header, main-function upvalue count and the
    /// main function with everything nested inside it.
    pub fn decode(mut self) -> Result<Prototype> {
        self.validate_header()?;

        // luac writes the main closure's upvalue count ahead of the function;
        // the prototype carries its own upvalue list.
        let upvalue_count = self.cursor.read_byte()?;
        trace!("main closure upvalue count: {}", upvalue_count);

        let main = self.decode_prototype(&LuaString::new())?;

        let leftover = self.cursor.remaining();
        if leftover > 0 {
            let offset = self.cursor.position();
            if !self.options.allow_trailing_bytes {
                return Err(DecodeError::TrailingBytes {
                    offset,
                    count: leftover,
                });
            }
            warn!(
                "ignoring {} trailing byte(s) after the main function at offset {:#x}",
                leftover, offset
            );
        }

        debug!(
            "decoded chunk {:?}: {} function(s)",
            main.source_name,
            main.function_count()
        );

        Ok(main)
    }

    /// Reads a section length and checks it against the configured bound
    pub(super) fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let offset = self.cursor.position();
        let declared = self.cursor.read_u32()?;
        let limit = self.options.max_sequence_len;

        usize::try_from(declared)
            .ok()
            .filter(|&len| len <= limit)
            .ok_or(DecodeError::AllocationLimitExceeded {
                what,
                declared: u64::from(declared),
                limit,
                offset,
            })
    }

    /// Reads a length-prefixed section, decoding each element with `element`
    pub(super) fn read_section<T, F>(
        &mut self,
        what: &'static str,
        mut element: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let len = self.read_count(what)?;
        let reserve = len
            .min(self.cursor.remaining())
            .min(MAX_INITIAL_CAPACITY_BYTES / size_of::<T>().max(1));
        let mut items = Vec::with_capacity(reserve);
        for _ in 0..len {
            items.push(element(self)?);
        }
        Ok(items)
    }

    /// Reads a length-prefixed array of 32-bit words
    pub(super) fn read_words(&mut self, what: &'static str) -> Result<Vec<u32>> {
        let len = self.read_count(what)?;
        self.cursor.read_u32_array(len)
    }
}
