//! Reader for precompiled Lua 5.3 chunks (`luac` output).
//!
//! [`undump`] validates the chunk header and decodes the main function with
//! all nested functions into an owned [`Prototype`] tree.

pub mod listing;
pub mod parser;

pub use parser::{
    ByteCursor, ChunkDecoder, Constant, DecodeError, DecoderOptions, HeaderField, LuaString,
    Prototype, undump, undump_with_options,
};
