pub mod constants;
pub mod cursor;
pub mod debug;
pub mod decoder;
pub mod error;
pub mod function;
pub mod header;
pub mod options;
pub mod string;

pub use constants::{Constant, ConstantTag};
pub use cursor::ByteCursor;
pub use debug::{DebugInfo, LocalVariable};
pub use decoder::ChunkDecoder;
pub use error::{DecodeError, HeaderField};
pub use function::{Prototype, Upvalue};
pub use header::Header;
pub use options::DecoderOptions;
pub use string::LuaString;

/// Main entry point for decoding a Lua 5.3 binary chunk
pub fn undump(input: &[u8]) -> error::Result<Prototype> {
    ChunkDecoder::new(input).decode()
}

/// Same as [`undump`], with explicit safety bounds
pub fn undump_with_options(input: &[u8], options: &DecoderOptions) -> error::Result<Prototype> {
    ChunkDecoder::with_options(input, options.clone()).decode()
}
