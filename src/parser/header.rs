use super::decoder::ChunkDecoder;
use super::error::{DecodeError, HeaderField, Result};
use log::debug;

// lundump.h / luaconf.h values for a stock 64-bit Lua 5.3 build
pub const LUA_SIGNATURE: &[u8; 4] = b"\x1bLua";
pub const LUAC_VERSION: u8 = 0x53;
pub const LUAC_FORMAT: u8 = 0;
pub const LUAC_DATA: &[u8; 6] = b"\x19\x93\r\n\x1a\n";
pub const CINT_SIZE: u8 = 4;
pub const CSIZET_SIZE: u8 = 8;
pub const INSTRUCTION_SIZE: u8 = 4;
pub const LUA_INTEGER_SIZE: u8 = 8;
pub const LUA_NUMBER_SIZE: u8 = 8;
pub const LUAC_INT: i64 = 0x5678;
pub const LUAC_NUM: f64 = 370.5;

/// Encoded size of the header in bytes
pub const HEADER_SIZE: usize = 33;

/// Header metadata describing the bytecode format and target architecture
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub signature: [u8; 4],   // "\x1bLua"
    pub version: u8,          // Lua version (0x53 for Lua 5.3)
    pub format: u8,           // Bytecode format (0 for official Lua bytecode)
    pub luac_data: [u8; 6],   // Conversion check bytes
    pub size_int: u8,         // Size of a C int in bytes
    pub size_size_t: u8,      // Size of a size_t value in bytes
    pub size_instruction: u8, // Size of an instruction in bytes
    pub size_integer: u8,     // Size of a lua_Integer in bytes
    pub size_number: u8,      // Size of a lua_Number in bytes
    pub luac_int: i64,        // Reference integer, detects byte order
    pub luac_num: f64,        // Reference float, detects float format
}

fn mismatch(field: HeaderField, offset: usize) -> DecodeError {
    DecodeError::HeaderMismatch { field, offset }
}

impl ChunkDecoder<'_> {
    fn expect_bytes<const N: usize>(
        &mut self,
        field: HeaderField,
        expected: &[u8; N],
    ) -> Result<[u8; N]> {
        let offset = self.cursor.position();
        let found = self.cursor.read_bytes(N)?;
        if found != expected {
            return Err(mismatch(field, offset));
        }
        Ok(*expected)
    }

    fn expect_byte(&mut self, field: HeaderField, expected: u8) -> Result<u8> {
        let offset = self.cursor.position();
        let found = self.cursor.read_byte()?;
        if found != expected {
            return Err(mismatch(field, offset));
        }
        Ok(found)
    }

    /// Reads and checks the chunk header, stopping at the first field that
    /// does not match this build's expectations.
    pub fn validate_header(&mut self) -> Result<Header> {
        let signature = self.expect_bytes(HeaderField::Signature, LUA_SIGNATURE)?;
        let version = self.expect_byte(HeaderField::Version, LUAC_VERSION)?;
        let format = self.expect_byte(HeaderField::Format, LUAC_FORMAT)?;
        let luac_data = self.expect_bytes(HeaderField::LuacData, LUAC_DATA)?;

        let size_int = self.expect_byte(HeaderField::IntSize, CINT_SIZE)?;
        let size_size_t = self.expect_byte(HeaderField::SizeTSize, CSIZET_SIZE)?;
        let size_instruction = self.expect_byte(HeaderField::InstructionSize, INSTRUCTION_SIZE)?;
        let size_integer = self.expect_byte(HeaderField::IntegerSize, LUA_INTEGER_SIZE)?;
        let size_number = self.expect_byte(HeaderField::NumberSize, LUA_NUMBER_SIZE)?;

        let offset = self.cursor.position();
        let luac_int = self.cursor.read_lua_integer()?;
        if luac_int != LUAC_INT {
            return Err(mismatch(HeaderField::Endianness, offset));
        }

        let offset = self.cursor.position();
        let luac_num = self.cursor.read_lua_number()?;
        if luac_num.to_bits() != LUAC_NUM.to_bits() {
            return Err(mismatch(HeaderField::FloatFormat, offset));
        }

        let header = Header {
            signature,
            version,
            format,
            luac_data,
            size_int,
            size_size_t,
            size_instruction,
            size_integer,
            size_number,
            luac_int,
            luac_num,
        };

        debug!("Parsed header: {:#?}", header);

        Ok(header)
    }
}
