use super::constants::Constant;
use super::debug::DebugInfo;
use super::decoder::ChunkDecoder;
use super::error::{DecodeError, Result};
use super::string::LuaString;

use log::debug;

/// Describes where a closure finds one of its upvalues when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upvalue {
    pub instack: u8, // Nonzero if the variable is a register of the enclosing function
    pub idx: u8,     // Register or upvalue index in the enclosing function
}

impl Upvalue {
    pub fn is_in_stack(&self) -> bool {
        self.instack != 0
    }
}

/// Represents a Lua function prototype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub source_name: LuaString,     // Chunk name, inherited from the enclosing function when absent
    pub line_defined: u32,          // Line where the function starts (0 for the main chunk)
    pub last_line_defined: u32,     // Line where the function ends (0 for the main chunk)
    pub num_params: u8,             // Number of fixed parameters
    pub is_vararg: u8,              // Whether the function accepts variable arguments
    pub max_stack_size: u8,         // Number of registers needed
    pub code: Vec<u32>,             // Raw instruction words
    pub constants: Vec<Constant>,   // Constants used in the function
    pub upvalues: Vec<Upvalue>,     // Upvalue descriptors
    pub prototypes: Vec<Prototype>, // Nested function prototypes
    pub debug_info: DebugInfo,      // Debug information
}

impl Prototype {
    /// Whether this is the implicit function wrapping a whole chunk
    pub fn is_main(&self) -> bool {
        self.line_defined == 0
    }

    pub fn is_vararg(&self) -> bool {
        self.is_vararg != 0
    }

    /// Number of prototypes in this subtree, including `self`
    pub fn function_count(&self) -> usize {
        1 + self
            .prototypes
            .iter()
            .map(Prototype::function_count)
            .sum::<usize>()
    }
}

impl ChunkDecoder<'_> {
    fn decode_upvalue(&mut self) -> Result<Upvalue> {
        let instack = self.cursor.read_byte()?;
        let idx = self.cursor.read_byte()?;
        Ok(Upvalue { instack, idx })
    }

    /// Decodes a nested prototype one level deeper than the current one
    fn decode_nested(&mut self, parent_source: &LuaString) -> Result<Prototype> {
        if self.depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep {
                limit: self.options.max_depth,
                offset: self.cursor.position(),
            });
        }

        self.depth += 1;
        let proto = self.decode_prototype(parent_source);
        self.depth -= 1;
        proto
    }

    /// Decodes one function prototype and, recursively, the prototypes nested
    /// inside it.
    ///
    /// An empty source name on the wire means "same as the enclosing
    /// function", so `parent_source` is substituted and handed down to the
    /// children.
    pub fn decode_prototype(&mut self, parent_source: &LuaString) -> Result<Prototype> {
        let offset = self.cursor.position();
        let mut source_name = self.cursor.read_string()?;
        if source_name.is_empty() {
            source_name = parent_source.clone();
        }

        let line_defined = self.cursor.read_u32()?;
        let last_line_defined = self.cursor.read_u32()?;
        let num_params = self.cursor.read_byte()?;
        let is_vararg = self.cursor.read_byte()?;
        let max_stack_size = self.cursor.read_byte()?;

        let code = self.read_words("code")?;
        let constants = self.read_section("constant", Self::decode_constant)?;
        let upvalues = self.read_section("upvalue", Self::decode_upvalue)?;
        let prototypes = self.read_section("function", |d| d.decode_nested(&source_name))?;
        let debug_info = self.decode_debug_info()?;

        let proto = Prototype {
            source_name,
            line_defined,
            last_line_defined,
            num_params,
            is_vararg,
            max_stack_size,
            code,
            constants,
            upvalues,
            prototypes,
            debug_info,
        };

        debug!(
            "function <{}:{},{}> at {:#x}: {} instructions, {} constants, {} upvalues, {} functions",
            proto.source_name,
            proto.line_defined,
            proto.last_line_defined,
            offset,
            proto.code.len(),
            proto.constants.len(),
            proto.upvalues.len(),
            proto.prototypes.len()
        );

        Ok(proto)
    }
}
