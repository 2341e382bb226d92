use super::decoder::ChunkDecoder;
use super::error::Result;
use super::string::LuaString;

/// Represents a local variable debug information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub varname: LuaString, // Variable name
    pub startpc: u32,       // First instruction index where the variable is active
    pub endpc: u32,         // First instruction index where the variable is dead
}

/// Represents debug information for a function.
///
/// Every table is empty when the chunk was compiled with `luac -s`. The
/// upvalue name list may also be shorter than the function's upvalue list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugInfo {
    pub lineinfo: Vec<u32>,            // Source line of each instruction
    pub locals: Vec<LocalVariable>,    // Local variable information
    pub upvalue_names: Vec<LuaString>, // Upvalue names
}

impl DebugInfo {
    pub fn is_stripped(&self) -> bool {
        self.lineinfo.is_empty() && self.locals.is_empty() && self.upvalue_names.is_empty()
    }

    /// Source line of the instruction at `pc`, if line info is present
    pub fn line(&self, pc: usize) -> Option<u32> {
        self.lineinfo.get(pc).copied()
    }

    /// Name of upvalue `index`, if recorded
    pub fn upvalue_name(&self, index: usize) -> Option<&LuaString> {
        self.upvalue_names.get(index)
    }
}

impl ChunkDecoder<'_> {
    fn decode_local_variable(&mut self) -> Result<LocalVariable> {
        let varname = self.cursor.read_string()?;
        let startpc = self.cursor.read_u32()?;
        let endpc = self.cursor.read_u32()?;

        Ok(LocalVariable {
            varname,
            startpc,
            endpc,
        })
    }

    /// Decodes the trailing debug tables (line info, locals, upvalue names)
    pub(super) fn decode_debug_info(&mut self) -> Result<DebugInfo> {
        let lineinfo = self.read_words("line info")?;
        let locals = self.read_section("local variable", Self::decode_local_variable)?;
        let upvalue_names = self.read_section("upvalue name", |d| d.cursor.read_string())?;

        Ok(DebugInfo {
            lineinfo,
            locals,
            upvalue_names,
        })
    }
}
