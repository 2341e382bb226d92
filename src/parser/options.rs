use super::cursor::DEFAULT_MAX_STRING_LEN;

/// Largest element count accepted for any length-prefixed section
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 1 << 26;

/// Same nesting limit the reference implementation applies to C calls (LUAI_MAXCCALLS)
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Safety bounds applied while decoding untrusted chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum declared length of a code, constant, upvalue, function or debug section
    pub max_sequence_len: usize,
    /// Maximum payload size of a single string
    pub max_string_len: usize,
    /// Maximum nesting of function prototypes below the main function
    pub max_depth: usize,
    /// Whether bytes left over after the main function are tolerated
    pub allow_trailing_bytes: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_bytes: true,
        }
    }
}

impl DecoderOptions {
    pub fn with_max_sequence_len(mut self, limit: usize) -> Self {
        self.max_sequence_len = limit;
        self
    }

    pub fn with_max_string_len(mut self, limit: usize) -> Self {
        self.max_string_len = limit;
        self
    }

    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn with_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }
}
