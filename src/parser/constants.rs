use log::trace;
use num_enum::TryFromPrimitive;

use super::decoder::ChunkDecoder;
use super::error::{DecodeError, Result};
use super::string::LuaString;

/// Wire tags of the constant pool (lobject.h variant tags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ConstantTag {
    Nil = 0x00,
    Boolean = 0x01,
    Number = 0x03,
    ShortString = 0x04,
    Integer = 0x13,
    LongString = 0x14,
}

/// An entry of a function's constant pool.
///
/// Short and long strings are distinct on the wire but decode to the same
/// [`Constant::String`] variant.
#[derive(Debug, Clone)]
pub enum Constant {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(LuaString),
}

// Numbers compare by bit pattern, NaN payloads included.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Nil, Constant::Nil) => true,
            (Constant::Boolean(a), Constant::Boolean(b)) => a == b,
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::Number(a), Constant::Number(b)) => a.to_bits() == b.to_bits(),
            (Constant::String(a), Constant::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl ChunkDecoder<'_> {
    /// Decodes one self-describing constant pool entry
    pub fn decode_constant(&mut self) -> Result<Constant> {
        let offset = self.cursor.position();
        let tag_byte = self.cursor.read_byte()?;
        let tag = ConstantTag::try_from(tag_byte)
            .map_err(|_| DecodeError::CorruptedConstantTag { tag: tag_byte, offset })?;

        let constant = match tag {
            ConstantTag::Nil => Constant::Nil,
            ConstantTag::Boolean => Constant::Boolean(self.cursor.read_byte()? != 0),
            ConstantTag::Integer => Constant::Integer(self.cursor.read_lua_integer()?),
            ConstantTag::Number => Constant::Number(self.cursor.read_lua_number()?),
            ConstantTag::ShortString | ConstantTag::LongString => {
                Constant::String(self.cursor.read_string()?)
            }
        };

        trace!("constant {:?} at {:#x}: {:?}", tag, offset, constant);

        Ok(constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Constant> {
        ChunkDecoder::new(bytes).decode_constant()
    }

    #[test]
    fn nil_has_no_payload() {
        let mut decoder = ChunkDecoder::new(&[0x00, 0x00]);
        assert_eq!(decoder.decode_constant(), Ok(Constant::Nil));
        assert_eq!(decoder.cursor().position(), 1);
    }

    #[test]
    fn boolean_is_any_nonzero_byte() {
        assert_eq!(decode(&[0x01, 0x00]), Ok(Constant::Boolean(false)));
        assert_eq!(decode(&[0x01, 0x01]), Ok(Constant::Boolean(true)));
        assert_eq!(decode(&[0x01, 0x7f]), Ok(Constant::Boolean(true)));
    }

    #[test]
    fn integer_and_number_tags() {
        let mut int = vec![0x13];
        int.extend_from_slice(&(-42i64).to_le_bytes());
        assert_eq!(decode(&int), Ok(Constant::Integer(-42)));

        let mut num = vec![0x03];
        num.extend_from_slice(&0.25f64.to_le_bytes());
        assert_eq!(decode(&num), Ok(Constant::Number(0.25)));
    }

    #[test]
    fn short_and_long_string_tags_decode_alike() {
        let short = decode(&[0x04, 3, b'h', b'i']).unwrap();
        let long = decode(&[0x14, 3, b'h', b'i']).unwrap();

        assert_eq!(short, Constant::String(LuaString::from("hi")));
        assert_eq!(short, long);
    }

    #[test]
    fn nan_constants_compare_by_bits() {
        let mut num = vec![0x03];
        num.extend_from_slice(&f64::NAN.to_le_bytes());

        assert_eq!(decode(&num).unwrap(), decode(&num).unwrap());
        assert_ne!(Constant::Number(0.0), Constant::Number(-0.0));
        assert_ne!(Constant::Integer(1), Constant::Number(1.0));
    }

    #[test]
    fn unknown_tag_is_corruption() {
        for tag in [0x02, 0x05, 0x12, 0x15, 0xff] {
            assert_eq!(
                decode(&[tag, 0, 0, 0, 0, 0, 0, 0, 0]),
                Err(DecodeError::CorruptedConstantTag { tag, offset: 0 })
            );
        }
    }

    #[test]
    fn missing_payload_is_truncation() {
        assert!(matches!(
            decode(&[0x13, 1, 2, 3]),
            Err(DecodeError::TruncatedInput { offset: 1, needed: 8, .. })
        ));
    }
}
