//! Wire field types and their skip rules.

use serde::{Deserialize, Serialize};

use crate::reader::BinaryReader;

/// How a property payload is laid out on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// LEB128 varint.
    Uint,
    /// Length-prefixed UTF-8.
    String,
    /// Little-endian f32.
    Double,
    /// Little-endian u32, ARGB.
    Color,
    /// Single byte.
    Bool,
    /// Length-prefixed raw bytes.
    Bytes,
}

impl FieldType {
    /// Two-bit index used by the header's field table.
    ///
    /// Bools share the uint slot (a 0/1 byte is a valid one-byte varint) and
    /// byte runs share the string slot.
    pub fn toc_index(self) -> u8 {
        match self {
            FieldType::Uint | FieldType::Bool => 0,
            FieldType::String | FieldType::Bytes => 1,
            FieldType::Double => 2,
            FieldType::Color => 3,
        }
    }

    pub fn from_toc_index(index: u8) -> Option<FieldType> {
        match index {
            0 => Some(FieldType::Uint),
            1 => Some(FieldType::String),
            2 => Some(FieldType::Double),
            3 => Some(FieldType::Color),
            _ => None,
        }
    }

    /// Consumes one payload of this type without decoding it.
    pub fn skip(self, reader: &mut BinaryReader<'_>) {
        match self {
            FieldType::Uint => {
                reader.read_var_uint();
            }
            FieldType::String | FieldType::Bytes => {
                reader.read_bytes();
            }
            FieldType::Double => {
                reader.read_float32();
            }
            FieldType::Color => {
                reader.read_uint32();
            }
            FieldType::Bool => {
                reader.read_byte();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryWriter;

    #[test]
    fn toc_indices_cover_two_bits() {
        for index in 0..4u8 {
            let ty = FieldType::from_toc_index(index).unwrap();
            assert_eq!(ty.toc_index(), index);
        }
        assert_eq!(FieldType::from_toc_index(4), None);
        assert_eq!(FieldType::Bool.toc_index(), FieldType::Uint.toc_index());
    }

    #[test]
    fn skip_consumes_exactly_one_payload() {
        let mut writer = BinaryWriter::new();
        writer.write_var_uint(300);
        writer.write_string("skip me");
        writer.write_float32(2.5);
        writer.write_uint32(0xff00_ff00);
        writer.write_byte(1);
        writer.write_byte(0xaa);
        let mut reader = BinaryReader::new(writer.bytes());
        for ty in [
            FieldType::Uint,
            FieldType::String,
            FieldType::Double,
            FieldType::Color,
            FieldType::Bool,
        ] {
            ty.skip(&mut reader);
        }
        assert_eq!(reader.read_byte(), 0xaa);
        assert!(!reader.did_overflow());
    }
}
