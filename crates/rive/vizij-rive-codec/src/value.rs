//! PropertyValue: a decoded property payload tagged with its field type.

use serde::{Deserialize, Serialize};

use crate::field::FieldType;
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PropertyValue {
    Uint(u32),
    String(String),
    /// Stored as f32 on the wire despite the name.
    Double(f32),
    /// Packed ARGB.
    Color(u32),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl PropertyValue {
    #[inline]
    pub fn field_type(&self) -> FieldType {
        match self {
            PropertyValue::Uint(_) => FieldType::Uint,
            PropertyValue::String(_) => FieldType::String,
            PropertyValue::Double(_) => FieldType::Double,
            PropertyValue::Color(_) => FieldType::Color,
            PropertyValue::Bool(_) => FieldType::Bool,
            PropertyValue::Bytes(_) => FieldType::Bytes,
        }
    }

    /// Decodes one payload. On overflow the zero value of the type is returned
    /// and the reader's flag is left set.
    pub fn read(field_type: FieldType, reader: &mut BinaryReader<'_>) -> PropertyValue {
        match field_type {
            FieldType::Uint => PropertyValue::Uint(reader.read_var_uint32()),
            FieldType::String => PropertyValue::String(reader.read_string()),
            FieldType::Double => PropertyValue::Double(reader.read_float32()),
            FieldType::Color => PropertyValue::Color(reader.read_uint32()),
            FieldType::Bool => PropertyValue::Bool(reader.read_byte() == 1),
            FieldType::Bytes => PropertyValue::Bytes(reader.read_bytes().to_vec()),
        }
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        match self {
            PropertyValue::Uint(v) => writer.write_var_uint(u64::from(*v)),
            PropertyValue::String(v) => writer.write_string(v),
            PropertyValue::Double(v) => writer.write_float32(*v),
            PropertyValue::Color(v) => writer.write_uint32(*v),
            PropertyValue::Bool(v) => writer.write_byte(u8::from(*v)),
            PropertyValue::Bytes(v) => writer.write_bytes(v),
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            PropertyValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f32> {
        match self {
            PropertyValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<u32> {
        match self {
            PropertyValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }
}
