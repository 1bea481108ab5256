//! Runtime header: fingerprint, version and the property field table.
//!
//! The field table lets an older runtime skip properties it has never seen.
//! The writer lists every property key it used, zero-terminated, followed by
//! a two-bit field index per key packed four to a little-endian u32.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::HeaderError;
use crate::field::FieldType;
use crate::num::fits_in;
use crate::reader::BinaryReader;
use crate::writer::BinaryWriter;

pub const FINGERPRINT: &[u8; 4] = b"RIVE";
pub const MAJOR_VERSION: u32 = 7;
pub const MINOR_VERSION: u32 = 0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeHeader {
    pub major_version: u32,
    pub minor_version: u32,
    pub file_id: u32,
    property_to_field_index: HashMap<u16, u8>,
}

impl RuntimeHeader {
    /// Header for the version this runtime writes.
    pub fn new(file_id: u32) -> Self {
        Self {
            major_version: MAJOR_VERSION,
            minor_version: MINOR_VERSION,
            file_id,
            property_to_field_index: HashMap::new(),
        }
    }

    /// Registers the wire type of `property_key` in the field table.
    pub fn with_field(mut self, property_key: u16, field_type: FieldType) -> Self {
        self.set_field(property_key, field_type);
        self
    }

    pub fn set_field(&mut self, property_key: u16, field_type: FieldType) {
        self.property_to_field_index
            .insert(property_key, field_type.toc_index());
    }

    /// Field type recorded for a key by the file's writer, if any.
    pub fn property_field_type(&self, property_key: u16) -> Option<FieldType> {
        self.property_to_field_index
            .get(&property_key)
            .copied()
            .and_then(FieldType::from_toc_index)
    }

    pub fn field_count(&self) -> usize {
        self.property_to_field_index.len()
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<RuntimeHeader, HeaderError> {
        if !reader.consume_if(FINGERPRINT) {
            return Err(HeaderError::BadFingerprint);
        }
        let truncated = |reader: &BinaryReader<'_>| HeaderError::Truncated {
            position: reader.position(),
        };

        let major_version = reader.read_var_uint32();
        let minor_version = reader.read_var_uint32();
        let file_id = reader.read_var_uint32();
        if reader.did_overflow() {
            return Err(truncated(reader));
        }

        let mut keys = Vec::new();
        loop {
            let key = reader.read_var_uint();
            if reader.did_overflow() {
                return Err(truncated(reader));
            }
            if key == 0 {
                break;
            }
            let narrowed = i64::try_from(key).ok().filter(|k| fits_in::<u16>(*k));
            match narrowed {
                Some(k) => keys.push(k as u16),
                None => return Err(HeaderError::InvalidPropertyKey { key }),
            }
        }

        let mut property_to_field_index = HashMap::with_capacity(keys.len());
        let mut current = 0u32;
        let mut bit = 8;
        for key in keys {
            if bit == 8 {
                current = reader.read_uint32();
                bit = 0;
            }
            let index = ((current >> bit) & 3) as u8;
            property_to_field_index.insert(key, index);
            bit += 2;
        }
        if reader.did_overflow() {
            return Err(truncated(reader));
        }

        log::debug!(
            "runtime header {}.{} (file {}) lists {} property fields",
            major_version,
            minor_version,
            file_id,
            property_to_field_index.len()
        );
        Ok(RuntimeHeader {
            major_version,
            minor_version,
            file_id,
            property_to_field_index,
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_raw(FINGERPRINT);
        writer.write_var_uint(u64::from(self.major_version));
        writer.write_var_uint(u64::from(self.minor_version));
        writer.write_var_uint(u64::from(self.file_id));

        let mut keys: Vec<u16> = self.property_to_field_index.keys().copied().collect();
        keys.sort_unstable();
        for key in &keys {
            writer.write_var_uint(u64::from(*key));
        }
        writer.write_var_uint(0);

        for chunk in keys.chunks(4) {
            let mut packed = 0u32;
            for (slot, key) in chunk.iter().enumerate() {
                let index = self.property_to_field_index.get(key).copied().unwrap_or(0);
                packed |= u32::from(index & 3) << (slot * 2);
            }
            writer.write_uint32(packed);
        }
    }
}
