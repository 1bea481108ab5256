//! Growable binary writer, the mirror of [`crate::BinaryReader`].

#[derive(Clone, Debug, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Drops the contents but keeps the allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn write_var_uint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buffer.push(byte);
                return;
            }
            self.buffer.push(byte | 0x80);
        }
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_uint32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_float32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Length-prefixed byte run.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.write_var_uint(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Raw bytes with no length prefix (fingerprints, pre-encoded blocks).
    pub fn write_raw(&mut self, value: &[u8]) {
        self.buffer.extend_from_slice(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn var_uint_matches_leb128_layout() {
        let mut writer = BinaryWriter::new();
        writer.write_var_uint(624_485);
        assert_eq!(writer.bytes(), &[0xe5, 0x8e, 0x26]);
    }

    #[test]
    fn var_uint_survives_extremes() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            let mut writer = BinaryWriter::new();
            writer.write_var_uint(value);
            let mut reader = BinaryReader::new(writer.bytes());
            assert_eq!(reader.read_var_uint(), value);
            assert!(reader.is_eof());
            assert!(!reader.did_overflow());
        }
    }

    #[test]
    fn truncated_var_uint_reports_overflow() {
        let mut writer = BinaryWriter::new();
        writer.write_var_uint(u64::MAX);
        let bytes = writer.into_bytes();
        for cut in 0..bytes.len() {
            let mut reader = BinaryReader::new(&bytes[..cut]);
            assert_eq!(reader.read_var_uint(), 0);
            assert!(reader.did_overflow(), "cut at {cut} should overflow");
            assert_eq!(reader.position(), cut);
        }
    }

    #[test]
    fn clear_keeps_writer_reusable() {
        let mut writer = BinaryWriter::with_capacity(8);
        writer.write_string("abc");
        assert_eq!(writer.size(), 4);
        writer.clear();
        assert_eq!(writer.size(), 0);
        writer.write_byte(9);
        assert_eq!(writer.bytes(), &[9]);
    }
}
