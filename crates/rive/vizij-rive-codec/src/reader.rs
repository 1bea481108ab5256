//! Bounds-checked binary reader with a sticky overflow flag.

/// Cursor over a borrowed byte buffer.
///
/// Any read past the end sets the overflow flag, moves the cursor to the end
/// and returns a zero value. The flag never clears, so a caller can decode a
/// whole record and check once.
#[derive(Clone, Debug)]
pub struct BinaryReader<'a> {
    bytes: &'a [u8],
    position: usize,
    overflowed: bool,
}

impl<'a> BinaryReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            overflowed: false,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.position >= self.bytes.len()
    }

    #[inline]
    pub fn did_overflow(&self) -> bool {
        self.overflowed
    }

    fn overflow(&mut self) {
        self.overflowed = true;
        self.position = self.bytes.len();
    }

    fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        if self.remaining() < count {
            self.overflow();
            return None;
        }
        let start = self.position;
        self.position += count;
        Some(&self.bytes[start..start + count])
    }

    /// LEB128 decode: seven payload bits per byte, high bit continues.
    pub fn read_var_uint(&mut self) -> u64 {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let Some(&byte) = self.bytes.get(self.position) else {
                self.overflow();
                return 0;
            };
            self.position += 1;
            if shift >= 64 {
                // More than ten bytes cannot be a u64.
                self.overflow();
                return 0;
            }
            // The tenth byte only has room for the top bit of a u64.
            if shift == 63 && byte & 0x7e != 0 {
                self.overflow();
                return 0;
            }
            result |= u64::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                return result;
            }
        }
    }

    /// Varint narrowed to `u32`; values that do not fit flag overflow.
    pub fn read_var_uint32(&mut self) -> u32 {
        let value = self.read_var_uint();
        match u32::try_from(value) {
            Ok(value) => value,
            Err(_) => {
                self.overflow();
                0
            }
        }
    }

    pub fn read_byte(&mut self) -> u8 {
        self.take(1).map(|b| b[0]).unwrap_or(0)
    }

    pub fn read_uint32(&mut self) -> u32 {
        match self.take(4) {
            Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => 0,
        }
    }

    pub fn read_float32(&mut self) -> f32 {
        match self.take(4) {
            Some(b) => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => 0.0,
        }
    }

    /// Length-prefixed byte run. Returns an empty slice on overflow.
    pub fn read_bytes(&mut self) -> &'a [u8] {
        let length = self.read_var_uint();
        if self.overflowed {
            return &[];
        }
        let Ok(length) = usize::try_from(length) else {
            self.overflow();
            return &[];
        };
        self.take(length).unwrap_or(&[])
    }

    /// Length-prefixed UTF-8; invalid sequences are replaced rather than rejected.
    pub fn read_string(&mut self) -> String {
        String::from_utf8_lossy(self.read_bytes()).into_owned()
    }

    /// Peeks `expected.len()` bytes and consumes them only if they match.
    pub fn consume_if(&mut self, expected: &[u8]) -> bool {
        match self.bytes.get(self.position..self.position + expected.len()) {
            Some(slice) if slice == expected => {
                self.position += expected.len();
                true
            }
            _ => false,
        }
    }
}
