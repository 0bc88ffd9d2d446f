//! Bounds-checked reading over an in-memory byte slice.

use crate::error::{Result, WireError};

/// A cursor over a byte slice with explicit bounds errors.
///
/// Every read advances the position; a failed read leaves the position
/// where it was.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a cursor positioned at `pos` within `data`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current absolute position within the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the slice.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Reads exactly `len` bytes, advancing the position.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(WireError::UnexpectedEof { offset: self.pos })?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(WireError::UnexpectedEof { offset: self.pos })?;
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Reads a fixed-size array, for `from_le_bytes`-style decoding.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a 7-bit varint as written by [`write_varint`](crate::write_varint).
    pub fn read_varint(&mut self) -> Result<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            // The fifth byte may only carry the top four bits of a u32.
            if shift == 28 && byte & 0xF0 != 0 {
                return Err(WireError::VarintOverflow { offset: start });
            }
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a length-prefixed UTF-8 string (varint byte count, then bytes).
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        let text = std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset })?;
        Ok(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::{write_string, write_varint};

    #[test]
    fn test_read_bytes_advances_position() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = SliceReader::new(&data);
        assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn test_read_past_end_fails_without_advancing() {
        let data = [1u8, 2];
        let mut reader = SliceReader::new(&data);
        reader.read_u8().unwrap();
        let err = reader.read_bytes(5).unwrap_err();
        assert_eq!(err, WireError::UnexpectedEof { offset: 1 });
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_read_array() {
        let data = 0x1234_5678u32.to_le_bytes();
        let mut reader = SliceReader::new(&data);
        let value = u32::from_le_bytes(reader.read_array().unwrap());
        assert_eq!(value, 0x1234_5678);
    }

    #[test]
    fn test_read_varint_boundaries() {
        for value in [0u32, 1, 127, 128, 300, 16_383, 16_384, u32::MAX] {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            let mut reader = SliceReader::new(&buf);
            assert_eq!(reader.read_varint().unwrap(), value);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_read_varint_truncated() {
        let data = [0x80u8, 0x80];
        let mut reader = SliceReader::new(&data);
        assert_eq!(
            reader.read_varint().unwrap_err(),
            WireError::UnexpectedEof { offset: 2 }
        );
    }

    #[test]
    fn test_read_varint_overflow() {
        let data = [0xFFu8, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = SliceReader::new(&data);
        assert_eq!(
            reader.read_varint().unwrap_err(),
            WireError::VarintOverflow { offset: 0 }
        );
    }

    #[test]
    fn test_read_string() {
        let mut buf = Vec::new();
        write_string(&mut buf, "héllo");
        write_string(&mut buf, "");
        let mut reader = SliceReader::new(&buf);
        assert_eq!(reader.read_string().unwrap(), "héllo");
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let data = [2u8, 0xFF, 0xFE];
        let mut reader = SliceReader::new(&data);
        assert_eq!(
            reader.read_string().unwrap_err(),
            WireError::InvalidUtf8 { offset: 1 }
        );
    }

    #[test]
    fn test_cursor_at_offset() {
        let data = [0u8, 0, 7];
        let mut reader = SliceReader::at(&data, 2);
        assert_eq!(reader.read_u8().unwrap(), 7);
    }
}
