//! Varint and length-prefixed string encoding.

use std::io::{self, Read, Write};

/// Appends a 7-bit varint: little-endian base-128 groups, high bit marks
/// continuation.
pub fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Appends a length-prefixed UTF-8 string (varint byte count, then bytes).
pub fn write_string(out: &mut Vec<u8>, value: &str) {
    write_varint(out, value.len() as u32);
    out.extend_from_slice(value.as_bytes());
}

/// Writes a length-prefixed UTF-8 string to a stream.
pub fn write_string_to<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let mut buf = Vec::with_capacity(value.len() + 5);
    write_string(&mut buf, value);
    writer.write_all(&buf)
}

/// Reads a 7-bit varint from a stream.
pub fn read_varint_from<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut value: u32 = 0;
    let mut shift: u32 = 0;
    loop {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        let byte = byte[0];
        if shift == 28 && byte & 0xF0 != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "varint exceeds 32 bits",
            ));
        }
        value |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Reads a length-prefixed UTF-8 string from a stream.
pub fn read_string_from<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = read_varint_from(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid UTF-8 in string"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;

    use super::*;
    use crate::cursor::SliceReader;

    #[test]
    fn test_write_varint_encodings() {
        let cases: &[(u32, &[u8])] = &[
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (300, &[0xAC, 0x02]),
            (u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            write_varint(&mut buf, *value);
            assert_eq!(buf.as_slice(), *expected, "value {value}");
        }
    }

    #[test]
    fn test_write_string_layout() {
        let mut buf = Vec::new();
        write_string(&mut buf, "abc");
        assert_eq!(buf, [3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_stream_string_roundtrip() {
        let mut buf = Vec::new();
        write_string_to(&mut buf, "pack entry ünïcode").unwrap();
        write_string_to(&mut buf, "").unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string_from(&mut cursor).unwrap(), "pack entry ünïcode");
        assert_eq!(read_string_from(&mut cursor).unwrap(), "");
    }

    #[test]
    fn test_stream_string_truncated() {
        let data = [5u8, b'a', b'b'];
        let mut cursor = Cursor::new(&data[..]);
        let err = read_string_from(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    proptest! {
        #[test]
        fn prop_varint_roundtrip(value: u32) {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            prop_assert!(buf.len() <= 5);
            let mut reader = SliceReader::new(&buf);
            prop_assert_eq!(reader.read_varint().unwrap(), value);
        }

        #[test]
        fn prop_string_roundtrip(value in "\\PC*") {
            let mut buf = Vec::new();
            write_string(&mut buf, &value);
            let mut reader = SliceReader::new(&buf);
            prop_assert_eq!(reader.read_string().unwrap(), value.clone());

            let mut cursor = Cursor::new(&buf);
            prop_assert_eq!(read_string_from(&mut cursor).unwrap(), value);
        }
    }
}
