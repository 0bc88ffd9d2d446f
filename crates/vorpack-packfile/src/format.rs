//! On-disk layout of the pack container header.
//!
//! A container starts with the length-prefixed signature string, then a
//! little-endian `i32` entry count, one compression flag byte, `count`
//! length-prefixed entry names, and `count` little-endian `i64` stored
//! lengths. Entry contents follow back to back in the same order.

use std::io::{self, ErrorKind, Read, Write};

use vorpack_wire::{read_string_from, write_string_to};

use crate::error::{PackFileError, Result};

/// Signature string opening every pack container.
pub const SIGNATURE: &str = "PackFile";

/// Header fields parsed from the front of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedHeader {
    pub compressed: bool,
    pub names: Vec<String>,
    pub lengths: Vec<u64>,
}

/// Writes the container header for `names` and their stored `lengths`.
pub(crate) fn write_header<W: Write>(
    writer: &mut W,
    names: &[String],
    lengths: &[u64],
    compressed: bool,
) -> Result<()> {
    let count = i32::try_from(names.len()).map_err(|_| {
        PackFileError::invalid_container(format!("pack cannot hold {} entries", names.len()))
    })?;

    write_string_to(writer, SIGNATURE)?;
    writer.write_all(&count.to_le_bytes())?;
    writer.write_all(&[u8::from(compressed)])?;
    for name in names {
        write_string_to(writer, name)?;
    }
    for length in lengths {
        let length = i64::try_from(*length).map_err(|_| {
            PackFileError::invalid_container(format!("entry length {length} too large"))
        })?;
        writer.write_all(&length.to_le_bytes())?;
    }
    Ok(())
}

/// Parses the container header, leaving `reader` positioned at the first
/// entry's content.
pub(crate) fn read_header<R: Read>(reader: &mut R) -> Result<ParsedHeader> {
    let signature = read_string_from(reader).map_err(|e| match e.kind() {
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            PackFileError::invalid_container("stream does not start with a pack signature")
        }
        _ => PackFileError::Io(e),
    })?;
    if signature != SIGNATURE {
        return Err(PackFileError::invalid_container(format!(
            "unexpected signature {signature:?}"
        )));
    }

    let count = read_i32(reader)?;
    let count = usize::try_from(count).map_err(|_| {
        PackFileError::invalid_container(format!("negative entry count {count}"))
    })?;

    let compressed = match read_u8(reader)? {
        0 => false,
        1 => true,
        other => {
            return Err(PackFileError::invalid_container(format!(
                "invalid compression flag {other:#04x}"
            )));
        }
    };

    // preallocation capped; oversized counts fail at read time instead
    let mut names = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        names.push(read_string_from(reader)?);
    }

    let mut lengths = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let length = read_i64(reader)?;
        let length = u64::try_from(length).map_err(|_| {
            PackFileError::invalid_container(format!("negative entry length {length}"))
        })?;
        lengths.push(length);
    }

    Ok(ParsedHeader {
        compressed,
        names,
        lengths,
    })
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_i64<R: Read>(reader: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn sample_header() -> (Vec<String>, Vec<u64>) {
        let names = vec!["a.txt".to_owned(), "b.bin".to_owned()];
        let lengths = vec![12, 4096];
        (names, lengths)
    }

    #[test]
    fn test_header_roundtrip() {
        let (names, lengths) = sample_header();
        let mut buf = Vec::new();
        write_header(&mut buf, &names, &lengths, true).unwrap();

        let parsed = read_header(&mut Cursor::new(&buf)).unwrap();
        assert!(parsed.compressed);
        assert_eq!(parsed.names, names);
        assert_eq!(parsed.lengths, lengths);
    }

    #[test]
    fn test_header_layout() {
        let (names, lengths) = sample_header();
        let mut buf = Vec::new();
        write_header(&mut buf, &names, &lengths, false).unwrap();

        assert_eq!(buf[0] as usize, SIGNATURE.len());
        assert_eq!(&buf[1..9], SIGNATURE.as_bytes());
        assert_eq!(&buf[9..13], &2i32.to_le_bytes());
        assert_eq!(buf[13], 0);
    }

    #[test]
    fn test_read_rejects_wrong_signature() {
        let mut buf = Vec::new();
        write_header(&mut buf, &["x".to_owned()], &[1], false).unwrap();
        buf[1] = b'Q';
        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, PackFileError::InvalidContainer { .. }));
    }

    #[test]
    fn test_read_rejects_garbage() {
        let err = read_header(&mut Cursor::new(&[0xFFu8; 16])).unwrap_err();
        assert!(matches!(err, PackFileError::InvalidContainer { .. }));
    }

    #[test]
    fn test_read_rejects_negative_count() {
        let mut buf = Vec::new();
        vorpack_wire::write_string_to(&mut buf, SIGNATURE).unwrap();
        buf.extend_from_slice(&(-1i32).to_le_bytes());
        buf.push(0);
        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        match err {
            PackFileError::InvalidContainer { message } => {
                assert!(message.contains("negative entry count"));
            }
            other => panic!("expected InvalidContainer, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_bad_compression_flag() {
        let mut buf = Vec::new();
        vorpack_wire::write_string_to(&mut buf, SIGNATURE).unwrap();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.push(7);
        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        match err {
            PackFileError::InvalidContainer { message } => {
                assert!(message.contains("compression flag"));
            }
            other => panic!("expected InvalidContainer, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_negative_length() {
        let mut buf = Vec::new();
        write_header(&mut buf, &["x".to_owned()], &[1], false).unwrap();
        let tail = buf.len() - 8;
        buf[tail..].copy_from_slice(&(-5i64).to_le_bytes());
        let err = read_header(&mut Cursor::new(&buf)).unwrap_err();
        match err {
            PackFileError::InvalidContainer { message } => {
                assert!(message.contains("negative entry length"));
            }
            other => panic!("expected InvalidContainer, got {other:?}"),
        }
    }
}
