//! Raw deflate helpers shared by the builder and the reader.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::error::Result;

/// Compresses `data` into a raw deflate stream.
pub(crate) fn deflate_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let capacity = (data.len() / 2).max(64);
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(capacity), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflates a raw deflate stream produced by [`deflate_bytes`].
pub(crate) fn inflate_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_roundtrip() {
        let data = b"repetitive payload payload payload payload".repeat(50);
        let packed = deflate_bytes(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(inflate_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn test_deflate_empty_input() {
        let packed = deflate_bytes(b"").unwrap();
        assert_eq!(inflate_bytes(&packed).unwrap(), b"");
    }

    #[test]
    fn test_inflate_rejects_garbage() {
        // 0xFF opens a block with the reserved BTYPE, always invalid
        assert!(inflate_bytes(&[0xFF; 8]).is_err());
    }
}
