use thiserror::Error;

/// Errors produced while decoding wire primitives from a byte slice.
///
/// Offsets are absolute positions within the slice being decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("varint at offset {offset} exceeds 32 bits")]
    VarintOverflow { offset: usize },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
}

/// Result type for wire decoding.
pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::WireError;

    #[test]
    fn test_error_display() {
        let err = WireError::UnexpectedEof { offset: 12 };
        assert_eq!(err.to_string(), "unexpected end of data at offset 12");

        let err = WireError::VarintOverflow { offset: 0 };
        assert_eq!(err.to_string(), "varint at offset 0 exceeds 32 bits");
    }
}
