//! Error types for pack container operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building or reading pack containers.
#[derive(Debug, Error)]
pub enum PackFileError {
    /// A source or container file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The container signature, header, or layout is malformed.
    #[error("invalid pack container: {message}")]
    InvalidContainer {
        /// Details about the malformed data.
        message: String,
    },

    /// An entry index is outside the container's range.
    #[error("entry index {index} out of range for pack with {count} entries")]
    IndexOutOfRange {
        /// Requested entry index.
        index: usize,
        /// Number of entries in the container.
        count: usize,
    },

    /// The pack handle was closed before the call.
    #[error("pack handle is closed")]
    HandleClosed,

    /// An entry name cannot be used as a file name on extraction.
    #[error("entry name {name:?} cannot be written as a file")]
    InvalidEntryName {
        /// Offending entry name.
        name: String,
    },

    /// I/O error from the underlying file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for pack container operations.
pub type Result<T> = std::result::Result<T, PackFileError>;

impl PackFileError {
    /// Creates an [`InvalidContainer`](Self::InvalidContainer) error.
    pub fn invalid_container(message: impl Into<String>) -> Self {
        Self::InvalidContainer {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackFileError::IndexOutOfRange { index: 4, count: 3 };
        assert_eq!(
            err.to_string(),
            "entry index 4 out of range for pack with 3 entries"
        );

        let err = PackFileError::invalid_container("truncated header");
        assert_eq!(err.to_string(), "invalid pack container: truncated header");

        let err = PackFileError::InvalidEntryName {
            name: "../escape".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "entry name \"../escape\" cannot be written as a file"
        );
    }
}
