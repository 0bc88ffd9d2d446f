//! Error types for projection read/write operations.

use std::path::PathBuf;
use thiserror::Error;

use vorpack_wire::WireError;

use crate::value::ValueKind;

/// Errors that can occur when projecting objects to or from a stream.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Stream contents are not valid for the format.
    #[error("invalid projection data: {message}")]
    InvalidFormat { message: String },

    /// No block for the target type exists in the stream.
    #[error("block [{type_name}] not found in stream")]
    BlockNotFound { type_name: &'static str },

    /// Two members registered under the same name.
    #[error("duplicate member name `{name}` on {type_name}")]
    DuplicateMember {
        type_name: &'static str,
        name: &'static str,
    },

    /// A member accessor rejected a decoded value.
    #[error("member `{member}` on {type_name} did not accept a {expected} value")]
    TypeMismatch {
        type_name: &'static str,
        member: &'static str,
        expected: ValueKind,
    },

    /// A registered member has no matching key in the text block.
    #[error("block [{type_name}] has no key `{key}`")]
    MissingKey {
        type_name: &'static str,
        key: &'static str,
    },

    /// A text block key matches no registered member.
    #[error("block [{type_name}] contains unknown key `{key}`")]
    UnknownKey {
        type_name: &'static str,
        key: String,
    },

    /// The same key appears twice within one text block.
    #[error("block [{type_name}] repeats key `{key}`")]
    DuplicateKey {
        type_name: &'static str,
        key: String,
    },

    /// A text value failed to parse as the member's declared kind.
    #[error("invalid {kind} value for member `{member}`: {text:?}")]
    InvalidValue {
        member: &'static str,
        kind: ValueKind,
        text: String,
    },

    /// An escape sequence in a text value is incomplete or unknown.
    #[error("invalid escape sequence in value {text:?}")]
    InvalidEscape { text: String },

    /// Malformed binary block data.
    #[error("malformed block data: {0}")]
    Wire(#[from] WireError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

impl ProjectionError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectionError;
    use crate::value::ValueKind;

    #[test]
    fn test_error_display() {
        let err = ProjectionError::BlockNotFound {
            type_name: "WaveHeader",
        };
        assert_eq!(err.to_string(), "block [WaveHeader] not found in stream");

        let err = ProjectionError::InvalidValue {
            member: "gain",
            kind: ValueKind::F32,
            text: "loud".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid f32 value for member `gain`: \"loud\""
        );
    }
}
