//! Shared binary primitives for the vorpack codecs.
//!
//! The projection block format and the pack file container encode strings
//! the same way: a 7-bit varint byte-length prefix (little-endian base-128,
//! high bit marks continuation, at most 5 bytes) followed by the UTF-8
//! bytes. This crate implements that encoding once, for both in-memory
//! buffers and `io` streams, together with a bounds-checked slice cursor
//! used by scanning readers.

mod cursor;
mod error;
mod strings;

pub use cursor::SliceReader;
pub use error::{Result, WireError};
pub use strings::{
    read_string_from, read_varint_from, write_string, write_string_to, write_varint,
};
