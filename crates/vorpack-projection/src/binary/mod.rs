//! The tagged binary block format.
//!
//! Each block is the 4-byte marker, a length-prefixed type name, then every
//! member's encoded value in declared order. Blocks concatenate freely in
//! one stream and readers locate them by a linear byte scan for the marker,
//! which is what makes reads order-independent. A marker match inside
//! encoded data (in practice only possible within long string values) is an
//! accepted limitation of the format; a candidate position only counts as a
//! block when a well-formed length-prefixed name parses right after it.

mod reader;
mod writer;

pub use reader::{BinaryReader, read_binary};
pub use writer::{BinaryWriter, write_binary};

use serde::Serialize;

/// Marker opening every binary block, written as one little-endian `i32`.
pub const BLOCK_MARKER: [u8; 4] = *b"vpbk";

/// Location and name of one block header found by an untyped scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
    /// Byte offset of the marker.
    pub offset: usize,
    /// Type name recorded in the block header.
    pub type_name: String,
}
