//! Object projection: persist the ordered, typed members of plain data
//! structs as tagged binary blocks or INI-style text blocks, and read them
//! back in any order.
//!
//! A type opts in by implementing [`Projected`]: a block name plus a
//! member table built with [`MemberSet::builder`]. The same table drives
//! both formats in both directions. Binary streams are scanned for a
//! 4-byte block marker, text streams for a `[TypeName]` header line, so
//! multiple objects can share one stream and be read back independently
//! of write order.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use vorpack_projection::{BinaryReader, BinaryWriter, MemberSet, Projected};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct SensorHeader {
//!     sample_count: i32,
//!     label: String,
//! }
//!
//! impl Projected for SensorHeader {
//!     const TYPE_NAME: &'static str = "SensorHeader";
//!
//!     fn members() -> MemberSet<Self> {
//!         MemberSet::builder()
//!             .member("sample_count", 0, |s: &Self| s.sample_count, |s, v| {
//!                 s.sample_count = v;
//!             })
//!             .member("label", 1, |s: &Self| s.label.clone(), |s, v| s.label = v)
//!             .build()
//!     }
//! }
//!
//! let header = SensorHeader {
//!     sample_count: 48_000,
//!     label: "left".into(),
//! };
//!
//! let mut buf = Vec::new();
//! let mut writer = BinaryWriter::new(&mut buf);
//! writer.append(&header).unwrap();
//! writer.finish().unwrap();
//!
//! let reader = BinaryReader::new(Cursor::new(buf)).unwrap();
//! let decoded: SensorHeader = reader.read().unwrap();
//! assert_eq!(decoded, header);
//! ```

mod binary;
mod error;
mod member;
mod text;
mod value;
mod wire;

pub use binary::{BLOCK_MARKER, BinaryReader, BinaryWriter, BlockInfo, read_binary, write_binary};
pub use error::{ProjectionError, Result};
pub use member::{Accessor, Member, MemberSet, MemberSetBuilder, MemberValue, ORDER_LAST, Projected};
pub use text::{TextReader, TextWriter, escape_value, read_text, unescape_value, write_text};
pub use value::{Value, ValueKind};

/// Crate version, for diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
