//! Pack containers: many files bundled into one, with random-access reads.
//!
//! A container records entry names and stored lengths up front, so any
//! entry can be fetched without touching the others. Contents are stored
//! verbatim or deflate-compressed, chosen once per container at build
//! time.
//!
//! ```
//! use vorpack_packfile::{PackFile, PackFileBuilder};
//!
//! let dir = tempfile::tempdir()?;
//! let source = dir.path().join("clip.wav");
//! std::fs::write(&source, b"RIFF data")?;
//!
//! let target = dir.path().join("session.pack");
//! let mut builder = PackFileBuilder::new();
//! builder.add_source_file(&source)?;
//! builder.build(&target, false)?;
//!
//! let pack = PackFile::load(&target)?;
//! assert_eq!(pack.file_count(), 1);
//! assert_eq!(pack.filenames()[0], "clip.wav");
//! assert_eq!(pack.get_bytes(0)?, b"RIFF data");
//! pack.close();
//! # Ok::<(), vorpack_packfile::PackFileError>(())
//! ```

mod builder;
mod compress;
mod error;
mod format;
mod packfile;

pub use builder::PackFileBuilder;
pub use error::{PackFileError, Result};
pub use format::SIGNATURE;
pub use packfile::{EntryInfo, PackFile};

/// Crate version, as baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
