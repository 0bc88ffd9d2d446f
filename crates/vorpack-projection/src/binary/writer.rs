//! Writing projected objects as binary block streams.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;
use vorpack_wire::write_string;

use crate::binary::BLOCK_MARKER;
use crate::error::Result;
use crate::member::Projected;
use crate::wire::encode_value;

/// Writes projected objects as consecutive binary blocks.
///
/// Each [`append`](Self::append) emits one block; the block order in the
/// stream does not matter to readers.
pub struct BinaryWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Appends one object's block.
    pub fn append<T: Projected>(&mut self, value: &T) -> Result<()> {
        let members = T::members();
        members.check_unique(T::TYPE_NAME)?;

        let mut block = Vec::new();
        block.extend_from_slice(&BLOCK_MARKER);
        write_string(&mut block, T::TYPE_NAME);
        for member in members.iter() {
            encode_value(&member.get(value), &mut block);
        }
        self.writer.write_all(&block)?;
        debug!(type_name = T::TYPE_NAME, bytes = block.len(), "wrote block");
        Ok(())
    }

    /// Flushes buffered blocks to the underlying writer.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl BinaryWriter<File> {
    /// Creates (or truncates) `path` for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

/// Writes one `T` as a single-block binary file.
pub fn write_binary<T: Projected>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BinaryWriter::create(path)?;
    writer.append(value)?;
    writer.finish()
}
