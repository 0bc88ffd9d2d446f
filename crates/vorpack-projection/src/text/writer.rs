//! Writing projected objects as text blocks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::member::Projected;
use crate::text::format_value;

/// Writes projected objects as consecutive text blocks.
pub struct TextWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Appends one object's block: header, one line per member, blank
    /// terminator line.
    pub fn append<T: Projected>(&mut self, value: &T) -> Result<()> {
        let members = T::members();
        members.check_unique(T::TYPE_NAME)?;

        writeln!(self.writer, "[{}]", T::TYPE_NAME)?;
        for member in members.iter() {
            writeln!(
                self.writer,
                "{}={}",
                member.name(),
                format_value(&member.get(value))
            )?;
        }
        writeln!(self.writer)?;
        debug!(
            type_name = T::TYPE_NAME,
            members = members.len(),
            "wrote block"
        );
        Ok(())
    }

    /// Flushes buffered blocks to the underlying writer.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl TextWriter<File> {
    /// Creates (or truncates) `path` for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

/// Writes one `T` as a single-block text file.
pub fn write_text<T: Projected>(path: &Path, value: &T) -> Result<()> {
    let mut writer = TextWriter::create(path)?;
    writer.append(value)?;
    writer.finish()
}
