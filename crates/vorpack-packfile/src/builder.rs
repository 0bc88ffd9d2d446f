//! Assembles pack containers from files on disk.

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compress::deflate_bytes;
use crate::error::{PackFileError, Result};
use crate::format;

/// Collects source files and writes them out as a single pack container.
///
/// Sources are recorded in insertion order and that order is preserved in
/// the container. Each source is checked for existence when added; contents
/// are only read when [`build`](Self::build) runs.
#[derive(Debug, Default)]
pub struct PackFileBuilder {
    sources: Vec<PathBuf>,
}

impl PackFileBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `path` for inclusion under its file name.
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PackFileError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "queued source file");
        self.sources.push(path.to_path_buf());
        Ok(self)
    }

    /// Queues every path in `paths`, stopping at the first missing one.
    pub fn add_source_files<I, P>(&mut self, paths: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_source_file(path)?;
        }
        Ok(self)
    }

    /// Number of queued sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Writes every queued source into a pack container at `target`.
    ///
    /// With `compress` set, each entry is deflated and its compressed
    /// length is recorded in the header; otherwise contents are stored
    /// verbatim with their on-disk lengths.
    pub fn build(&self, target: &Path, compress: bool) -> Result<()> {
        let names: Vec<String> = self.sources.iter().map(|p| short_name(p)).collect();
        let mut writer = BufWriter::new(File::create(target)?);

        if compress {
            let mut blobs = Vec::with_capacity(self.sources.len());
            for source in &self.sources {
                let raw = read_source(source)?;
                blobs.push(deflate_bytes(&raw)?);
            }
            let lengths: Vec<u64> = blobs.iter().map(|b| b.len() as u64).collect();
            format::write_header(&mut writer, &names, &lengths, true)?;
            for blob in &blobs {
                writer.write_all(blob)?;
            }
        } else {
            let mut lengths = Vec::with_capacity(self.sources.len());
            for source in &self.sources {
                lengths.push(source_length(source)?);
            }
            format::write_header(&mut writer, &names, &lengths, false)?;
            for (source, expected) in self.sources.iter().zip(&lengths) {
                let mut file = open_source(source)?;
                let copied = io::copy(&mut file, &mut writer)?;
                if copied != *expected {
                    return Err(PackFileError::Io(io::Error::other(format!(
                        "source {} changed size during build",
                        source.display()
                    ))));
                }
            }
        }

        writer.flush()?;
        info!(
            path = %target.display(),
            entries = self.sources.len(),
            compress,
            "built pack container"
        );
        Ok(())
    }
}

/// Entry name for a source: its final path component.
fn short_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PackFileError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PackFileError::Io(e),
    })
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PackFileError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PackFileError::Io(e),
    })
}

fn source_length(path: &Path) -> Result<u64> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PackFileError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(PackFileError::Io(e)),
    }
}
