//! Random-access reads over a pack container on disk.

use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::compress::inflate_bytes;
use crate::error::{PackFileError, Result};
use crate::format::{self, ParsedHeader};

/// One entry in a pack container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    /// Position of the entry in the container.
    pub index: usize,
    /// Entry name, the source's file name at build time.
    pub name: String,
    /// Bytes the entry occupies in the container. For compressed packs
    /// this is the deflated size, not the original one.
    pub stored_length: u64,
}

/// An open pack container.
///
/// The header is parsed once at load time; entry contents are fetched on
/// demand through an internal file handle. The handle sits behind a mutex
/// and every read seeks to an absolute offset, so a shared `PackFile` can
/// serve reads from multiple threads.
#[derive(Debug)]
pub struct PackFile {
    handle: Mutex<Option<File>>,
    path: PathBuf,
    compressed: bool,
    names: Vec<String>,
    lengths: Vec<u64>,
    content_start: u64,
}

impl PackFile {
    /// Opens `path` and parses the container header.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PackFileError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => PackFileError::Io(e),
        })?;

        let mut reader = BufReader::new(file);
        let ParsedHeader {
            compressed,
            names,
            lengths,
        } = format::read_header(&mut reader)?;
        let content_start = reader.stream_position()?;
        let file = reader.into_inner();

        let content_length = lengths
            .iter()
            .try_fold(0u64, |acc, len| acc.checked_add(*len))
            .ok_or_else(|| PackFileError::invalid_container("entry lengths overflow"))?;
        let described = content_start
            .checked_add(content_length)
            .ok_or_else(|| PackFileError::invalid_container("entry lengths overflow"))?;
        let on_disk = file.metadata()?.len();
        if described > on_disk {
            return Err(PackFileError::invalid_container(format!(
                "container is {on_disk} bytes but the header describes {described}"
            )));
        }

        debug!(
            path = %path.display(),
            entries = names.len(),
            compressed,
            "loaded pack container"
        );
        Ok(Self {
            handle: Mutex::new(Some(file)),
            path: path.to_path_buf(),
            compressed,
            names,
            lengths,
            content_start,
        })
    }

    /// Number of entries in the container.
    pub fn file_count(&self) -> usize {
        self.names.len()
    }

    /// Entry names in on-disk order.
    pub fn filenames(&self) -> &[String] {
        &self.names
    }

    /// Whether entry contents are deflate-compressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Path the container was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the first entry named `name`, if any.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Lists the entries in on-disk order.
    pub fn entries(&self) -> Vec<EntryInfo> {
        self.names
            .iter()
            .zip(&self.lengths)
            .enumerate()
            .map(|(index, (name, length))| EntryInfo {
                index,
                name: name.clone(),
                stored_length: *length,
            })
            .collect()
    }

    /// Reads entry `index`, inflating it when the container is compressed.
    pub fn get_bytes(&self, index: usize) -> Result<Vec<u8>> {
        let stored = self.read_stored(index)?;
        if self.compressed {
            inflate_bytes(&stored)
        } else {
            Ok(stored)
        }
    }

    /// Reads entry `index` into an in-memory stream.
    pub fn get_stream(&self, index: usize) -> Result<Cursor<Vec<u8>>> {
        Ok(Cursor::new(self.get_bytes(index)?))
    }

    /// Writes entry `index` to `target`, creating or truncating it.
    pub fn extract_to_file(&self, index: usize, target: &Path) -> Result<()> {
        let bytes = self.get_bytes(index)?;
        fs::write(target, &bytes)?;
        debug!(index, path = %target.display(), bytes = bytes.len(), "extracted entry");
        Ok(())
    }

    /// Writes entry `index` into `dir` under its stored name and returns
    /// the written path.
    pub fn extract_to_dir(&self, index: usize, dir: &Path) -> Result<PathBuf> {
        let name = self.names.get(index).ok_or(PackFileError::IndexOutOfRange {
            index,
            count: self.names.len(),
        })?;
        fs::create_dir_all(dir)?;
        let target = dir.join(safe_entry_name(name)?);
        self.extract_to_file(index, &target)?;
        Ok(target)
    }

    /// Extracts every entry into `dir` under its stored name and returns
    /// the written paths.
    ///
    /// Entry names carrying path separators or `..` are rejected with
    /// [`InvalidEntryName`](PackFileError::InvalidEntryName) so a hostile
    /// container cannot write outside `dir`.
    pub fn extract_all(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.names.len());
        for (index, name) in self.names.iter().enumerate() {
            let target = dir.join(safe_entry_name(name)?);
            self.extract_to_file(index, &target)?;
            written.push(target);
        }
        Ok(written)
    }

    /// Releases the underlying file handle.
    ///
    /// Further content reads fail with
    /// [`HandleClosed`](PackFileError::HandleClosed); header accessors keep
    /// working. Closing an already closed pack is a no-op.
    pub fn close(&self) {
        let mut guard = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    fn read_stored(&self, index: usize) -> Result<Vec<u8>> {
        let length = *self
            .lengths
            .get(index)
            .ok_or(PackFileError::IndexOutOfRange {
                index,
                count: self.lengths.len(),
            })?;
        let offset = self.content_start + self.lengths[..index].iter().sum::<u64>();
        let length = usize::try_from(length).map_err(|_| {
            PackFileError::invalid_container(format!(
                "entry {index} is too large for this platform"
            ))
        })?;

        let mut guard = self
            .handle
            .lock()
            .map_err(|_| PackFileError::Io(io::Error::other("pack handle lock poisoned")))?;
        let file = guard.as_mut().ok_or(PackFileError::HandleClosed)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; length];
        file.read_exact(&mut buf)?;
        debug!(index, bytes = buf.len(), "read stored entry");
        Ok(buf)
    }
}

/// Validates that an entry name is usable as a bare file name.
fn safe_entry_name(name: &str) -> Result<&str> {
    let unusable = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if unusable {
        return Err(PackFileError::InvalidEntryName {
            name: name.to_owned(),
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_entry_name() {
        assert_eq!(safe_entry_name("clip.wav").unwrap(), "clip.wav");
        assert!(safe_entry_name("a/b").is_err());
        assert!(safe_entry_name("a\\b").is_err());
        assert!(safe_entry_name("..").is_err());
        assert!(safe_entry_name("").is_err());
    }
}
