//! Reading projected objects back out of binary block streams.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::debug;
use vorpack_wire::SliceReader;

use crate::binary::{BLOCK_MARKER, BlockInfo};
use crate::error::{ProjectionError, Result};
use crate::member::Projected;
use crate::wire::decode_value;

/// Reads projected objects from a binary block stream.
///
/// The whole stream is buffered up front; every typed read scans it from
/// the start, so targets can be read in any order regardless of the order
/// they were written.
pub struct BinaryReader {
    data: Vec<u8>,
}

impl BinaryReader {
    /// Buffers `reader` to end of stream.
    pub fn new<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self { data })
    }

    /// Opens and buffers a file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProjectionError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ProjectionError::Io(e),
        })?;
        Self::new(file)
    }

    /// Default-constructs a `T` and populates it from the stream.
    pub fn read<T: Projected + Default>(&self) -> Result<T> {
        let mut target = T::default();
        self.read_into(&mut target)?;
        Ok(target)
    }

    /// Populates `target` from the stream.
    ///
    /// Scans from offset 0 for every block naming `T::TYPE_NAME`, decoding
    /// and assigning members at each one; when a type's block repeats, the
    /// last one in the stream wins. Fails with
    /// [`BlockNotFound`](ProjectionError::BlockNotFound) when the stream
    /// holds no such block.
    pub fn read_into<T: Projected>(&self, target: &mut T) -> Result<()> {
        let members = T::members();
        members.check_unique(T::TYPE_NAME)?;

        let mut found = false;
        let mut pos = 0usize;
        while pos + BLOCK_MARKER.len() <= self.data.len() {
            let header = match parse_header(&self.data, pos) {
                Some((name, value_start)) if name == T::TYPE_NAME => value_start,
                _ => {
                    pos += 1;
                    continue;
                }
            };
            let mut cursor = SliceReader::at(&self.data, header);
            for member in members.iter() {
                let value = decode_value(member.kind(), &mut cursor)?;
                if !member.set(target, value) {
                    return Err(ProjectionError::TypeMismatch {
                        type_name: T::TYPE_NAME,
                        member: member.name(),
                        expected: member.kind(),
                    });
                }
            }
            debug!(type_name = T::TYPE_NAME, offset = pos, "decoded block");
            found = true;
            pos = cursor.position();
        }

        if found {
            Ok(())
        } else {
            Err(ProjectionError::BlockNotFound {
                type_name: T::TYPE_NAME,
            })
        }
    }

    /// Lists every block header in the stream, in offset order.
    ///
    /// Without member tables the scan cannot skip block bodies, so a
    /// marker embedded in a string value shows up here too.
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let mut found = Vec::new();
        let mut pos = 0usize;
        while pos + BLOCK_MARKER.len() <= self.data.len() {
            if let Some((type_name, _)) = parse_header(&self.data, pos) {
                found.push(BlockInfo {
                    offset: pos,
                    type_name,
                });
            }
            pos += 1;
        }
        found
    }
}

/// Tries to parse a block header at `pos`: the marker followed by a
/// well-formed length-prefixed name. Returns the name and the offset of
/// the first member value.
fn parse_header(data: &[u8], pos: usize) -> Option<(String, usize)> {
    if !data[pos..].starts_with(&BLOCK_MARKER) {
        return None;
    }
    let mut cursor = SliceReader::at(data, pos + BLOCK_MARKER.len());
    let name = cursor.read_string().ok()?;
    Some((name, cursor.position()))
}

/// Reads one `T` from a binary block file.
pub fn read_binary<T: Projected + Default>(path: &Path) -> Result<T> {
    BinaryReader::open(path)?.read()
}
