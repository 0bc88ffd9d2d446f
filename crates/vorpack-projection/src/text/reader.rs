//! Reading projected objects back out of text block streams.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{ProjectionError, Result};
use crate::member::Projected;
use crate::text::parse_value;

/// Reads projected objects from a text block stream.
///
/// The whole stream is buffered up front; every typed read scans the
/// lines from the start, so targets can be read in any order.
pub struct TextReader {
    text: String,
}

impl TextReader {
    /// Buffers `reader` to end of stream. The stream must be UTF-8.
    pub fn new<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let text = String::from_utf8(data)
            .map_err(|_| ProjectionError::invalid_format("stream is not valid UTF-8"))?;
        Ok(Self { text })
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

    /// Populates `target` from the first `[T::TYPE_NAME]` block.
    ///
    /// Every registered member must have a matching key and every key
    /// must match a registered member; a miss in either direction is an
    /// error, never silently skipped.
    pub fn read_into<T: Projected>(&self, target: &mut T) -> Result<()> {
        let members = T::members();
        members.check_unique(T::TYPE_NAME)?;

        let mut items = find_block(&self.text, T::TYPE_NAME)?;
        for member in members.iter() {
            let Some(text) = items.remove(member.name()) else {
                return Err(ProjectionError::MissingKey {
                    type_name: T::TYPE_NAME,
                    key: member.name(),
                });
            };
            let value = parse_value(member.kind(), member.name(), text)?;
            if !member.set(target, value) {
                return Err(ProjectionError::TypeMismatch {
                    type_name: T::TYPE_NAME,
                    member: member.name(),
                    expected: member.kind(),
                });
            }
        }
        if let Some((key, _)) = items.into_iter().next() {
            return Err(ProjectionError::UnknownKey {
                type_name: T::TYPE_NAME,
                key: key.to_owned(),
            });
        }
        debug!(type_name = T::TYPE_NAME, "decoded block");
        Ok(())
    }

    /// Lists every `[TypeName]` header line in the stream, in order.
    pub fn block_names(&self) -> Vec<String> {
        self.text
            .lines()
            .filter_map(|line| {
                let name = line.strip_prefix('[')?.strip_suffix(']')?;
                Some(name.to_owned())
            })
            .collect()
    }
}

/// Finds the first block headed `[type_name]` and collects its
/// `Key=Value` lines. The block ends at a blank or whitespace-only line,
/// a new `[...]` header, a `;` line, or end of stream.
fn find_block<'a>(text: &'a str, type_name: &'static str) -> Result<BTreeMap<&'a str, &'a str>> {
    let header = format!("[{type_name}]");
    let mut lines = text.lines();
    loop {
        match lines.next() {
            None => return Err(ProjectionError::BlockNotFound { type_name }),
            Some(line) if line == header => break,
            Some(_) => {}
        }
    }

    let mut items = BTreeMap::new();
    for line in lines {
        if line.trim().is_empty() || line.starts_with('[') || line.starts_with(';') {
            break;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ProjectionError::invalid_format(format!(
                "expected `Name=value` line in [{type_name}], got {line:?}"
            )));
        };
        if items.insert(key, value).is_some() {
            return Err(ProjectionError::DuplicateKey {
                type_name,
                key: key.to_owned(),
            });
        }
    }
    Ok(items)
}

/// Reads one `T` from a text block file.
pub fn read_text<T: Projected + Default>(path: &Path) -> Result<T> {
    TextReader::open(path)?.read()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "; capture settings\n[WaveHeader]\nrate=48000\nlabel=left\n\n[ChannelStatus]\nenabled=true\n";

    #[test]
    fn test_find_block_collects_pairs() {
        let items = find_block(DOC, "WaveHeader").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items["rate"], "48000");
        assert_eq!(items["label"], "left");
    }

    #[test]
    fn test_find_block_stops_at_next_header() {
        let doc = "[A]\nx=1\n[B]\ny=2\n";
        let items = find_block(doc, "A").unwrap();
        assert_eq!(items.len(), 1);
        assert!(!items.contains_key("y"));
    }

    #[test]
    fn test_find_block_stops_at_comment() {
        let doc = "[A]\nx=1\n; trailing note\ny=2\n";
        let items = find_block(doc, "A").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_find_block_missing() {
        assert!(matches!(
            find_block(DOC, "Missing").unwrap_err(),
            ProjectionError::BlockNotFound {
                type_name: "Missing"
            }
        ));
    }

    #[test]
    fn test_find_block_duplicate_key() {
        let doc = "[A]\nx=1\nx=2\n";
        assert!(matches!(
            find_block(doc, "A").unwrap_err(),
            ProjectionError::DuplicateKey { .. }
        ));
    }

    #[test]
    fn test_find_block_malformed_line() {
        let doc = "[A]\nno separator here\n";
        assert!(matches!(
            find_block(doc, "A").unwrap_err(),
            ProjectionError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn test_block_names() {
        let reader = TextReader {
            text: DOC.to_owned(),
        };
        assert_eq!(reader.block_names(), ["WaveHeader", "ChannelStatus"]);
    }
}
