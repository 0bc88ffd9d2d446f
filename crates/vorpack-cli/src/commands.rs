//! Command implementations for the vorpack CLI.
//!
//! Each subcommand has a data-returning core function plus a `run_*`
//! wrapper that renders the result for the terminal. Tests drive the core
//! functions directly.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;
use tracing::{info, info_span};

use vorpack_packfile::{EntryInfo, PackFile, PackFileBuilder};
use vorpack_projection::{BLOCK_MARKER, BinaryReader, TextReader};

use crate::cli::{InspectArgs, ListArgs, PackArgs, StreamFormatArg, UnpackArgs};

/// Outcome of a `pack` run.
#[derive(Debug, Serialize)]
pub struct PackReport {
    pub path: PathBuf,
    pub compressed: bool,
    pub entries: Vec<EntryInfo>,
}

/// Listing of a pack container.
#[derive(Debug, Serialize)]
pub struct ListReport {
    pub path: PathBuf,
    pub compressed: bool,
    pub entries: Vec<EntryInfo>,
}

/// Block listing of a projection stream.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub format: StreamFormat,
    pub blocks: Vec<BlockEntry>,
}

/// One block inside a projection stream.
#[derive(Debug, Serialize)]
pub struct BlockEntry {
    pub type_name: String,
    /// Byte offset of the block header; absent for text streams.
    pub offset: Option<usize>,
}

/// Resolved projection stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    Binary,
    Text,
}

impl StreamFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Text => "text",
        }
    }
}

/// Bundles `files` into a container at `output` and reports its entries.
pub fn pack_files(files: &[PathBuf], output: &Path, compress: bool) -> Result<PackReport> {
    let span = info_span!("pack", path = %output.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut builder = PackFileBuilder::new();
    for file in files {
        builder
            .add_source_file(file)
            .with_context(|| format!("queue {}", file.display()))?;
    }
    builder
        .build(output, compress)
        .with_context(|| format!("build {}", output.display()))?;

    let pack = PackFile::load(output).context("reopen built container")?;
    let entries = pack.entries();
    pack.close();

    info!(
        entries = entries.len(),
        compress,
        duration_ms = start.elapsed().as_millis(),
        "pack complete"
    );
    Ok(PackReport {
        path: output.to_path_buf(),
        compressed: compress,
        entries,
    })
}

/// Opens a container and returns its entry listing.
pub fn list_entries(pack_path: &Path) -> Result<ListReport> {
    let pack =
        PackFile::load(pack_path).with_context(|| format!("open {}", pack_path.display()))?;
    let report = ListReport {
        path: pack.path().to_path_buf(),
        compressed: pack.is_compressed(),
        entries: pack.entries(),
    };
    pack.close();
    Ok(report)
}

/// Extracts entries from a container into `output_dir`.
///
/// With `entry` set, only the entry with that name is written; otherwise
/// every entry is extracted. Returns the written paths.
pub fn unpack_entries(
    pack_path: &Path,
    output_dir: &Path,
    entry: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let span = info_span!("unpack", path = %pack_path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let pack =
        PackFile::load(pack_path).with_context(|| format!("open {}", pack_path.display()))?;
    let written = if let Some(name) = entry {
        let index = pack
            .index_of(name)
            .with_context(|| format!("no entry named {name:?}"))?;
        fs::create_dir_all(output_dir)?;
        let target = output_dir.join(name);
        pack.extract_to_file(index, &target)?;
        vec![target]
    } else {
        pack.extract_all(output_dir)?
    };
    pack.close();

    info!(
        entries = written.len(),
        duration_ms = start.elapsed().as_millis(),
        "unpack complete"
    );
    Ok(written)
}

/// Scans a projection stream and lists the blocks it holds.
pub fn inspect_stream(path: &Path, format: StreamFormatArg) -> Result<InspectReport> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let resolved = match format {
        StreamFormatArg::Binary => StreamFormat::Binary,
        StreamFormatArg::Text => StreamFormat::Text,
        StreamFormatArg::Auto => {
            if data.starts_with(&BLOCK_MARKER) {
                StreamFormat::Binary
            } else {
                StreamFormat::Text
            }
        }
    };

    let blocks = match resolved {
        StreamFormat::Binary => BinaryReader::new(data.as_slice())?
            .blocks()
            .into_iter()
            .map(|block| BlockEntry {
                type_name: block.type_name,
                offset: Some(block.offset),
            })
            .collect(),
        StreamFormat::Text => TextReader::new(data.as_slice())?
            .block_names()
            .into_iter()
            .map(|name| BlockEntry {
                type_name: name,
                offset: None,
            })
            .collect(),
    };

    Ok(InspectReport {
        path: path.to_path_buf(),
        format: resolved,
        blocks,
    })
}

pub fn run_pack(args: &PackArgs) -> Result<()> {
    let report = pack_files(&args.files, &args.output, args.compress)?;
    println!(
        "Packed {} entries into {}",
        report.entries.len(),
        report.path.display()
    );
    print_entry_table(&report.entries, report.compressed);
    Ok(())
}

pub fn run_list(args: &ListArgs) -> Result<()> {
    let report = list_entries(&args.pack)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("Pack: {}", report.path.display());
    println!(
        "Compressed: {}",
        if report.compressed { "yes" } else { "no" }
    );
    print_entry_table(&report.entries, report.compressed);
    Ok(())
}

pub fn run_unpack(args: &UnpackArgs) -> Result<()> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.pack));
    let written = unpack_entries(&args.pack, &output_dir, args.entry.as_deref())?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let report = inspect_stream(&args.file, args.format)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "Stream: {} ({} format)",
        report.path.display(),
        report.format.as_str()
    );
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Type", "Offset"]);
    for block in &report.blocks {
        let offset = match block.offset {
            Some(offset) => offset.to_string(),
            None => "-".to_owned(),
        };
        table.add_row(vec![
            Cell::new(&block.type_name),
            Cell::new(offset).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Default extraction directory: the container path without its extension.
fn default_output_dir(pack: &Path) -> PathBuf {
    let dir = match pack.file_stem() {
        Some(stem) => pack.with_file_name(stem),
        None => PathBuf::from("unpacked"),
    };
    if dir == pack {
        pack.with_extension("unpacked")
    } else {
        dir
    }
}

fn print_entry_table(entries: &[EntryInfo], compressed: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let stored = if compressed {
        "Stored (deflate)"
    } else {
        "Stored"
    };
    table.set_header(vec!["#", "Name", stored]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.index),
            Cell::new(&entry.name),
            Cell::new(entry.stored_length).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir_strips_extension() {
        assert_eq!(
            default_output_dir(Path::new("/tmp/bundle.pack")),
            PathBuf::from("/tmp/bundle")
        );
    }

    #[test]
    fn test_default_output_dir_never_collides_with_pack() {
        let dir = default_output_dir(Path::new("/tmp/bundle"));
        assert_ne!(dir, PathBuf::from("/tmp/bundle"));
    }
}
