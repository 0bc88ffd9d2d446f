//! CLI argument definitions for the vorpack tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "vorpack",
    version,
    about = "Pack containers and projection streams for audio session data",
    long_about = "Bundle files into pack containers and inspect projection streams.\n\n\
                  Pack containers hold many files behind one random-access handle,\n\
                  optionally deflate-compressed. Projection streams hold typed object\n\
                  blocks in binary or section-text form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Bundle files into a pack container.
    Pack(PackArgs),

    /// List the entries of a pack container.
    List(ListArgs),

    /// Extract entries from a pack container.
    Unpack(UnpackArgs),

    /// Show the object blocks inside a projection stream.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct PackArgs {
    /// Files to bundle, in the order they should be stored.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Path of the container to create.
    #[arg(short, long, value_name = "PACK")]
    pub output: PathBuf,

    /// Deflate-compress entry contents.
    #[arg(long)]
    pub compress: bool,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Pack container to read.
    #[arg(value_name = "PACK")]
    pub pack: PathBuf,

    /// Emit the listing as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct UnpackArgs {
    /// Pack container to read.
    #[arg(value_name = "PACK")]
    pub pack: PathBuf,

    /// Directory to extract into (default: the container's stem).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extract only the entry with this name.
    #[arg(long, value_name = "NAME")]
    pub entry: Option<String>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Projection stream to scan.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Stream format; auto sniffs the binary block marker.
    #[arg(long, value_enum, default_value = "auto")]
    pub format: StreamFormatArg,

    /// Emit the block listing as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Projection stream format choices.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StreamFormatArg {
    Auto,
    Binary,
    Text,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
