//! Command-line configuration for exif-stream.
//!
//! Options can be given as flags or, where noted, through environment
//! variables:
//!
//! - `EXIF_OUTPUT_FORMAT` - Report format for `dump` (`text` or `json`)
//! - `EXIF_IFDS` - Comma-separated directories for `dump` (default: all)
//!
//! # Example
//!
//! ```ignore
//! use exif_stream::config::{Cli, Command};
//!
//! match Cli::parse().into_command() {
//!     Command::Dump(config) => println!("{}", config.path.display()),
//!     Command::Orientation(config) => println!("{}", config.path.display()),
//! }
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::format::tiff::{IfdId, ParseOptions};

// =============================================================================
// CLI Arguments
// =============================================================================

/// exif-stream - Read EXIF metadata from JPEG files.
///
/// Decodes the EXIF directories of a JPEG in a single forward pass, without
/// loading the file into memory.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-stream")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print every decoded tag.
    Dump(DumpConfig),

    /// Print the orientation code and the display transform it implies.
    Orientation(OrientationConfig),
}

/// Output format of the `dump` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Directory names accepted by `--ifds`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfdArg {
    Ifd0,
    Ifd1,
    Exif,
    Gps,
    Interop,
}

impl From<IfdArg> for IfdId {
    fn from(arg: IfdArg) -> Self {
        match arg {
            IfdArg::Ifd0 => IfdId::Ifd0,
            IfdArg::Ifd1 => IfdId::Ifd1,
            IfdArg::Exif => IfdId::Exif,
            IfdArg::Gps => IfdId::Gps,
            IfdArg::Interop => IfdId::Interoperability,
        }
    }
}

// =============================================================================
// Dump Command
// =============================================================================

#[derive(clap::Args, Debug, Clone)]
pub struct DumpConfig {
    /// JPEG file to read.
    pub path: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "EXIF_OUTPUT_FORMAT")]
    pub format: OutputFormat,

    /// Directories to decode (comma-separated).
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [IfdArg::Ifd0, IfdArg::Ifd1, IfdArg::Exif, IfdArg::Gps, IfdArg::Interop],
        env = "EXIF_IFDS"
    )]
    pub ifds: Vec<IfdArg>,

    /// Skip thumbnail data.
    #[arg(long, default_value_t = false)]
    pub no_thumbnail: bool,

    /// Write the compressed thumbnail to this file.
    #[arg(long)]
    pub thumbnail_out: Option<PathBuf>,

    /// Fail when the file has no EXIF segment.
    #[arg(long, default_value_t = false)]
    pub require_exif: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl DumpConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.ifds.is_empty() {
            return Err("At least one directory must be selected with --ifds".to_string());
        }
        if self.no_thumbnail && self.thumbnail_out.is_some() {
            return Err(
                "--thumbnail-out cannot be combined with --no-thumbnail".to_string(),
            );
        }
        Ok(())
    }

    /// Parser options for the selected directories.
    pub fn parse_options(&self) -> ParseOptions {
        self.ifds
            .iter()
            .fold(ParseOptions::none(), |options, &ifd| options.with_ifd(ifd.into()))
            .with_thumbnail(!self.no_thumbnail)
    }
}

// =============================================================================
// Orientation Command
// =============================================================================

#[derive(clap::Args, Debug, Clone)]
pub struct OrientationConfig {
    /// JPEG file to read.
    pub path: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
