//! exif-stream - Read EXIF metadata from JPEG files.
//!
//! This binary decodes a file and prints its tags or orientation.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_stream::{
    config::{Cli, Command, DumpConfig, OrientationConfig, OutputFormat},
    ExifData, ExifError, ExifInterface, ExifReader, ExifReport, TAG_ORIENTATION,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Dump(config) => run_dump(config),
        Command::Orientation(config) => run_orientation(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_stream=debug"
    } else {
        "exif_stream=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open(path: &Path) -> Result<BufReader<File>, ExifError> {
    Ok(BufReader::new(File::open(path)?))
}

// =============================================================================
// Dump Command
// =============================================================================

fn run_dump(config: DumpConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let reader = ExifReader::with_options(config.parse_options()).require_exif(config.require_exif);
    let data = match open(&config.path).and_then(|file| reader.read(file)) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read {}: {}", config.path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(tags = data.tag_count(), "Decoded {}", config.path.display());

    let report = ExifReport::from_data(&data);
    match config.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if let Some(ref out) = config.thumbnail_out {
        return write_thumbnail(&data, out);
    }
    ExitCode::SUCCESS
}

fn write_thumbnail(data: &ExifData, out: &Path) -> ExitCode {
    let Some(thumbnail) = data.compressed_thumbnail() else {
        error!("{} has no compressed thumbnail", out.display());
        return ExitCode::FAILURE;
    };
    if let Err(e) = fs::write(out, thumbnail) {
        error!("Failed to write {}: {}", out.display(), e);
        return ExitCode::FAILURE;
    }
    eprintln!("Wrote {} byte thumbnail to {}", thumbnail.len(), out.display());
    ExitCode::SUCCESS
}

// =============================================================================
// Orientation Command
// =============================================================================

fn run_orientation(config: OrientationConfig) -> ExitCode {
    init_logging(config.verbose);

    let mut exif = ExifInterface::new();
    if let Err(e) = open(&config.path).and_then(|file| exif.read_exif(file)) {
        error!("Failed to read {}: {}", config.path.display(), e);
        return ExitCode::FAILURE;
    }

    let Some(code) = exif.tag_int_value(TAG_ORIENTATION) else {
        println!("Orientation: not set");
        return ExitCode::SUCCESS;
    };
    let params = exif.orientation().unwrap_or_default();
    println!("Orientation: {}", code);
    println!("  Rotation: {} degrees", params.rotation);
    println!("  Flip horizontal: {}", params.flip_horizontal);
    println!("  Flip vertical: {}", params.flip_vertical);
    println!("  Swap dimensions: {}", params.invert_dimensions);

    ExitCode::SUCCESS
}
