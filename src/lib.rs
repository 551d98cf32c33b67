//! # exif-stream
//!
//! A streaming EXIF decoder for JPEG images.
//!
//! EXIF metadata lives in a TIFF structure inside a JPEG APP1 segment. This
//! library walks that structure in a single forward pass over any
//! [`std::io::Read`] source, so large files never need to be buffered.
//!
//! ## Features
//!
//! - **Forward-only parsing**: Out-of-line values, sub-directories and
//!   thumbnails are visited in stream order through a pending-offset queue
//! - **Selective decoding**: Only the requested directories produce events
//! - **Tolerant of broken files**: Malformed entries, overlapping values and
//!   implausible offsets are logged and skipped instead of failing the decode
//! - **Thumbnails**: Compressed JPEG thumbnails and uncompressed strips are
//!   captured from IFD1
//!
//! ## Architecture
//!
//! - [`io`] - Byte-counting reader with TIFF byte order
//! - [`mod@format`] - JPEG marker scan and the TIFF directory parser
//! - [`metadata`] - Decoded tag store, reader driver and facade
//! - [`report`] - Serializable report of decoded data
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use exif_stream::ExifInterface;
//!
//! let mut exif = ExifInterface::new();
//! exif.read_exif(File::open("photo.jpg").unwrap()).unwrap();
//! if let Some(orientation) = exif.orientation() {
//!     println!("rotate by {} degrees", orientation.rotation);
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;
pub mod report;

// Re-export commonly used types
pub use config::{Cli, Command, DumpConfig, OrientationConfig, OutputFormat};
pub use error::{ExifError, FormatError, ValueError};
pub use format::tiff::{
    is_ifd_allowed, is_offset_tag, tag_info, tag_name, Event, ExifParser, ExifTag, FieldType,
    IfdData, IfdId, ParseOptions, Rational, TagDefinition, TagInfo, TagValue, DEFINED_TAGS,
    TAG_EXIF_IFD, TAG_GPS_IFD, TAG_INTEROPERABILITY_IFD, TAG_JPEG_INTERCHANGE_FORMAT,
    TAG_JPEG_INTERCHANGE_FORMAT_LENGTH, TAG_ORIENTATION, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
};
pub use format::{is_sof_marker, seek_tiff_data};
pub use io::{ByteOrder, Charset, CountingReader};
pub use metadata::{
    orientation_params, ExifData, ExifInterface, ExifReader, OrientationParams,
};
pub use report::{DirectoryReport, ExifReport, ReportValue, TagReport};
