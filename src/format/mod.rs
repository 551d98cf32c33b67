//! Container and directory formats.
//!
//! - [`jpeg`] walks JPEG marker segments to find the EXIF APP1 payload
//! - [`tiff`] decodes the TIFF directory structure inside it

pub mod jpeg;
pub mod tiff;

pub use jpeg::{is_sof_marker, seek_tiff_data};
