//! Decoded EXIF metadata.
//!
//! [`ExifReader`] drives the streaming parser into an [`ExifData`] store;
//! [`ExifInterface`] wraps the store with catalog-aware lookups and derived
//! facts such as the display orientation.

mod data;
mod interface;
mod orientation;
mod reader;

pub use data::ExifData;
pub use interface::ExifInterface;
pub use orientation::{orientation_params, OrientationParams};
pub use reader::ExifReader;
