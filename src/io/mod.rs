//! Byte-level input for the EXIF decoder.
//!
//! The decoder never seeks backwards. All structure is read through a
//! [`CountingReader`], which tracks how many bytes have been consumed so that
//! TIFF offsets can be resolved against the current position.

mod counting_reader;
mod endian;

pub use counting_reader::{Charset, CountingReader};
pub use endian::ByteOrder;
