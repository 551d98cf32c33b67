//! EXIF directory decoding.
//!
//! EXIF metadata is a TIFF structure embedded in a JPEG APP1 segment. This
//! module handles the TIFF side: the tag vocabulary, decoded entries,
//! per-directory storage and the streaming parser.
//!
//! # Key Concepts
//!
//! - **Byte order**: The TIFF header declares its endianness (II = little-endian,
//!   MM = big-endian). All multi-byte values must be read respecting this order.
//!
//! - **IFD (Image File Directory)**: A list of 12-byte entries. EXIF files have
//!   up to five: IFD0 (primary image), IFD1 (thumbnail) and the EXIF, GPS and
//!   interoperability sub-directories reached through pointer tags.
//!
//! - **Inline vs offset values**: Values of at most 4 bytes are stored inline in
//!   the entry, larger values are stored at an offset pointed to by the entry.

mod entry;
mod ifd;
mod parser;
mod tags;

pub use entry::{ExifTag, Rational, TagValue};
pub use ifd::IfdData;
pub use parser::{
    Event, ExifParser, ParseOptions, DEFAULT_IFD0_OFFSET, OFFSET_SIZE, TAG_SIZE,
};
pub use tags::{
    is_ifd_allowed, is_offset_tag, tag_info, tag_name, FieldType, IfdId, TagDefinition, TagInfo,
    DEFINED_TAGS, INLINE_VALUE_SIZE, SIZE_UNDEFINED, TAG_EXIF_IFD, TAG_GPS_IFD,
    TAG_INTEROPERABILITY_IFD, TAG_JPEG_INTERCHANGE_FORMAT, TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
    TAG_ORIENTATION, TAG_STRIP_BYTE_COUNTS, TAG_STRIP_OFFSETS,
};
