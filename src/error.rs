use thiserror::Error;

use crate::format::tiff::FieldType;

/// Errors that can occur while decoding an EXIF stream.
///
/// Anything returned here aborts the decode. Recoverable anomalies in the
/// directory structure are logged and skipped instead.
#[derive(Debug, Error)]
pub enum ExifError {
    /// Error from the underlying reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a mandatory read or skip completed
    #[error("Unexpected end of stream at byte {offset}: {needed} more bytes required")]
    UnexpectedEof { offset: u64, needed: u64 },

    /// The container or TIFF structure is not valid EXIF
    #[error("Invalid exif format: {0}")]
    Format(#[from] FormatError),
}

impl ExifError {
    /// Whether this error was caused by a truncated stream.
    pub fn is_truncated(&self) -> bool {
        match self {
            ExifError::UnexpectedEof { .. } => true,
            ExifError::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            ExifError::Format(_) => false,
        }
    }
}

/// Fatal violations of the JPEG or TIFF structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Stream does not start with the JPEG SOI marker
    #[error("Invalid JPEG format: expected SOI marker 0xFFD8, got 0x{0:04X}")]
    MissingSoi(u16),

    /// No EXIF APP1 segment before the image data
    #[error("No EXIF APP1 segment found")]
    MissingExif,

    /// TIFF byte order mark is neither II nor MM
    #[error("Invalid TIFF byte order: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// TIFF magic number is not 42
    #[error("Invalid TIFF magic: expected 0x002A, got 0x{0:04X}")]
    InvalidMagic(u16),

    /// IFD0 offset points inside the header or past the addressable range
    #[error("Invalid IFD0 offset: {0}")]
    InvalidIfdOffset(u64),

    /// Entry declares more components than can be addressed
    #[error("Tag 0x{tag:04X}: component count {count} exceeds i32::MAX")]
    ComponentCountTooLarge { tag: u16, count: u64 },

    /// Entry value offset cannot be addressed
    #[error("Tag 0x{tag:04X}: invalid value offset {offset}")]
    OffsetTooLarge { tag: u16, offset: u64 },
}

/// Reasons a tag value could not be assigned or read back.
///
/// These never abort a decode; the tag keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The setter does not apply to the tag's data type
    #[error("{setter} values cannot be stored in a {data_type:?} tag")]
    TypeMismatch {
        setter: &'static str,
        data_type: FieldType,
    },

    /// The tag has a pinned component count that the value does not match
    #[error("Component count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: u32, actual: usize },

    /// A component does not fit the data type's range
    #[error("Component {index} out of range: {value}")]
    OutOfRange { index: usize, value: i64 },

    /// The tag value has not been read yet
    #[error("Tag has no value")]
    NoValue,

    /// The stored value is not an integer or byte sequence
    #[error("Cannot get integer value from {0:?}")]
    NotInteger(FieldType),

    /// Index past the last component
    #[error("Index {index} out of bounds for {len} components")]
    IndexOutOfBounds { index: usize, len: usize },
}
