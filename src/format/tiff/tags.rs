//! EXIF tag and field type definitions.
//!
//! This module defines the vocabulary for EXIF parsing, including:
//! - Field types that determine how values are encoded
//! - Directory (IFD) identifiers
//! - The catalog of tags the decoder needs to follow pointers and locate
//!   thumbnail data
//!
//! Tags outside the catalog are still decoded and stored; the catalog only
//! decides which entries steer the traversal.

// =============================================================================
// Field Types
// =============================================================================

/// EXIF field types that determine how values are encoded.
///
/// Each field type has a specific size in bytes, which is critical for:
/// - Determining if a value fits inline in an IFD entry
/// - Reading arrays of values correctly
///
/// SBYTE, SSHORT, FLOAT and DOUBLE are not part of the EXIF value model; entries
/// using them are dropped during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer (1 byte)
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated (1 byte)
    Ascii = 2,

    /// Unsigned 16-bit integer (2 bytes)
    Short = 3,

    /// Unsigned 32-bit integer (4 bytes)
    Long = 4,

    /// Two unsigned 32-bit integers (8 bytes)
    Rational = 5,

    /// Undefined byte data (1 byte per element)
    Undefined = 7,

    /// Signed 32-bit integer (4 bytes)
    SLong = 9,

    /// Two signed 32-bit integers (8 bytes)
    SRational = 10,
}

impl FieldType {
    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> u64 {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::Undefined => 1,
            FieldType::Short => 2,
            FieldType::Long | FieldType::SLong => 4,
            FieldType::Rational | FieldType::SRational => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unsupported or unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            7 => Some(FieldType::Undefined),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            _ => None,
        }
    }

    /// Get the numeric type code.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Upper-case type name as used in the EXIF standard.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "UNSIGNED_BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "UNSIGNED_SHORT",
            FieldType::Long => "UNSIGNED_LONG",
            FieldType::Rational => "UNSIGNED_RATIONAL",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SLong => "LONG",
            FieldType::SRational => "RATIONAL",
        }
    }
}

/// Maximum bytes that can be stored inline in an IFD entry.
pub const INLINE_VALUE_SIZE: u64 = 4;

/// Component count meaning "any length".
pub const SIZE_UNDEFINED: u32 = 0;

// =============================================================================
// Directories
// =============================================================================

/// The five EXIF directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum IfdId {
    /// Primary image directory
    Ifd0 = 0,
    /// Thumbnail directory, linked from IFD0
    Ifd1 = 1,
    /// EXIF sub-directory
    Exif = 2,
    /// GPS sub-directory
    Gps = 3,
    /// Interoperability sub-directory, linked from EXIF
    Interoperability = 4,
}

impl IfdId {
    /// Number of directories.
    pub const COUNT: usize = 5;

    /// All directories in id order.
    pub const ALL: [IfdId; Self::COUNT] = [
        IfdId::Ifd0,
        IfdId::Ifd1,
        IfdId::Exif,
        IfdId::Gps,
        IfdId::Interoperability,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit used for this directory in allowed-directory masks.
    #[inline]
    pub const fn flag(self) -> u8 {
        1 << (self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            IfdId::Ifd0 => "IFD0",
            IfdId::Ifd1 => "IFD1",
            IfdId::Exif => "EXIF",
            IfdId::Gps => "GPS",
            IfdId::Interoperability => "INTEROP",
        }
    }
}

// =============================================================================
// Tag Definitions
// =============================================================================

/// A catalogued tag: its default directory packed with its 16-bit id as
/// `(ifd << 16) | tag_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagDefinition(u32);

impl TagDefinition {
    pub const fn new(ifd: IfdId, tag_id: u16) -> Self {
        Self(((ifd as u32) << 16) | tag_id as u32)
    }

    #[inline]
    pub const fn tag_id(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Directory the tag lives in unless placed elsewhere.
    pub fn default_ifd(self) -> Option<IfdId> {
        IfdId::from_index((self.0 >> 16) as u8)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Strip data offsets (thumbnail or primary image)
pub const TAG_STRIP_OFFSETS: TagDefinition = TagDefinition::new(IfdId::Ifd0, 0x0111);

/// Image orientation (1-8)
pub const TAG_ORIENTATION: TagDefinition = TagDefinition::new(IfdId::Ifd0, 0x0112);

/// Strip byte counts
pub const TAG_STRIP_BYTE_COUNTS: TagDefinition = TagDefinition::new(IfdId::Ifd0, 0x0117);

/// Offset of the EXIF sub-directory
pub const TAG_EXIF_IFD: TagDefinition = TagDefinition::new(IfdId::Ifd0, 0x8769);

/// Offset of the GPS sub-directory
pub const TAG_GPS_IFD: TagDefinition = TagDefinition::new(IfdId::Ifd0, 0x8825);

/// Offset of the compressed JPEG thumbnail
pub const TAG_JPEG_INTERCHANGE_FORMAT: TagDefinition = TagDefinition::new(IfdId::Ifd1, 0x0201);

/// Length of the compressed JPEG thumbnail
pub const TAG_JPEG_INTERCHANGE_FORMAT_LENGTH: TagDefinition =
    TagDefinition::new(IfdId::Ifd1, 0x0202);

/// Offset of the interoperability sub-directory
pub const TAG_INTEROPERABILITY_IFD: TagDefinition = TagDefinition::new(IfdId::Exif, 0xA005);

/// Every catalogued tag.
pub const DEFINED_TAGS: [TagDefinition; 8] = [
    TAG_STRIP_OFFSETS,
    TAG_ORIENTATION,
    TAG_STRIP_BYTE_COUNTS,
    TAG_EXIF_IFD,
    TAG_GPS_IFD,
    TAG_JPEG_INTERCHANGE_FORMAT,
    TAG_JPEG_INTERCHANGE_FORMAT_LENGTH,
    TAG_INTEROPERABILITY_IFD,
];

// =============================================================================
// Tag Info
// =============================================================================

/// Catalog record packed as `allowed_ifd_flags << 24 | type << 16 | count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo(u32);

impl TagInfo {
    const fn new(allowed: &[IfdId], data_type: FieldType, default_count: u16) -> Self {
        let mut flags = 0u32;
        let mut i = 0;
        while i < allowed.len() {
            flags |= allowed[i].flag() as u32;
            i += 1;
        }
        Self((flags << 24) | ((data_type as u32) << 16) | default_count as u32)
    }

    pub fn data_type(self) -> Option<FieldType> {
        FieldType::from_u16(((self.0 >> 16) & 0xFF) as u16)
    }

    /// Declared component count; [`SIZE_UNDEFINED`] means any length.
    #[inline]
    pub const fn default_count(self) -> u32 {
        self.0 & 0xFFFF
    }

    #[inline]
    pub const fn allowed_ifd_flags(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn allowed_ifds(self) -> impl Iterator<Item = IfdId> {
        IfdId::ALL
            .into_iter()
            .filter(move |ifd| self.allowed_ifd_flags() & ifd.flag() != 0)
    }
}

const IFD0_AND_IFD1: [IfdId; 2] = [IfdId::Ifd0, IfdId::Ifd1];

/// Look up the catalog record for a tag definition.
pub fn tag_info(definition: TagDefinition) -> Option<TagInfo> {
    let info = match definition {
        TAG_STRIP_OFFSETS => TagInfo::new(&IFD0_AND_IFD1, FieldType::Long, 0),
        TAG_ORIENTATION => TagInfo::new(&IFD0_AND_IFD1, FieldType::Short, 1),
        TAG_STRIP_BYTE_COUNTS => TagInfo::new(&IFD0_AND_IFD1, FieldType::Long, 0),
        TAG_EXIF_IFD => TagInfo::new(&IFD0_AND_IFD1, FieldType::Long, 1),
        TAG_GPS_IFD => TagInfo::new(&IFD0_AND_IFD1, FieldType::Long, 1),
        TAG_JPEG_INTERCHANGE_FORMAT => TagInfo::new(&[IfdId::Ifd1], FieldType::Long, 1),
        TAG_JPEG_INTERCHANGE_FORMAT_LENGTH => TagInfo::new(&[IfdId::Ifd1], FieldType::Long, 1),
        TAG_INTEROPERABILITY_IFD => TagInfo::new(&[IfdId::Exif], FieldType::Long, 1),
        _ => return None,
    };
    Some(info)
}

/// Whether a tag described by `info` may appear in `ifd`.
#[inline]
pub fn is_ifd_allowed(info: TagInfo, ifd: IfdId) -> bool {
    info.allowed_ifd_flags() & ifd.flag() != 0
}

/// Whether the tag's value is a file offset that is only meaningful for the
/// file it was read from.
pub fn is_offset_tag(tag_id: u16) -> bool {
    tag_id == TAG_GPS_IFD.tag_id()
        || tag_id == TAG_EXIF_IFD.tag_id()
        || tag_id == TAG_JPEG_INTERCHANGE_FORMAT.tag_id()
        || tag_id == TAG_INTEROPERABILITY_IFD.tag_id()
        || tag_id == TAG_STRIP_OFFSETS.tag_id()
}

/// Name of a catalogued tag id.
pub fn tag_name(tag_id: u16) -> Option<&'static str> {
    let name = match tag_id {
        0x0111 => "StripOffsets",
        0x0112 => "Orientation",
        0x0117 => "StripByteCounts",
        0x8769 => "ExifIfdPointer",
        0x8825 => "GpsInfoIfdPointer",
        0x0201 => "JpegInterchangeFormat",
        0x0202 => "JpegInterchangeFormatLength",
        0xA005 => "InteroperabilityIfdPointer",
        _ => return None,
    };
    Some(name)
}

// =============================================================================
// Tests
// =============================================================================
