use serde::Serialize;

/// "II": Intel, little-endian
const MARK_LITTLE_ENDIAN: u16 = 0x4949;

/// "MM": Motorola, big-endian
const MARK_BIG_ENDIAN: u16 = 0x4D4D;

/// Byte order of multi-byte TIFF values.
///
/// JPEG markers are always big-endian. The TIFF payload inside APP1 declares
/// its own order in its first two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ByteOrder {
    LittleEndian,
    #[default]
    BigEndian,
}

impl ByteOrder {
    /// Order named by a TIFF header mark, read as a big-endian u16.
    pub const fn from_mark(mark: u16) -> Option<Self> {
        match mark {
            MARK_LITTLE_ENDIAN => Some(ByteOrder::LittleEndian),
            MARK_BIG_ENDIAN => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Short name used in reports ("II" or "MM").
    pub const fn mark(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "II",
            ByteOrder::BigEndian => "MM",
        }
    }

    #[inline]
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}
