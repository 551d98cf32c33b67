//! JPEG container handling.
//!
//! EXIF metadata lives in an APP1 segment near the start of a JPEG stream:
//!
//! ```text
//! FFD8                      SOI
//! FFxx LLLL <payload>       any number of marker segments
//! FFE1 LLLL "Exif\0\0" <TIFF header + directories>
//! ...
//! FFC0..FFCF                start of frame: image data follows
//! ```
//!
//! Segment lengths are big-endian and include the two length bytes
//! themselves. Only the segment structure is walked; entropy-coded data is
//! never read.

use std::io::Read;

use tracing::warn;

use crate::error::{ExifError, FormatError};
use crate::io::CountingReader;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: u16 = 0xFFD8;

/// End Of Image marker
pub const EOI: u16 = 0xFFD9;

/// Application segment 1 (EXIF) marker
pub const APP1: u16 = 0xFFE1;

/// First Start Of Frame marker (baseline DCT)
pub const SOF0: u16 = 0xFFC0;

/// Last Start Of Frame marker (lossless, arithmetic coding)
pub const SOF15: u16 = 0xFFCF;

/// Define Huffman Table marker (inside the SOF range but not a frame)
pub const DHT: u16 = 0xFFC4;

/// Reserved JPEG extension marker (inside the SOF range but not a frame)
pub const JPG: u16 = 0xFFC8;

/// Define Arithmetic Coding marker (inside the SOF range but not a frame)
pub const DAC: u16 = 0xFFCC;

/// "Exif" identifier at the start of an EXIF APP1 payload
pub const EXIF_HEADER: u32 = 0x4578_6966;

/// Two NUL bytes following the identifier
pub const EXIF_HEADER_TAIL: u16 = 0x0000;

/// Whether `marker` starts a frame (image data follows).
#[inline]
pub fn is_sof_marker(marker: u16) -> bool {
    (SOF0..=SOF15).contains(&marker) && marker != DHT && marker != JPG && marker != DAC
}

// =============================================================================
// APP1 Scan
// =============================================================================

/// Walk the marker segments until the EXIF APP1 payload.
///
/// On success the reader is positioned at the first byte of the TIFF header
/// and the returned bound is the segment length minus the 6-byte EXIF
/// identifier, which caps where directories may end relative to the TIFF
/// header.
///
/// # Returns
/// `None` if EOI or a frame marker is reached first, or if a segment length
/// is inconsistent with the stream.
///
/// # Errors
/// - `MissingSoi` if the stream does not start with SOI
/// - `UnexpectedEof` if the stream ends while reading a marker
pub fn seek_tiff_data<R: Read>(reader: &mut CountingReader<R>) -> Result<Option<u64>, ExifError> {
    let soi = reader.read_u16()?;
    if soi != SOI {
        return Err(FormatError::MissingSoi(soi).into());
    }

    let mut marker = reader.read_u16()?;
    while marker != EOI && !is_sof_marker(marker) {
        let mut length = u64::from(reader.read_u16()?);
        // Some files carry several APP1 segments; keep looking for the EXIF one
        if marker == APP1 && length >= 8 {
            let header = reader.read_u32()?;
            let header_tail = reader.read_u16()?;
            length -= 6;
            if header == EXIF_HEADER && header_tail == EXIF_HEADER_TAIL {
                return Ok(Some(length));
            }
        }
        if length < 2 || reader.skip(length - 2)? != length - 2 {
            warn!(
                marker = format_args!("{:#06X}", marker),
                length, "Invalid JPEG format: bad segment length"
            );
            return Ok(None);
        }
        marker = reader.read_u16()?;
    }
    Ok(None)
}

// =============================================================================
// Tests
// =============================================================================
