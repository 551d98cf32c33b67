//! Malformed input tests.
//!
//! Tests verify:
//! - Broken entries and directories are skipped without losing the rest
//! - Values are truncated instead of running into later structures
//! - Thumbnails overlapping a value are dropped
//! - Fatal conditions surface as errors

use exif_stream::{ExifData, ExifError, ExifReader, FormatError, IfdId};

use super::test_utils::{wrap_in_jpeg, ByteOrderType, TiffWriter};

fn decode(tiff: Vec<u8>) -> ExifData {
    ExifReader::new().read(&wrap_in_jpeg(&tiff)[..]).unwrap()
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn test_unsupported_type_is_dropped() {
    // FLOAT (11) and SSHORT (8) entries around a valid one
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let tiff = TiffWriter::new(order)
            .header(8)
            .u16(3)
            .entry(0x0100, 11, 1, 0)
            .entry_short(0x0112, 8)
            .entry(0x0101, 8, 1, 0)
            .u32(0)
            .into_bytes();

        let data = decode(tiff);
        assert_eq!(data.tag_count(), 1);
        assert_eq!(data.tag(0x0112, IfdId::Ifd0).unwrap().value_at(0), Ok(8));
    }
}

#[test]
fn test_value_behind_position_is_dropped() {
    // An ASCII value pointing into the header cannot be reached going forward
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(2)
        .entry(0x010F, 2, 6, 0)
        .entry_short(0x0112, 1)
        .u32(0)
        .into_bytes();

    let data = decode(tiff);
    assert!(data.tag(0x010F, IfdId::Ifd0).is_none());
    assert!(data.tag(0x0112, IfdId::Ifd0).is_some());
}

#[test]
fn test_undefined_value_before_ifd0() {
    // Header, 12 private bytes, IFD0 at 20 pointing back into them
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(20)
        .bytes(b"PRIVATE-DATA")
        .u16(2)
        .entry(0x927C, 7, 12, 8)
        .entry(0x010F, 2, 6, 8)
        .u32(0)
        .into_bytes();

    let data = decode(tiff);
    let maker_note = data.tag(0x927C, IfdId::Ifd0).unwrap();
    assert_eq!(maker_note.value_as_bytes(), Some(&b"PRIVATE-DATA"[..]));
    // Only UNDEFINED values are recovered from the gap
    assert!(data.tag(0x010F, IfdId::Ifd0).is_none());
}

#[test]
fn test_count_too_large_is_fatal() {
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry(0x010F, 2, 0x8000_0000, 26)
        .u32(0)
        .into_bytes();

    let result = ExifReader::new().read(&wrap_in_jpeg(&tiff)[..]);
    assert!(matches!(
        result,
        Err(ExifError::Format(FormatError::ComponentCountTooLarge {
            tag: 0x010F,
            count: 0x8000_0000
        }))
    ));
}

#[test]
fn test_offset_too_large_is_fatal() {
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(8)
        .u16(1)
        .entry(0x010F, 2, 8, 0xFFFF_FFF0)
        .u32(0)
        .into_bytes();

    let result = ExifReader::new().read(&wrap_in_jpeg(&tiff)[..]);
    assert!(matches!(
        result,
        Err(ExifError::Format(FormatError::OffsetTooLarge { tag: 0x010F, .. }))
    ));
}

// =============================================================================
// Directories
// =============================================================================

#[test]
fn test_oversized_ifd_keeps_earlier_tags() {
    // IFD0 (8) ends at 38; the EXIF directory there claims 500 entries
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(2)
        .entry_short(0x0112, 3)
        .entry(0x8769, 4, 1, 38)
        .u32(0)
        .u16(500)
        .bytes(&[0u8; 12])
        .into_bytes();

    let data = decode(tiff);
    assert_eq!(data.tag(0x0112, IfdId::Ifd0).unwrap().value_at(0), Ok(3));
    assert!(data.ifd_data(IfdId::Exif).is_none());
}

#[test]
fn test_pointer_outside_segment_is_ignored() {
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(8)
        .u16(2)
        .entry_short(0x0112, 6)
        .entry(0x8825, 4, 1, 0x0100_0000)
        .u32(0)
        .into_bytes();

    let data = decode(tiff);
    assert_eq!(data.tag(0x0112, IfdId::Ifd0).unwrap().value_at(0), Ok(6));
    assert!(data.ifd_data(IfdId::Gps).is_none());
}

#[test]
fn test_pointer_in_wrong_directory_is_not_followed() {
    // An interoperability pointer belongs in the EXIF directory, not IFD0
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry(0xA005, 4, 1, 26)
        .u32(0)
        .u16(1)
        .entry_short(0x0002, 0x0100)
        .u32(0)
        .into_bytes();

    let data = decode(tiff);
    assert!(data.tag(0xA005, IfdId::Ifd0).is_some());
    assert!(data.ifd_data(IfdId::Interoperability).is_none());
}

#[test]
fn test_link_without_room_is_not_read() {
    // EXIF (26) has one entry whose value starts right after the table,
    // leaving no room for a trailing link
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry(0x8769, 4, 1, 26)
        .u32(0)
        .u16(1)
        .entry(0x9003, 2, 20, 40)
        .bytes(b"2024:01:02 03:04:05\0")
        .into_bytes();

    let data = decode(tiff);
    assert_eq!(
        data.tag(0x9003, IfdId::Exif)
            .unwrap()
            .value_as_string()
            .as_deref(),
        Some("2024:01:02 03:04:05")
    );
}

// =============================================================================
// Overlaps
// =============================================================================

#[test]
fn test_string_overlapping_ifd_is_truncated() {
    // Make claims 20 bytes at 38 but the EXIF directory starts at 48
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(2)
        .entry(0x010F, 2, 20, 38)
        .entry(0x8769, 4, 1, 48)
        .u32(0)
        .bytes(b"HelloWorld")
        .u16(1)
        .entry_short(0x8827, 100)
        .u32(0)
        .into_bytes();

    let data = decode(tiff);
    // Cut to the 10 bytes before the directory, the last one becoming NUL
    let make = data.tag(0x010F, IfdId::Ifd0).unwrap();
    assert_eq!(make.component_count(), 10);
    assert_eq!(make.value_as_string().as_deref(), Some("HelloWorl"));
    assert_eq!(data.tag(0x8827, IfdId::Exif).unwrap().value_at(0), Ok(100));
}

/// IFD0 (8) links to IFD1 (26). IFD1 holds a thumbnail pointer, its length
/// and a 16-byte UNDEFINED value at 68.
fn thumbnail_layout(thumbnail_offset: u32) -> Vec<u8> {
    let mut payload = [0x55u8; 20];
    let start = (thumbnail_offset - 68) as usize;
    payload[start..start + 4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);

    TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 1)
        .u32(26)
        .u16(3)
        .entry(0x0201, 4, 1, thumbnail_offset)
        .entry(0x0202, 4, 1, 4)
        .entry(0xC4A5, 7, 16, 68)
        .u32(0)
        .bytes(&payload)
        .into_bytes()
}

#[test]
fn test_thumbnail_after_value_is_captured() {
    let data = decode(thumbnail_layout(84));
    assert_eq!(
        data.compressed_thumbnail().unwrap().as_ref(),
        &[0xFF, 0xD8, 0xFF, 0xD9]
    );
    assert_eq!(
        data.tag(0xC4A5, IfdId::Ifd1).unwrap().value_as_bytes().unwrap().len(),
        16
    );
}

#[test]
fn test_thumbnail_overlapping_value_is_dropped() {
    let data = decode(thumbnail_layout(72));
    assert!(!data.has_compressed_thumbnail());

    // The value keeps its full length
    let value = data.tag(0xC4A5, IfdId::Ifd1).unwrap();
    assert_eq!(value.component_count(), 16);
    assert_eq!(&value.value_as_bytes().unwrap()[4..8], &[0xFF, 0xD8, 0xFF, 0xD9]);
}

#[test]
fn test_short_thumbnail_is_not_stored() {
    // Declared length runs past the end of the segment
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 1)
        .u32(26)
        .u16(2)
        .entry(0x0201, 4, 1, 56)
        .entry(0x0202, 4, 1, 4096)
        .u32(0)
        .bytes(&[0xFF, 0xD8, 0xFF, 0xD9])
        .into_bytes();

    let data = decode(tiff);
    assert!(!data.has_compressed_thumbnail());
    assert!(data.ifd_data(IfdId::Ifd1).is_some());
}

// =============================================================================
// Truncation
// =============================================================================

#[test]
fn test_truncated_stream_is_fatal() {
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 1)
        .u32(0)
        .into_bytes();
    let jpeg = wrap_in_jpeg(&tiff);

    // Cut inside the IFD0 entry
    let result = ExifReader::new().read(&jpeg[..jpeg.len() - 12]);
    assert!(result.unwrap_err().is_truncated());
}
