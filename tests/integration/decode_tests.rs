//! End-to-end decoding tests.
//!
//! Tests verify:
//! - Camera-style EXIF data decodes identically in both byte orders
//! - Every value type round-trips through the file format
//! - Thumbnails and strips are captured
//! - Files without EXIF decode to an empty store

use exif_stream::{
    ExifData, ExifError, ExifInterface, ExifReader, FieldType, FormatError, IfdId, Rational,
    TAG_ORIENTATION,
};

use super::test_utils::{
    camera_exif, create_test_jpeg, insert_exif, wrap_in_jpeg, ByteOrderType, TiffWriter,
};

fn decode(jpeg: &[u8]) -> ExifData {
    ExifReader::new().read(jpeg).unwrap()
}

fn camera_jpeg(order: ByteOrderType, orientation: u16) -> (Vec<u8>, Vec<u8>) {
    let thumbnail = create_test_jpeg(16, 16, 75);
    let tiff = camera_exif(order, orientation)
        .with_thumbnail(thumbnail.clone())
        .build_tiff();
    let jpeg = insert_exif(&create_test_jpeg(64, 48, 85), &tiff);
    (jpeg, thumbnail)
}

// =============================================================================
// Camera Files
// =============================================================================

#[test]
fn test_decode_camera_file_little_endian() {
    let (jpeg, thumbnail) = camera_jpeg(ByteOrderType::LittleEndian, 6);
    let data = decode(&jpeg);

    assert_eq!(data.byte_order().mark(), "II");

    let make = data.tag(0x010F, IfdId::Ifd0).unwrap();
    assert_eq!(make.data_type(), FieldType::Ascii);
    assert_eq!(make.value_as_string().as_deref(), Some("Canon"));
    assert_eq!(
        data.tag(0x0110, IfdId::Ifd0).unwrap().value_as_string().as_deref(),
        Some("Canon EOS 5D Mark IV")
    );
    assert_eq!(data.tag(0x0112, IfdId::Ifd0).unwrap().value_at(0), Ok(6));
    assert_eq!(
        data.tag(0x011A, IfdId::Ifd0).unwrap().value_as_rationals(),
        Some(&[Rational::new(72, 1)][..])
    );

    assert_eq!(
        data.tag(0x829A, IfdId::Exif).unwrap().value_as_rationals(),
        Some(&[Rational::new(1, 250)][..])
    );
    assert_eq!(data.tag(0x8827, IfdId::Exif).unwrap().value_at(0), Ok(400));
    assert_eq!(
        data.tag(0x9000, IfdId::Exif).unwrap().value_as_bytes(),
        Some(&b"0231"[..])
    );
    assert_eq!(
        data.tag(0x9204, IfdId::Exif).unwrap().value_as_rationals(),
        Some(&[Rational::new(-1, 3)][..])
    );
    assert_eq!(
        data.tag(0x9003, IfdId::Exif).unwrap().value_as_string().as_deref(),
        Some("2024:05:01 10:20:30")
    );

    assert_eq!(
        data.tag(0x0001, IfdId::Gps).unwrap().value_as_string().as_deref(),
        Some("N")
    );
    assert_eq!(
        data.tag(0x0002, IfdId::Gps).unwrap().value_as_rationals(),
        Some(
            &[
                Rational::new(48, 1),
                Rational::new(51, 1),
                Rational::new(2964, 100)
            ][..]
        )
    );
    assert_eq!(
        data.tag(0x0001, IfdId::Interoperability)
            .unwrap()
            .value_as_string()
            .as_deref(),
        Some("R98")
    );

    assert_eq!(data.compressed_thumbnail().unwrap().as_ref(), &thumbnail[..]);
}

#[test]
fn test_decode_camera_file_big_endian() {
    let (jpeg, _) = camera_jpeg(ByteOrderType::BigEndian, 3);
    let data = decode(&jpeg);

    assert_eq!(data.byte_order().mark(), "MM");
    assert_eq!(data.tag(0x0112, IfdId::Ifd0).unwrap().value_at(0), Ok(3));
    assert_eq!(data.tag(0x8827, IfdId::Exif).unwrap().value_at(0), Ok(400));
    assert_eq!(
        data.tag(0x9204, IfdId::Exif).unwrap().value_as_rationals(),
        Some(&[Rational::new(-1, 3)][..])
    );
}

#[test]
fn test_all_directories_present() {
    let (jpeg, _) = camera_jpeg(ByteOrderType::LittleEndian, 1);
    let data = decode(&jpeg);

    let ids: Vec<IfdId> = data.ifds().map(|ifd| ifd.id()).collect();
    assert_eq!(ids, IfdId::ALL.to_vec());

    // Pointer tags are stored alongside regular tags
    assert!(data.tag(0x8769, IfdId::Ifd0).is_some());
    assert!(data.tag(0x8825, IfdId::Ifd0).is_some());
    assert!(data.tag(0xA005, IfdId::Exif).is_some());
    assert!(data.tag(0x0201, IfdId::Ifd1).is_some());
    assert_eq!(data.tag_count(), 6 + 2 + 6 + 2 + 1);
}

#[test]
fn test_byte_orders_decode_to_equal_data() {
    let (le, _) = camera_jpeg(ByteOrderType::LittleEndian, 8);
    let (be, _) = camera_jpeg(ByteOrderType::BigEndian, 8);
    assert_eq!(decode(&le), decode(&be));
}

#[test]
fn test_layout_does_not_affect_equality() {
    // A gap before IFD0 moves every offset, but offset tags are not compared
    let plain = camera_exif(ByteOrderType::BigEndian, 1).build_jpeg();
    let shifted = camera_exif(ByteOrderType::BigEndian, 1)
        .with_gap(&[0xAB; 16])
        .build_jpeg();

    let a = decode(&plain);
    let b = decode(&shifted);
    assert_ne!(
        a.tag(0x8769, IfdId::Ifd0).unwrap().value_at(0),
        b.tag(0x8769, IfdId::Ifd0).unwrap().value_at(0)
    );
    assert_eq!(a, b);
}

#[test]
fn test_decode_is_repeatable() {
    let (jpeg, _) = camera_jpeg(ByteOrderType::LittleEndian, 5);
    assert_eq!(decode(&jpeg), decode(&jpeg));
}

// =============================================================================
// Thumbnails
// =============================================================================

#[test]
fn test_thumbnail_is_a_valid_jpeg() {
    let (jpeg, _) = camera_jpeg(ByteOrderType::BigEndian, 1);
    let data = decode(&jpeg);

    let thumbnail = data.compressed_thumbnail().unwrap();
    let img = image::load_from_memory(thumbnail).unwrap();
    assert_eq!(img.width(), 16);
    assert_eq!(img.height(), 16);
}

#[test]
fn test_inline_strip_offsets() {
    // IFD0 (8): orientation, link -> 26
    // IFD1 (26): StripOffsets SHORT[2] = 56, 60; StripByteCounts SHORT[2] = 4, 6
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 1)
        .u32(26)
        .u16(2)
        .entry_inline(0x0111, 3, 2, [56, 0, 60, 0])
        .entry_inline(0x0117, 3, 2, [4, 0, 6, 0])
        .u32(0)
        .bytes(&[1, 2, 3, 4])
        .bytes(&[5, 6, 7, 8, 9, 10])
        .into_bytes();

    let data = decode(&wrap_in_jpeg(&tiff));
    assert_eq!(data.strip_count(), 2);
    assert_eq!(data.strip_bytes(0).unwrap().as_ref(), &[1, 2, 3, 4]);
    assert_eq!(data.strip_bytes(1).unwrap().as_ref(), &[5, 6, 7, 8, 9, 10]);
    assert!(!data.has_compressed_thumbnail());
}

#[test]
fn test_deferred_strip_offsets() {
    // StripOffsets LONG[2] stored out of line at 56, strips at 64 and 67
    let tiff = TiffWriter::new(ByteOrderType::BigEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 1)
        .u32(26)
        .u16(2)
        .entry(0x0111, 4, 2, 56)
        .entry_inline(0x0117, 3, 2, [0, 3, 0, 5])
        .u32(0)
        .u32(64)
        .u32(67)
        .bytes(b"abc")
        .bytes(b"defgh")
        .into_bytes();

    let data = decode(&wrap_in_jpeg(&tiff));
    assert_eq!(
        data.tag(0x0111, IfdId::Ifd1).unwrap().value_as_longs(),
        Some(&[64, 67][..])
    );
    assert_eq!(data.strip_bytes(0).unwrap().as_ref(), b"abc");
    assert_eq!(data.strip_bytes(1).unwrap().as_ref(), b"defgh");
}

#[test]
fn test_thumbnail_skipped_when_not_requested() {
    let (jpeg, _) = camera_jpeg(ByteOrderType::LittleEndian, 1);
    let options = exif_stream::ParseOptions::all().with_thumbnail(false);
    let data = ExifReader::with_options(options).read(&jpeg[..]).unwrap();
    assert!(!data.has_compressed_thumbnail());
    assert!(data.ifd_data(IfdId::Ifd1).is_some());
}

// =============================================================================
// Files Without EXIF
// =============================================================================

#[test]
fn test_plain_jpeg_has_no_exif() {
    let jpeg = create_test_jpeg(32, 32, 80);
    let data = decode(&jpeg);
    assert_eq!(data.tag_count(), 0);
    assert_eq!(data.ifds().count(), 0);
    assert!(!data.has_compressed_thumbnail());
}

#[test]
fn test_require_exif() {
    let jpeg = create_test_jpeg(32, 32, 80);
    let result = ExifReader::new().require_exif(true).read(&jpeg[..]);
    assert!(matches!(
        result,
        Err(ExifError::Format(FormatError::MissingExif))
    ));
}

#[test]
fn test_not_a_jpeg() {
    let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let result = ExifReader::new().read(&png_magic[..]);
    assert!(matches!(
        result,
        Err(ExifError::Format(FormatError::MissingSoi(0x8950)))
    ));
}

// =============================================================================
// ExifInterface
// =============================================================================

#[test]
fn test_interface_orientation_from_file() {
    let expectations = [
        (1, 0, false, false, false),
        (3, 180, false, false, false),
        (6, 90, false, false, true),
        (7, 270, true, false, true),
    ];
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        for (code, rotation, flip_h, flip_v, swap) in expectations {
            let (jpeg, _) = camera_jpeg(order, code);
            let mut exif = ExifInterface::new();
            exif.read_exif_bytes(jpeg).unwrap();

            assert_eq!(exif.tag_int_value(TAG_ORIENTATION), Some(i32::from(code)));
            let params = exif.orientation().unwrap();
            assert_eq!(params.rotation, rotation, "orientation {}", code);
            assert_eq!(params.flip_horizontal, flip_h, "orientation {}", code);
            assert_eq!(params.flip_vertical, flip_v, "orientation {}", code);
            assert_eq!(params.invert_dimensions, swap, "orientation {}", code);
        }
    }
}

#[test]
fn test_interface_read_replaces_data() {
    let mut exif = ExifInterface::new();
    let (first, _) = camera_jpeg(ByteOrderType::LittleEndian, 6);
    exif.read_exif(&first[..]).unwrap();
    assert_eq!(exif.tag_int_value(TAG_ORIENTATION), Some(6));

    let second = ExifInterface::new();
    assert!(second.orientation().is_none());

    exif.read_exif(&create_test_jpeg(8, 8, 80)[..]).unwrap();
    assert!(exif.orientation().is_none());
    assert_eq!(exif.data().tag_count(), 0);
}
