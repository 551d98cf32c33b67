//! Report rendering over decoded files.

use exif_stream::{ExifReader, ExifReport};
use serde_json::Value;

use super::test_utils::{camera_exif, create_test_jpeg, wrap_in_jpeg, ByteOrderType, TiffWriter};

fn camera_report(order: ByteOrderType) -> ExifReport {
    let jpeg = camera_exif(order, 6)
        .with_thumbnail(vec![0xFF, 0xD8, 0xFF, 0xD9])
        .build_jpeg();
    ExifReport::from_data(&ExifReader::new().read(&jpeg[..]).unwrap())
}

fn directory<'a>(json: &'a Value, ifd: &str) -> &'a Value {
    json["directories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["ifd"] == ifd)
        .unwrap_or_else(|| panic!("missing directory {}", ifd))
}

fn tag<'a>(dir: &'a Value, id: &str) -> &'a Value {
    dir["tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == id)
        .unwrap_or_else(|| panic!("missing tag {}", id))
}

// =============================================================================
// JSON
// =============================================================================

#[test]
fn test_json_report() {
    let report = camera_report(ByteOrderType::BigEndian);
    let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["byte_order"], "MM");
    assert_eq!(json["thumbnail_size"], 4);
    assert_eq!(json["strip_count"], 0);
    assert_eq!(json["directories"].as_array().unwrap().len(), 5);

    let ifd0 = directory(&json, "IFD0");
    let orientation = tag(ifd0, "0x0112");
    assert_eq!(orientation["name"], "Orientation");
    assert_eq!(orientation["type"], "UNSIGNED_SHORT");
    assert_eq!(orientation["count"], 1);
    assert_eq!(orientation["value"], serde_json::json!([6]));

    // Uncatalogued tags carry no name
    let make = tag(ifd0, "0x010f");
    assert!(make.get("name").is_none());
    assert_eq!(make["value"], "Canon");

    let exif = directory(&json, "EXIF");
    assert_eq!(tag(exif, "0x9000")["value"], "30323331");
    assert_eq!(tag(exif, "0x9204")["type"], "RATIONAL");
    assert_eq!(tag(exif, "0x9204")["value"], serde_json::json!(["-1/3"]));

    let gps = directory(&json, "GPS");
    assert_eq!(
        tag(gps, "0x0002")["value"],
        serde_json::json!(["48/1", "51/1", "2964/100"])
    );

    assert_eq!(json["orientation"]["code"], 6);
    assert_eq!(json["orientation"]["rotation"], 90);
    assert_eq!(json["orientation"]["invert_dimensions"], true);
}

#[test]
fn test_json_report_without_exif() {
    let jpeg = create_test_jpeg(16, 16, 80);
    let report = ExifReport::from_data(&ExifReader::new().read(&jpeg[..]).unwrap());
    let json: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["directories"], serde_json::json!([]));
    assert!(json.get("thumbnail_size").is_none());
    assert!(json.get("orientation").is_none());
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn test_text_report() {
    let text = camera_report(ByteOrderType::LittleEndian).to_text();

    assert!(text.starts_with("Byte order: II\n"));
    assert!(text.contains("[IFD0] 6 tag(s)"));
    assert!(text.contains("[EXIF] 6 tag(s)"));
    assert!(text.contains("[INTEROP] 1 tag(s)"));
    assert!(text.contains("Canon EOS 5D Mark IV"));
    assert!(text.contains("48/1 51/1 2964/100"));
    assert!(text.contains("Thumbnail: 4 bytes"));
    assert!(!text.contains("Strips:"));
    assert!(text.ends_with(
        "Orientation: 6 (rotate 90, flip h=false v=false, swap dimensions=true)\n"
    ));
}

#[test]
fn test_text_report_with_strips() {
    let tiff = TiffWriter::new(ByteOrderType::LittleEndian)
        .header(8)
        .u16(1)
        .entry_short(0x0112, 2)
        .u32(26)
        .u16(2)
        .entry_inline(0x0111, 3, 2, [56, 0, 58, 0])
        .entry_inline(0x0117, 3, 2, [2, 0, 2, 0])
        .u32(0)
        .bytes(&[1, 2, 3, 4])
        .into_bytes();

    let data = ExifReader::new().read(&wrap_in_jpeg(&tiff)[..]).unwrap();
    let text = ExifReport::from_data(&data).to_text();

    assert!(text.contains("Thumbnail: none"));
    assert!(text.contains("Strips: 2"));
    assert!(text.contains("Orientation: 2 (rotate 0, flip h=true v=false, swap dimensions=false)"));
}
