//! Serializable snapshot of decoded EXIF data.
//!
//! [`ExifReport`] flattens an [`ExifData`] store into plain values for the
//! command line: JSON through `serde_json`, or an aligned text listing.
//!
//! # Example JSON
//!
//! ```text
//! {
//!   "byte_order": "II",
//!   "directories": [
//!     { "ifd": "IFD0", "tags": [
//!       { "id": "0x0112", "name": "Orientation", "type": "UNSIGNED_SHORT", "count": 1, "value": [6] }
//!     ] }
//!   ],
//!   "thumbnail_size": 1024,
//!   "strip_count": 0,
//!   "orientation": { "rotation": 90, ... }
//! }
//! ```

use std::fmt::Write;

use serde::Serialize;

use crate::format::tiff::{
    tag_name, ExifTag, FieldType, IfdData, IfdId, TagValue, TAG_ORIENTATION,
};
use crate::metadata::{orientation_params, ExifData, OrientationParams};

// =============================================================================
// Report Types
// =============================================================================

/// Whole-file report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExifReport {
    /// "II" or "MM"
    pub byte_order: &'static str,

    /// Present directories in id order
    pub directories: Vec<DirectoryReport>,

    /// Size of the compressed thumbnail in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_size: Option<usize>,

    /// Number of uncompressed strip slots
    pub strip_count: usize,

    /// Transform derived from the IFD0 orientation tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<OrientationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryReport {
    pub ifd: &'static str,
    pub tags: Vec<TagReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagReport {
    /// Tag id as "0x0112"
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,

    #[serde(rename = "type")]
    pub data_type: &'static str,

    pub count: u32,

    /// `None` for values that were never resolved
    pub value: Option<ReportValue>,
}

/// A tag value rendered for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    /// ASCII text, or hex for opaque bytes
    Text(String),
    Integers(Vec<i64>),
    /// Rationals as "n/d"
    Rationals(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientationReport {
    pub code: i64,
    #[serde(flatten)]
    pub params: OrientationParams,
}

// =============================================================================
// Construction
// =============================================================================

impl ExifReport {
    pub fn from_data(data: &ExifData) -> Self {
        let directories = data
            .ifds()
            .map(|ifd| DirectoryReport {
                ifd: ifd.id().name(),
                tags: directory_tags(ifd),
            })
            .collect();

        let orientation = data
            .tag(TAG_ORIENTATION.tag_id(), IfdId::Ifd0)
            .and_then(|tag| tag.value_at(0).ok())
            .map(|code| OrientationReport {
                code,
                params: orientation_params(i32::try_from(code).unwrap_or(0)),
            });

        Self {
            byte_order: data.byte_order().mark(),
            directories,
            thumbnail_size: data.compressed_thumbnail().map(|t| t.len()),
            strip_count: data.strip_count(),
            orientation,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable listing, one tag per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Byte order: {}", self.byte_order);
        for dir in &self.directories {
            let _ = writeln!(out, "[{}] {} tag(s)", dir.ifd, dir.tags.len());
            for tag in &dir.tags {
                let _ = writeln!(
                    out,
                    "  {} {:<28} {:<9} {:>5}  {}",
                    tag.id,
                    tag.name.unwrap_or("-"),
                    tag.data_type,
                    tag.count,
                    render_value(tag.value.as_ref()),
                );
            }
        }
        match self.thumbnail_size {
            Some(size) => {
                let _ = writeln!(out, "Thumbnail: {} bytes", size);
            }
            None => {
                let _ = writeln!(out, "Thumbnail: none");
            }
        }
        if self.strip_count > 0 {
            let _ = writeln!(out, "Strips: {}", self.strip_count);
        }
        if let Some(orientation) = &self.orientation {
            let _ = writeln!(
                out,
                "Orientation: {} (rotate {}, flip h={} v={}, swap dimensions={})",
                orientation.code,
                orientation.params.rotation,
                orientation.params.flip_horizontal,
                orientation.params.flip_vertical,
                orientation.params.invert_dimensions,
            );
        }
        out
    }
}

fn directory_tags(ifd: &IfdData) -> Vec<TagReport> {
    ifd.tags().into_iter().map(tag_report).collect()
}

fn tag_report(tag: &ExifTag) -> TagReport {
    let value = tag.value().map(|value| match value {
        TagValue::Bytes(_) if tag.data_type() == FieldType::Ascii => {
            ReportValue::Text(tag.value_as_string().unwrap_or_default())
        }
        TagValue::Bytes(bytes) => ReportValue::Text(hex::encode(bytes)),
        TagValue::Integers(values) => ReportValue::Integers(values.clone()),
        TagValue::Rationals(values) => {
            ReportValue::Rationals(values.iter().map(|r| r.to_string()).collect())
        }
    });

    TagReport {
        id: format!("{:#06x}", tag.tag_id()),
        name: tag_name(tag.tag_id()),
        data_type: tag.data_type().name(),
        count: tag.component_count(),
        value,
    }
}

fn render_value(value: Option<&ReportValue>) -> String {
    match value {
        None => String::from("<unresolved>"),
        Some(ReportValue::Text(text)) => text.clone(),
        Some(ReportValue::Integers(values)) => values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        Some(ReportValue::Rationals(values)) => values.join(" "),
    }
}

// =============================================================================
// Tests
// =============================================================================
