//! High-level access to EXIF metadata.
//!
//! This module provides [`ExifInterface`], which owns a decoded store and
//! answers catalog-aware queries such as the display orientation.

use std::io::Read;

use bytes::{Buf, Bytes};
use tracing::debug;

use super::data::ExifData;
use super::orientation::{orientation_params, OrientationParams};
use super::reader::ExifReader;
use crate::error::ExifError;
use crate::format::tiff::{
    tag_info, ExifTag, IfdId, TagDefinition, SIZE_UNDEFINED, TAG_ORIENTATION,
};

/// Entry point for reading EXIF metadata and querying well-known tags.
///
/// Holds the result of the last successful decode. A failed decode leaves
/// the previous content untouched.
#[derive(Debug, Clone, Default)]
pub struct ExifInterface {
    data: ExifData,
}

impl ExifInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every directory and the thumbnail from a JPEG stream,
    /// replacing the current content.
    pub fn read_exif<R: Read>(&mut self, reader: R) -> Result<(), ExifError> {
        let data = ExifReader::new().read(reader)?;
        debug!(tags = data.tag_count(), "Decoded EXIF data");
        self.data = data;
        Ok(())
    }

    /// Decode from an in-memory JPEG.
    pub fn read_exif_bytes(&mut self, bytes: impl Into<Bytes>) -> Result<(), ExifError> {
        self.read_exif(bytes.into().reader())
    }

    pub fn data(&self) -> &ExifData {
        &self.data
    }

    /// Look up a catalogued tag in its default directory.
    pub fn tag(&self, definition: TagDefinition) -> Option<&ExifTag> {
        let ifd = definition.default_ifd()?;
        tag_info(definition)?;
        self.data.tag(definition.tag_id(), ifd)
    }

    /// Look up any tag id in a specific directory.
    pub fn tag_in(&self, tag_id: u16, ifd: IfdId) -> Option<&ExifTag> {
        self.data.tag(tag_id, ifd)
    }

    /// First component of a catalogued integer tag.
    pub fn tag_int_value(&self, definition: TagDefinition) -> Option<i32> {
        let value = self.tag(definition)?.value_at(0).ok()?;
        i32::try_from(value).ok()
    }

    /// Store a tag, returning the one it replaced.
    pub fn set_tag(&mut self, tag: ExifTag) -> Option<ExifTag> {
        self.data.add_tag(tag)
    }

    pub fn clear_exif(&mut self) {
        self.data = ExifData::default();
    }

    /// An empty tag with the catalogued type and count, placed in the
    /// definition's default directory.
    pub fn build_tag(&self, definition: TagDefinition) -> Option<ExifTag> {
        let info = tag_info(definition)?;
        let ifd = definition.default_ifd()?;
        let data_type = info.data_type()?;
        let count = info.default_count();
        Some(ExifTag::new(
            definition.tag_id(),
            data_type,
            count,
            ifd,
            count != SIZE_UNDEFINED,
        ))
    }

    /// Display transform derived from the Orientation tag.
    pub fn orientation(&self) -> Option<OrientationParams> {
        self.tag_int_value(TAG_ORIENTATION).map(orientation_params)
    }
}
