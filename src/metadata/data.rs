//! Decoded EXIF store.
//!
//! [`ExifData`] holds up to five directories keyed by [`IfdId`], the byte
//! order of the source stream and any thumbnail payloads captured from IFD1.
//! Two stores compare equal when their directories and compressed thumbnail
//! match; pointer tags are ignored since their values depend on layout.

use bytes::Bytes;

use crate::format::tiff::{ExifTag, IfdData, IfdId};
use crate::io::ByteOrder;

/// Decoded EXIF content: up to five directories plus thumbnail data.
///
/// Directories are created on first insertion; a directory nobody wrote to
/// is absent rather than empty.
#[derive(Debug, Clone, Default)]
pub struct ExifData {
    byte_order: ByteOrder,
    ifds: [Option<IfdData>; IfdId::COUNT],
    thumbnail: Option<Bytes>,
    strips: Vec<Option<Bytes>>,
}

impl ExifData {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            ..Self::default()
        }
    }

    /// Byte order of the source TIFF structure.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn ifd_data(&self, ifd: IfdId) -> Option<&IfdData> {
        self.ifds[ifd.index()].as_ref()
    }

    /// Directory by raw id; absent for ids outside the five directories.
    pub fn ifd_data_by_index(&self, index: u8) -> Option<&IfdData> {
        IfdId::from_index(index).and_then(|ifd| self.ifd_data(ifd))
    }

    fn ifd_data_or_insert(&mut self, ifd: IfdId) -> &mut IfdData {
        self.ifds[ifd.index()].get_or_insert_with(|| IfdData::new(ifd))
    }

    /// Present directories in id order.
    pub fn ifds(&self) -> impl Iterator<Item = &IfdData> {
        self.ifds.iter().flatten()
    }

    pub fn tag(&self, tag_id: u16, ifd: IfdId) -> Option<&ExifTag> {
        self.ifd_data(ifd).and_then(|data| data.tag(tag_id))
    }

    /// Store a tag in the directory it names, returning the tag it replaced.
    pub fn add_tag(&mut self, tag: ExifTag) -> Option<ExifTag> {
        self.ifd_data_or_insert(tag.ifd()).set_tag(tag)
    }

    pub fn remove_tag(&mut self, tag_id: u16, ifd: IfdId) -> Option<ExifTag> {
        self.ifds[ifd.index()]
            .as_mut()
            .and_then(|data| data.remove_tag(tag_id))
    }

    /// Total number of tags across all directories.
    pub fn tag_count(&self) -> usize {
        self.ifds().map(IfdData::tag_count).sum()
    }

    // -------------------------------------------------------------------------
    // Thumbnail
    // -------------------------------------------------------------------------

    pub fn set_compressed_thumbnail(&mut self, thumbnail: impl Into<Bytes>) {
        self.thumbnail = Some(thumbnail.into());
    }

    pub fn compressed_thumbnail(&self) -> Option<&Bytes> {
        self.thumbnail.as_ref()
    }

    pub fn has_compressed_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }

    /// Store the data of uncompressed strip `index`.
    pub fn set_strip_bytes(&mut self, index: usize, strip: impl Into<Bytes>) {
        if self.strips.len() <= index {
            self.strips.resize(index + 1, None);
        }
        self.strips[index] = Some(strip.into());
    }

    pub fn strip_bytes(&self, index: usize) -> Option<&Bytes> {
        self.strips.get(index).and_then(Option::as_ref)
    }

    /// Number of strip slots (the highest stored index plus one).
    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    pub fn has_uncompressed_strip(&self) -> bool {
        !self.strips.is_empty()
    }
}

impl PartialEq for ExifData {
    /// Compares directories and the compressed thumbnail. Byte order and
    /// strips describe how the data was stored, not what it says.
    fn eq(&self, other: &Self) -> bool {
        self.ifds == other.ifds && self.thumbnail == other.thumbnail
    }
}
