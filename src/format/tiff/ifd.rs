//! Per-directory tag storage.

use std::collections::HashMap;

use super::entry::ExifTag;
use super::tags::{is_offset_tag, IfdId};

/// The decoded entries of one directory, keyed by tag id.
///
/// Every stored tag reports this directory as its IFD.
#[derive(Debug, Clone)]
pub struct IfdData {
    id: IfdId,
    tags: HashMap<u16, ExifTag>,
}

impl IfdData {
    pub fn new(id: IfdId) -> Self {
        Self {
            id,
            tags: HashMap::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> IfdId {
        self.id
    }

    pub fn tag(&self, tag_id: u16) -> Option<&ExifTag> {
        self.tags.get(&tag_id)
    }

    /// Insert a tag, replacing and returning any tag with the same id.
    pub fn set_tag(&mut self, mut tag: ExifTag) -> Option<ExifTag> {
        tag.set_ifd(self.id);
        self.tags.insert(tag.tag_id(), tag)
    }

    pub fn remove_tag(&mut self, tag_id: u16) -> Option<ExifTag> {
        self.tags.remove(&tag_id)
    }

    /// Whether a tag with this id is already present.
    pub fn contains(&self, tag_id: u16) -> bool {
        self.tags.contains_key(&tag_id)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags sorted by id.
    pub fn tags(&self) -> Vec<&ExifTag> {
        let mut tags: Vec<&ExifTag> = self.tags.values().collect();
        tags.sort_by_key(|t| t.tag_id());
        tags
    }
}

impl PartialEq for IfdData {
    /// Directories are equal when they share an id, a tag count and every
    /// non-offset tag. Offset tags only describe the source file layout.
    fn eq(&self, other: &Self) -> bool {
        if self.id != other.id || self.tag_count() != other.tag_count() {
            return false;
        }
        other
            .tags
            .values()
            .filter(|tag| !is_offset_tag(tag.tag_id()))
            .all(|tag| self.tag(tag.tag_id()) == Some(tag))
    }
}
