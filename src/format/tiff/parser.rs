//! Event-driven EXIF directory parser.
//!
//! The parser walks the TIFF structure inside an EXIF APP1 segment in a
//! single forward pass. It never seeks backwards: every structure that lives
//! further ahead in the stream (sub-directories, out-of-line values,
//! thumbnail data) is recorded as a pending event keyed by its offset, and
//! pending events are served in ascending offset order once the current
//! directory's entries have been read.
//!
//! # TIFF Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Magic (42 = 0x002A)
//! Bytes 4-7: Offset to IFD0
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! 2 bytes      entry count N
//! N * 12 bytes entries: tag (2), type (2), count (4), value or offset (4)
//! 4 bytes      offset of the next directory (only meaningful after IFD0)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut parser = ExifParser::parse(reader, ParseOptions::all())?;
//! loop {
//!     match parser.next()? {
//!         Event::NewTag => { /* parser.tag() */ }
//!         Event::End => break,
//!         _ => {}
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::io::Read;

use tracing::{debug, warn};

use super::entry::{ExifTag, Rational};
use super::tags::{
    is_ifd_allowed, tag_info, FieldType, IfdId, TagDefinition, INLINE_VALUE_SIZE,
    SIZE_UNDEFINED, TAG_EXIF_IFD, TAG_GPS_IFD, TAG_INTEROPERABILITY_IFD,
    TAG_JPEG_INTERCHANGE_FORMAT, TAG_JPEG_INTERCHANGE_FORMAT_LENGTH, TAG_STRIP_BYTE_COUNTS,
    TAG_STRIP_OFFSETS,
};
use crate::error::{ExifError, FormatError};
use crate::format::jpeg::seek_tiff_data;
use crate::io::{ByteOrder, Charset, CountingReader};

// =============================================================================
// Constants
// =============================================================================

/// TIFF magic number
const TIFF_MAGIC: u16 = 0x002A;

/// Offset of IFD0 when it directly follows the header
pub const DEFAULT_IFD0_OFFSET: u64 = 8;

/// Size of one directory entry
pub const TAG_SIZE: u64 = 12;

/// Size of the entry count at the start of a directory
pub const OFFSET_SIZE: u64 = 2;

/// Size of the next-directory link
const LINK_SIZE: u64 = 4;

/// Largest count or offset accepted from the stream
const MAX_ADDRESSABLE: u64 = i32::MAX as u64;

// =============================================================================
// Options
// =============================================================================

/// Which directories and thumbnail data the parser should visit.
///
/// Directories that are not requested are still traversed when they link to
/// a requested one, but produce no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub ifd0: bool,
    pub ifd1: bool,
    pub exif: bool,
    pub gps: bool,
    pub interoperability: bool,
    pub thumbnail: bool,
}

impl ParseOptions {
    /// Every directory and the thumbnail.
    pub const fn all() -> Self {
        Self {
            ifd0: true,
            ifd1: true,
            exif: true,
            gps: true,
            interoperability: true,
            thumbnail: true,
        }
    }

    /// Nothing at all.
    pub const fn none() -> Self {
        Self {
            ifd0: false,
            ifd1: false,
            exif: false,
            gps: false,
            interoperability: false,
            thumbnail: false,
        }
    }

    pub fn with_ifd(mut self, ifd: IfdId) -> Self {
        match ifd {
            IfdId::Ifd0 => self.ifd0 = true,
            IfdId::Ifd1 => self.ifd1 = true,
            IfdId::Exif => self.exif = true,
            IfdId::Gps => self.gps = true,
            IfdId::Interoperability => self.interoperability = true,
        }
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: bool) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn is_ifd_requested(&self, ifd: IfdId) -> bool {
        match ifd {
            IfdId::Ifd0 => self.ifd0,
            IfdId::Ifd1 => self.ifd1,
            IfdId::Exif => self.exif,
            IfdId::Gps => self.gps,
            IfdId::Interoperability => self.interoperability,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// Events
// =============================================================================

/// What [`ExifParser::next`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Entered a requested directory
    StartOfIfd(IfdId),
    /// Read a directory entry; see [`ExifParser::tag`]
    NewTag,
    /// Reached the value of a tag registered with
    /// [`ExifParser::register_for_tag_value`]
    ValueOfRegisteredTag,
    /// Reached the compressed thumbnail
    CompressedImage,
    /// Reached an uncompressed thumbnail strip
    UncompressedStrip(usize),
    /// Nothing left to read
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageEvent {
    Compressed,
    Strip(usize),
}

#[derive(Debug, Clone)]
enum PendingEvent {
    Ifd { ifd: IfdId, requested: bool },
    TagValue { tag: ExifTag, requested: bool },
    Image(ImageEvent),
}

// =============================================================================
// ExifParser
// =============================================================================

/// Forward-only EXIF parser over a JPEG stream.
pub struct ExifParser<R> {
    reader: CountingReader<R>,
    options: ParseOptions,
    contains_exif: bool,
    finished: bool,

    /// Bound on where directories may end, relative to the TIFF header
    app1_end: u64,

    ifd_type: IfdId,
    ifd_start_offset: u64,
    tags_in_ifd: u64,
    parse_offsets_in_current_ifd: bool,

    tag: Option<ExifTag>,
    image_event: Option<ImageEvent>,
    strip_size_tag: Option<ExifTag>,
    jpeg_size_tag: Option<ExifTag>,

    ifd0_position: u64,
    /// Bytes between the TIFF header and IFD0 when IFD0 is not adjacent
    data_above_ifd0: Option<Vec<u8>>,

    pending: BTreeMap<u64, PendingEvent>,
}

impl<R: Read> ExifParser<R> {
    /// Locate the EXIF segment in a JPEG stream and read the TIFF header.
    ///
    /// A stream without an EXIF segment is not an error: the parser then
    /// reports [`Event::End`] immediately.
    ///
    /// # Errors
    /// - `MissingSoi` if the stream is not a JPEG
    /// - `InvalidByteOrder` / `InvalidMagic` for a malformed TIFF header
    /// - `InvalidIfdOffset` if IFD0 cannot be addressed
    /// - `UnexpectedEof` if the header is truncated
    pub fn parse(mut reader: R, options: ParseOptions) -> Result<Self, ExifError> {
        let app1_end = {
            let mut jpeg = CountingReader::new(&mut reader);
            seek_tiff_data(&mut jpeg)?
        };

        let mut parser = Self {
            reader: CountingReader::new(reader),
            options,
            contains_exif: app1_end.is_some(),
            finished: false,
            app1_end: app1_end.unwrap_or(0),
            ifd_type: IfdId::Ifd0,
            ifd_start_offset: 0,
            tags_in_ifd: 0,
            parse_offsets_in_current_ifd: false,
            tag: None,
            image_event: None,
            strip_size_tag: None,
            jpeg_size_tag: None,
            ifd0_position: 0,
            data_above_ifd0: None,
            pending: BTreeMap::new(),
        };

        if parser.contains_exif {
            parser.read_tiff_header()?;
        }
        Ok(parser)
    }

    /// Parse every directory and the thumbnail.
    pub fn parse_all(reader: R) -> Result<Self, ExifError> {
        Self::parse(reader, ParseOptions::all())
    }

    fn read_tiff_header(&mut self) -> Result<(), ExifError> {
        let order_mark = self.reader.read_u16()?;
        let order = ByteOrder::from_mark(order_mark)
            .ok_or(FormatError::InvalidByteOrder(order_mark))?;
        self.reader.set_byte_order(order);

        let magic = self.reader.read_u16()?;
        if magic != TIFF_MAGIC {
            return Err(FormatError::InvalidMagic(magic).into());
        }

        let offset = u64::from(self.reader.read_u32()?);
        if !(DEFAULT_IFD0_OFFSET..=MAX_ADDRESSABLE).contains(&offset) {
            return Err(FormatError::InvalidIfdOffset(offset).into());
        }

        self.ifd0_position = offset;
        self.ifd_type = IfdId::Ifd0;
        if self.is_ifd_requested(IfdId::Ifd0) || self.need_to_parse_offsets_in_current_ifd() {
            self.register_ifd(IfdId::Ifd0, offset);
            if offset != DEFAULT_IFD0_OFFSET {
                let gap = self.reader.read_to_vec(offset - DEFAULT_IFD0_OFFSET)?;
                self.data_above_ifd0 = Some(gap);
            }
        }
        debug!(byte_order = ?order, ifd0 = offset, "TIFF header parsed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Event Loop
    // -------------------------------------------------------------------------

    /// Advance to the next event.
    ///
    /// Once [`Event::End`] has been returned every later call returns it
    /// again.
    ///
    /// # Errors
    /// Truncation while reading a directory entry and addressing violations
    /// (`ComponentCountTooLarge`, `OffsetTooLarge`) are fatal. Everything
    /// else that looks malformed is logged and skipped.
    pub fn next(&mut self) -> Result<Event, ExifError> {
        if !self.contains_exif || self.finished {
            return Ok(Event::End);
        }
        let event = self.next_event()?;
        if event == Event::End {
            self.finished = true;
        }
        Ok(event)
    }

    fn next_event(&mut self) -> Result<Event, ExifError> {
        loop {
            let offset = self.reader.byte_count();
            let end_of_tags = self.end_of_tags();
            if offset < end_of_tags {
                let Some(tag) = self.read_tag()? else {
                    continue;
                };
                if self.parse_offsets_in_current_ifd {
                    self.check_offset_or_image_tag(&tag);
                }
                self.tag = Some(tag);
                return Ok(Event::NewTag);
            }
            if offset == end_of_tags {
                self.read_next_ifd_link()?;
            }
            break;
        }

        while let Some((offset, event)) = self.pending.pop_first() {
            if let Err(e) = self.skip_to(offset) {
                warn!(
                    offset,
                    error = %e,
                    "Failed to skip to data; the file may be broken"
                );
                continue;
            }

            match event {
                PendingEvent::Ifd { ifd, requested } => {
                    self.ifd_type = ifd;
                    self.tags_in_ifd = u64::from(self.reader.read_u16()?);
                    self.ifd_start_offset = offset;

                    if self.tags_in_ifd * TAG_SIZE + self.ifd_start_offset + OFFSET_SIZE
                        > self.app1_end
                    {
                        warn!(
                            ifd = ifd.name(),
                            entries = self.tags_in_ifd,
                            offset,
                            "Invalid size of IFD"
                        );
                        return Ok(Event::End);
                    }

                    self.parse_offsets_in_current_ifd =
                        self.need_to_parse_offsets_in_current_ifd();
                    if requested {
                        debug!(ifd = ifd.name(), entries = self.tags_in_ifd, "Entering IFD");
                        return Ok(Event::StartOfIfd(ifd));
                    }
                    self.skip_remaining_tags_in_current_ifd()?;
                }
                PendingEvent::Image(image) => {
                    self.image_event = Some(image);
                    return Ok(match image {
                        ImageEvent::Compressed => Event::CompressedImage,
                        ImageEvent::Strip(index) => Event::UncompressedStrip(index),
                    });
                }
                PendingEvent::TagValue { mut tag, requested } => {
                    if tag.data_type() != FieldType::Undefined {
                        self.read_full_tag_value(&mut tag)?;
                        self.check_offset_or_image_tag(&tag);
                    }
                    if requested {
                        self.tag = Some(tag);
                        return Ok(Event::ValueOfRegisteredTag);
                    }
                }
            }
        }
        Ok(Event::End)
    }

    #[inline]
    fn end_of_tags(&self) -> u64 {
        self.ifd_start_offset + OFFSET_SIZE + TAG_SIZE * self.tags_in_ifd
    }

    /// Handle the 4-byte link that follows the last entry of a directory.
    ///
    /// Only IFD0 links anywhere meaningful (to IFD1). Other directories are
    /// expected to carry a zero link; when a pending structure starts less
    /// than four bytes later there is no room for a link at all.
    fn read_next_ifd_link(&mut self) -> Result<(), ExifError> {
        if self.ifd_type == IfdId::Ifd0 {
            let link = u64::from(self.reader.read_u32()?);
            if self.wants_ifd1() && link != 0 {
                self.register_ifd(IfdId::Ifd1, link);
            }
            return Ok(());
        }

        let position = self.reader.byte_count();
        let room = match self.pending.first_key_value() {
            Some((&next, _)) => next as i64 - position as i64,
            None => LINK_SIZE as i64,
        };
        if room < LINK_SIZE as i64 {
            warn!(
                ifd = self.ifd_type.name(),
                room, "Invalid size of link to next IFD"
            );
        } else {
            let link = self.reader.read_u32()?;
            if link != 0 {
                warn!(ifd = self.ifd_type.name(), link, "Invalid link to next IFD");
            }
        }
        Ok(())
    }

    /// Consume the rest of a directory that produces no events, still
    /// following any pointers it contains.
    fn skip_remaining_tags_in_current_ifd(&mut self) -> Result<(), ExifError> {
        let end_of_tags = self.end_of_tags();
        let mut offset = self.reader.byte_count();
        if offset > end_of_tags {
            return Ok(());
        }

        if self.parse_offsets_in_current_ifd {
            while offset < end_of_tags {
                if let Some(tag) = self.read_tag()? {
                    self.check_offset_or_image_tag(&tag);
                }
                offset += TAG_SIZE;
            }
        } else {
            self.skip_to(end_of_tags)?;
        }

        let link = u64::from(self.reader.read_u32()?);
        if self.ifd_type == IfdId::Ifd0 && self.wants_ifd1() && link > 0 {
            self.register_ifd(IfdId::Ifd1, link);
        }
        Ok(())
    }

    /// Advance to `offset` and drop pending events that now lie behind.
    fn skip_to(&mut self, offset: u64) -> Result<(), ExifError> {
        let position = self.reader.byte_count();
        if offset < position {
            return Err(ExifError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("offset {} is behind the current position {}", offset, position),
            )));
        }
        self.reader.skip_to(offset)?;
        while let Some((&next, _)) = self.pending.first_key_value() {
            if next >= offset {
                break;
            }
            self.pending.pop_first();
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Entries
    // -------------------------------------------------------------------------

    /// Read one 12-byte directory entry.
    ///
    /// Returns `None` (after consuming the entry) when the data type is not
    /// part of the EXIF value model.
    fn read_tag(&mut self) -> Result<Option<ExifTag>, ExifError> {
        let tag_id = self.reader.read_u16()?;
        let raw_type = self.reader.read_u16()?;
        let count = u64::from(self.reader.read_u32()?);
        if count > MAX_ADDRESSABLE {
            return Err(FormatError::ComponentCountTooLarge { tag: tag_id, count }.into());
        }

        let Some(data_type) = FieldType::from_u16(raw_type) else {
            warn!(
                tag = format_args!("{:04x}", tag_id),
                data_type = raw_type,
                "Invalid data type; dropping entry"
            );
            self.reader.skip_exact(INLINE_VALUE_SIZE)?;
            return Ok(None);
        };

        let mut tag = ExifTag::new(
            tag_id,
            data_type,
            count as u32,
            self.ifd_type,
            count as u32 != SIZE_UNDEFINED,
        );

        if tag.data_size() > INLINE_VALUE_SIZE {
            let offset = u64::from(self.reader.read_u32()?);
            if offset > MAX_ADDRESSABLE {
                return Err(FormatError::OffsetTooLarge {
                    tag: tag_id,
                    offset,
                }
                .into());
            }
            // Values stored before IFD0 were buffered with the header gap
            if offset < self.ifd0_position && data_type == FieldType::Undefined {
                self.fill_from_data_above_ifd0(&mut tag, offset);
            } else {
                tag.set_offset(offset);
            }
        } else {
            let value_start = self.reader.byte_count();
            let defined_count = tag.has_defined_count();
            // Fixed-length inline strings are often not terminated
            tag.set_has_defined_count(false);
            self.read_full_tag_value(&mut tag)?;
            tag.set_has_defined_count(defined_count);
            self.reader.skip_to(value_start + INLINE_VALUE_SIZE)?;
            tag.set_offset(value_start);
        }
        Ok(Some(tag))
    }

    fn fill_from_data_above_ifd0(&self, tag: &mut ExifTag, offset: u64) {
        let start = (offset as usize).wrapping_sub(DEFAULT_IFD0_OFFSET as usize);
        let end = start.saturating_add(tag.component_count() as usize);
        let slice = self
            .data_above_ifd0
            .as_deref()
            .filter(|_| offset >= DEFAULT_IFD0_OFFSET)
            .and_then(|data| data.get(start..end));

        match slice {
            Some(bytes) => {
                if let Err(e) = tag.set_bytes(bytes) {
                    warn!(tag = format_args!("{:04x}", tag.tag_id()), error = %e, "Rejected value");
                }
            }
            None => {
                warn!(
                    tag = format_args!("{:04x}", tag.tag_id()),
                    offset, "Value before IFD0 is out of range"
                );
                tag.set_offset(offset);
            }
        }
    }

    /// Follow pointer tags and remember thumbnail locations.
    fn check_offset_or_image_tag(&mut self, tag: &ExifTag) {
        if tag.component_count() == 0 {
            return;
        }
        let tid = tag.tag_id();
        let ifd = tag.ifd();

        if tid == TAG_EXIF_IFD.tag_id() && check_allowed(ifd, TAG_EXIF_IFD) {
            if self.is_ifd_requested(IfdId::Exif) || self.is_ifd_requested(IfdId::Interoperability)
            {
                if let Some(offset) = pointer_value(tag, 0) {
                    self.register_ifd(IfdId::Exif, offset);
                }
            }
        } else if tid == TAG_GPS_IFD.tag_id() && check_allowed(ifd, TAG_GPS_IFD) {
            if self.is_ifd_requested(IfdId::Gps) {
                if let Some(offset) = pointer_value(tag, 0) {
                    self.register_ifd(IfdId::Gps, offset);
                }
            }
        } else if tid == TAG_INTEROPERABILITY_IFD.tag_id()
            && check_allowed(ifd, TAG_INTEROPERABILITY_IFD)
        {
            if self.is_ifd_requested(IfdId::Interoperability) {
                if let Some(offset) = pointer_value(tag, 0) {
                    self.register_ifd(IfdId::Interoperability, offset);
                }
            }
        } else if tid == TAG_JPEG_INTERCHANGE_FORMAT.tag_id()
            && check_allowed(ifd, TAG_JPEG_INTERCHANGE_FORMAT)
        {
            if self.options.thumbnail {
                if let Some(offset) = pointer_value(tag, 0) {
                    self.register_image(ImageEvent::Compressed, offset);
                }
            }
        } else if tid == TAG_JPEG_INTERCHANGE_FORMAT_LENGTH.tag_id()
            && check_allowed(ifd, TAG_JPEG_INTERCHANGE_FORMAT_LENGTH)
        {
            if self.options.thumbnail {
                self.jpeg_size_tag = Some(tag.clone());
            }
        } else if tid == TAG_STRIP_OFFSETS.tag_id() && check_allowed(ifd, TAG_STRIP_OFFSETS) {
            if self.options.thumbnail {
                if tag.has_value() {
                    for index in 0..tag.component_count() as usize {
                        if let Some(offset) = pointer_value(tag, index) {
                            self.register_image(ImageEvent::Strip(index), offset);
                        }
                    }
                } else {
                    self.pending.insert(
                        tag.offset(),
                        PendingEvent::TagValue {
                            tag: tag.clone(),
                            requested: false,
                        },
                    );
                }
            }
        } else if tid == TAG_STRIP_BYTE_COUNTS.tag_id()
            && check_allowed(ifd, TAG_STRIP_BYTE_COUNTS)
            && self.options.thumbnail
            && tag.has_value()
        {
            self.strip_size_tag = Some(tag.clone());
        }
    }

    /// Read a tag's value at the current position.
    ///
    /// BYTE, ASCII and UNDEFINED values that would run into the next pending
    /// structure are truncated at it. A thumbnail that starts inside such a
    /// value is dropped instead, since directory data takes precedence.
    pub fn read_full_tag_value(&mut self, tag: &mut ExifTag) -> Result<(), ExifError> {
        let data_type = tag.data_type();
        if matches!(
            data_type,
            FieldType::Ascii | FieldType::Undefined | FieldType::Byte
        ) {
            let position = self.reader.byte_count();
            let size = u64::from(tag.component_count());
            let overlap = self
                .pending
                .range(position..)
                .next()
                .map(|(&next, event)| (next, matches!(event, PendingEvent::Image(_))));
            if let Some((next, is_image)) = overlap {
                if next < position + size {
                    if is_image {
                        warn!(
                            tag = format_args!("{:04x}", tag.tag_id()),
                            thumbnail = next,
                            "Thumbnail overlaps value; dropping thumbnail"
                        );
                        self.pending.remove(&next);
                    } else {
                        let truncated = next.saturating_sub(position);
                        warn!(
                            tag = format_args!("{:04x}", tag.tag_id()),
                            size,
                            truncated,
                            "Value overlaps other structure; truncating"
                        );
                        tag.force_set_component_count(truncated as u32);
                    }
                }
            }
        }

        let count = tag.component_count() as usize;
        let result = match data_type {
            FieldType::Byte | FieldType::Undefined => {
                let buf = self.reader.read_vec_exact(count as u64)?;
                tag.set_bytes(&buf)
            }
            FieldType::Ascii => {
                let value = self.reader.read_string(count, Charset::UsAscii)?;
                tag.set_string(&value)
            }
            FieldType::Long => {
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    values.push(i64::from(self.reader.read_u32()?));
                }
                tag.set_longs(&values)
            }
            FieldType::Rational => {
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let numerator = i64::from(self.reader.read_u32()?);
                    let denominator = i64::from(self.reader.read_u32()?);
                    values.push(Rational::new(numerator, denominator));
                }
                tag.set_rationals(&values)
            }
            FieldType::Short => {
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    values.push(i32::from(self.reader.read_u16()?));
                }
                tag.set_ints(&values)
            }
            FieldType::SLong => {
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    values.push(self.reader.read_i32()?);
                }
                tag.set_ints(&values)
            }
            FieldType::SRational => {
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let numerator = i64::from(self.reader.read_i32()?);
                    let denominator = i64::from(self.reader.read_i32()?);
                    values.push(Rational::new(numerator, denominator));
                }
                tag.set_rationals(&values)
            }
        };
        if let Err(e) = result {
            warn!(tag = format_args!("{:04x}", tag.tag_id()), error = %e, "Rejected value");
        }
        debug!(tag = format_args!("{:04x}", tag.tag_id()), value = %tag.value_display(), "Read value");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Ask for [`Event::ValueOfRegisteredTag`] when the stream reaches the
    /// tag's value.
    ///
    /// Returns `false` (and drops the tag) if the value lies behind the
    /// current position.
    pub fn register_for_tag_value(&mut self, tag: ExifTag) -> bool {
        if tag.offset() < self.reader.byte_count() {
            debug!(
                tag = format_args!("{:04x}", tag.tag_id()),
                offset = tag.offset(),
                "Value already passed; not registering"
            );
            return false;
        }
        self.pending.insert(
            tag.offset(),
            PendingEvent::TagValue {
                tag,
                requested: true,
            },
        );
        true
    }

    fn register_ifd(&mut self, ifd: IfdId, offset: u64) {
        let requested = self.is_ifd_requested(ifd);
        self.pending
            .insert(offset, PendingEvent::Ifd { ifd, requested });
    }

    fn register_image(&mut self, image: ImageEvent, offset: u64) {
        self.pending.insert(offset, PendingEvent::Image(image));
    }

    fn is_ifd_requested(&self, ifd: IfdId) -> bool {
        self.options.is_ifd_requested(ifd)
    }

    fn wants_ifd1(&self) -> bool {
        self.is_ifd_requested(IfdId::Ifd1) || self.options.thumbnail
    }

    fn need_to_parse_offsets_in_current_ifd(&self) -> bool {
        match self.ifd_type {
            IfdId::Ifd0 => {
                self.is_ifd_requested(IfdId::Exif)
                    || self.is_ifd_requested(IfdId::Gps)
                    || self.is_ifd_requested(IfdId::Interoperability)
                    || self.wants_ifd1()
            }
            IfdId::Ifd1 => self.options.thumbnail,
            IfdId::Exif => self.is_ifd_requested(IfdId::Interoperability),
            IfdId::Gps | IfdId::Interoperability => false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The tag of the last `NewTag` or `ValueOfRegisteredTag` event.
    pub fn tag(&self) -> Option<&ExifTag> {
        self.tag.as_ref()
    }

    /// Move the current tag out of the parser.
    pub fn take_tag(&mut self) -> Option<ExifTag> {
        self.tag.take()
    }

    /// Directory currently being read.
    pub fn current_ifd(&self) -> IfdId {
        self.ifd_type
    }

    /// Strip index of the last `UncompressedStrip` event.
    pub fn strip_index(&self) -> Option<usize> {
        match self.image_event {
            Some(ImageEvent::Strip(index)) => Some(index),
            _ => None,
        }
    }

    /// Byte count of the current strip, or 0 if unknown.
    pub fn strip_size(&self) -> u64 {
        let (Some(tag), Some(index)) = (self.strip_size_tag.as_ref(), self.strip_index()) else {
            return 0;
        };
        tag.value_at(index)
            .or_else(|_| tag.value_at(0))
            .map(|size| size.max(0) as u64)
            .unwrap_or(0)
    }

    /// Byte count of the compressed thumbnail, or 0 if unknown.
    pub fn compressed_image_size(&self) -> u64 {
        self.jpeg_size_tag
            .as_ref()
            .and_then(|tag| tag.value_at(0).ok())
            .map(|size| size.max(0) as u64)
            .unwrap_or(0)
    }

    /// Byte order declared by the TIFF header.
    pub fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order()
    }

    /// Whether the stream has an EXIF segment.
    pub fn contains_exif_data(&self) -> bool {
        self.contains_exif
    }

    /// Bytes consumed since the TIFF header.
    pub fn position(&self) -> u64 {
        self.reader.byte_count()
    }

    /// Read up to `len` bytes at the current position.
    pub fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>, ExifError> {
        self.reader.read_to_vec(len)
    }

    /// Read a string of `len` bytes at the current position.
    pub fn read_string(&mut self, len: usize, charset: Charset) -> Result<String, ExifError> {
        self.reader.read_string(len, charset)
    }
}

fn check_allowed(ifd: IfdId, definition: TagDefinition) -> bool {
    tag_info(definition).is_some_and(|info| is_ifd_allowed(info, ifd))
}

/// Component `index` of a pointer tag as a stream offset.
fn pointer_value(tag: &ExifTag, index: usize) -> Option<u64> {
    match tag.value_at(index) {
        Ok(value) if value >= 0 => Some(value as u64),
        Ok(value) => {
            warn!(tag = format_args!("{:04x}", tag.tag_id()), value, "Negative offset");
            None
        }
        Err(e) => {
            warn!(
                tag = format_args!("{:04x}", tag.tag_id()),
                error = %e,
                "Unreadable offset"
            );
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
