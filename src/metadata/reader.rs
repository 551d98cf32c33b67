//! Event loop that turns an [`ExifParser`] into an [`ExifData`].

use std::io::Read;

use tracing::{debug, warn};

use super::data::ExifData;
use crate::error::{ExifError, FormatError};
use crate::format::tiff::{Event, ExifParser, FieldType, ParseOptions};

/// Drives an [`ExifParser`] to completion and collects the result.
///
/// # Example
///
/// ```ignore
/// let data = ExifReader::new().read(File::open("photo.jpg")?)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExifReader {
    options: ParseOptions,
    require_exif: bool,
}

impl ExifReader {
    /// Reader that visits every directory and the thumbnail.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::all())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            require_exif: false,
        }
    }

    /// Fail with `MissingExif` instead of returning empty data when the
    /// stream has no EXIF segment.
    pub fn require_exif(mut self, require: bool) -> Self {
        self.require_exif = require;
        self
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Decode a JPEG stream.
    ///
    /// # Errors
    /// Any fatal parser error. Malformed but recoverable structure is
    /// logged and skipped.
    pub fn read<R: Read>(&self, reader: R) -> Result<ExifData, ExifError> {
        let mut parser = ExifParser::parse(reader, self.options)?;
        if !parser.contains_exif_data() && self.require_exif {
            return Err(FormatError::MissingExif.into());
        }

        let mut data = ExifData::new(parser.byte_order());
        loop {
            match parser.next()? {
                Event::End => break,
                Event::StartOfIfd(ifd) => {
                    debug!(ifd = ifd.name(), "Reading directory");
                }
                Event::NewTag => {
                    let Some(tag) = parser.take_tag() else {
                        continue;
                    };
                    if tag.has_value() {
                        data.add_tag(tag);
                    } else {
                        parser.register_for_tag_value(tag);
                    }
                }
                Event::ValueOfRegisteredTag => {
                    let Some(mut tag) = parser.take_tag() else {
                        continue;
                    };
                    if tag.data_type() == FieldType::Undefined {
                        parser.read_full_tag_value(&mut tag)?;
                    }
                    data.add_tag(tag);
                }
                Event::CompressedImage => {
                    let size = parser.compressed_image_size();
                    let buf = parser.read_bytes(size)?;
                    if buf.len() as u64 == size {
                        debug!(size, "Read compressed thumbnail");
                        data.set_compressed_thumbnail(buf);
                    } else {
                        warn!(size, read = buf.len(), "Failed to read the compressed thumbnail");
                    }
                }
                Event::UncompressedStrip(index) => {
                    let size = parser.strip_size();
                    let buf = parser.read_bytes(size)?;
                    if buf.len() as u64 == size {
                        debug!(index, size, "Read uncompressed strip");
                        data.set_strip_bytes(index, buf);
                    } else {
                        warn!(
                            index,
                            size,
                            read = buf.len(),
                            "Failed to read the uncompressed strip"
                        );
                    }
                }
            }
        }
        Ok(data)
    }
}

impl Default for ExifReader {
    fn default() -> Self {
        Self::new()
    }
}
