use std::io::{self, Read};

use super::ByteOrder;
use crate::error::ExifError;

// =============================================================================
// Charset
// =============================================================================

/// Character sets understood by [`CountingReader::read_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    /// 7-bit ASCII. Bytes above 0x7F decode to U+FFFD.
    UsAscii,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl Charset {
    /// Decode raw bytes into a string.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

// =============================================================================
// CountingReader
// =============================================================================

/// A forward-only reader that counts consumed bytes and decodes integers in a
/// switchable byte order.
///
/// The count starts at zero when the reader is created, so wrapping a stream
/// positioned at the TIFF header makes `byte_count()` equal to the TIFF
/// offset of the next byte.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    count: u64,
    byte_order: ByteOrder,
}

impl<R: Read> CountingReader<R> {
    /// Wrap a reader. The initial byte order is big-endian.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            count: 0,
            byte_order: ByteOrder::BigEndian,
        }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn byte_count(&self) -> u64 {
        self.count
    }

    /// Byte order used by the integer readers.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    /// Skip up to `n` bytes, returning how many were actually skipped.
    pub fn skip(&mut self, n: u64) -> Result<u64, ExifError> {
        let skipped = io::copy(&mut (&mut self.inner).take(n), &mut io::sink())?;
        self.count += skipped;
        Ok(skipped)
    }

    /// Skip exactly `n` bytes.
    ///
    /// # Errors
    /// `UnexpectedEof` if the stream ends first.
    pub fn skip_exact(&mut self, n: u64) -> Result<(), ExifError> {
        let skipped = self.skip(n)?;
        if skipped < n {
            return Err(ExifError::UnexpectedEof {
                offset: self.count,
                needed: n - skipped,
            });
        }
        Ok(())
    }

    /// Advance to an absolute position.
    ///
    /// # Panics
    /// Panics if `target` is behind the current position. Callers must only
    /// move forward.
    ///
    /// # Errors
    /// `UnexpectedEof` if the stream ends before `target`.
    pub fn skip_to(&mut self, target: u64) -> Result<(), ExifError> {
        assert!(
            target >= self.count,
            "cannot skip backwards from {} to {}",
            self.count,
            target
        );
        self.skip_exact(target - self.count)
    }

    /// Fill `buf` completely.
    ///
    /// # Errors
    /// `UnexpectedEof` if the stream ends before `buf` is full.
    pub fn read_exact_counted(&mut self, buf: &mut [u8]) -> Result<(), ExifError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ExifError::UnexpectedEof {
                        offset: self.count,
                        needed: (buf.len() - filled) as u64,
                    })
                }
                Ok(n) => {
                    filled += n;
                    self.count += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn read_u16(&mut self) -> Result<u16, ExifError> {
        let mut buf = [0u8; 2];
        self.read_exact_counted(&mut buf)?;
        Ok(self.byte_order.u16_from(buf))
    }

    pub fn read_i16(&mut self) -> Result<i16, ExifError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ExifError> {
        let mut buf = [0u8; 4];
        self.read_exact_counted(&mut buf)?;
        Ok(self.byte_order.u32_from(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, ExifError> {
        Ok(self.read_u32()? as i32)
    }

    /// Read up to `n` bytes.
    ///
    /// The buffer grows with the data actually available, so a bogus length
    /// on a short stream does not allocate `n` bytes up front.
    pub fn read_to_vec(&mut self, n: u64) -> Result<Vec<u8>, ExifError> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(n).read_to_end(&mut buf)?;
        self.count += read as u64;
        Ok(buf)
    }

    /// Read exactly `n` bytes.
    pub fn read_vec_exact(&mut self, n: u64) -> Result<Vec<u8>, ExifError> {
        let buf = self.read_to_vec(n)?;
        if (buf.len() as u64) < n {
            return Err(ExifError::UnexpectedEof {
                offset: self.count,
                needed: n - buf.len() as u64,
            });
        }
        Ok(buf)
    }

    /// Read `n` bytes and decode them with `charset`. `n == 0` yields an
    /// empty string.
    pub fn read_string(&mut self, n: usize, charset: Charset) -> Result<String, ExifError> {
        if n == 0 {
            return Ok(String::new());
        }
        let buf = self.read_vec_exact(n as u64)?;
        Ok(charset.decode(&buf))
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

// =============================================================================
// Tests
// =============================================================================
