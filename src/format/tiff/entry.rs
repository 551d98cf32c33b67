//! A single decoded directory entry.
//!
//! An [`ExifTag`] carries the entry's identity (id, type, directory) and,
//! once resolved, its value. Values that do not fit in the 4-byte inline
//! field start out unresolved with only their offset known; the parser fills
//! them in when the stream reaches that offset.
//!
//! All setters validate before touching the tag. A rejected value leaves the
//! previous value in place and reports why through [`ValueError`].

use std::fmt;

use super::tags::{FieldType, IfdId};
use crate::error::ValueError;

// =============================================================================
// Rational
// =============================================================================

/// A numerator/denominator pair.
///
/// Components are widened so that both unsigned and signed 32-bit rationals
/// fit the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Value as a float. A zero denominator yields infinity or NaN.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// =============================================================================
// TagValue
// =============================================================================

/// Storage for a resolved tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// BYTE, UNDEFINED and ASCII data. ASCII keeps its NUL terminator.
    Bytes(Vec<u8>),
    /// SHORT, LONG and SLONG data
    Integers(Vec<i64>),
    /// RATIONAL and SRATIONAL data
    Rationals(Vec<Rational>),
}

impl TagValue {
    pub fn len(&self) -> usize {
        match self {
            TagValue::Bytes(v) => v.len(),
            TagValue::Integers(v) => v.len(),
            TagValue::Rationals(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// ExifTag
// =============================================================================

/// A directory entry and its (possibly unresolved) value.
#[derive(Debug, Clone)]
pub struct ExifTag {
    tag_id: u16,
    data_type: FieldType,
    has_defined_count: bool,
    component_count: u32,
    ifd: IfdId,
    value: Option<TagValue>,
    offset: u64,
}

impl ExifTag {
    /// Create a tag without a value.
    ///
    /// When `has_defined_count` is set, every setter must supply exactly
    /// `component_count` components.
    pub fn new(
        tag_id: u16,
        data_type: FieldType,
        component_count: u32,
        ifd: IfdId,
        has_defined_count: bool,
    ) -> Self {
        Self {
            tag_id,
            data_type,
            has_defined_count,
            component_count,
            ifd,
            value: None,
            offset: 0,
        }
    }

    #[inline]
    pub fn tag_id(&self) -> u16 {
        self.tag_id
    }

    #[inline]
    pub fn data_type(&self) -> FieldType {
        self.data_type
    }

    #[inline]
    pub fn ifd(&self) -> IfdId {
        self.ifd
    }

    pub fn set_ifd(&mut self, ifd: IfdId) {
        self.ifd = ifd;
    }

    #[inline]
    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    /// Overwrite the component count without touching the value.
    ///
    /// Used when a value must be truncated to avoid overlapping other
    /// structure; the next setter is then checked against the new count.
    pub fn force_set_component_count(&mut self, count: u32) {
        self.component_count = count;
    }

    #[inline]
    pub fn has_defined_count(&self) -> bool {
        self.has_defined_count
    }

    pub fn set_has_defined_count(&mut self, defined: bool) {
        self.has_defined_count = defined;
    }

    /// Stream offset of the value (relative to the TIFF header).
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Total size of the value in bytes.
    #[inline]
    pub fn data_size(&self) -> u64 {
        self.component_count as u64 * self.data_type.size_in_bytes()
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&TagValue> {
        self.value.as_ref()
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    fn check_component_count(&self, len: usize) -> Result<(), ValueError> {
        if self.has_defined_count && self.component_count as usize != len {
            return Err(ValueError::CountMismatch {
                expected: self.component_count,
                actual: len,
            });
        }
        Ok(())
    }

    fn type_mismatch(&self, setter: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            setter,
            data_type: self.data_type,
        }
    }

    fn store(&mut self, value: TagValue) {
        self.component_count = value.len() as u32;
        self.value = Some(value);
    }

    /// Set 32-bit integer components on a SHORT, LONG or SLONG tag.
    ///
    /// SHORT components must lie in `0..=65535` and LONG components must be
    /// non-negative.
    pub fn set_ints(&mut self, values: &[i32]) -> Result<(), ValueError> {
        self.check_component_count(values.len())?;
        let range = match self.data_type {
            FieldType::Short => 0..=i64::from(u16::MAX),
            FieldType::Long => 0..=i64::from(i32::MAX),
            FieldType::SLong => i64::from(i32::MIN)..=i64::from(i32::MAX),
            _ => return Err(self.type_mismatch("int")),
        };
        check_range(values.iter().map(|&v| i64::from(v)), &range)?;
        self.store(TagValue::Integers(
            values.iter().map(|&v| i64::from(v)).collect(),
        ));
        Ok(())
    }

    pub fn set_int(&mut self, value: i32) -> Result<(), ValueError> {
        self.set_ints(&[value])
    }

    /// Set unsigned 32-bit components on a LONG tag.
    ///
    /// Components must lie in `0..=4294967295`.
    pub fn set_longs(&mut self, values: &[i64]) -> Result<(), ValueError> {
        self.check_component_count(values.len())?;
        if self.data_type != FieldType::Long {
            return Err(self.type_mismatch("long"));
        }
        check_range(values.iter().copied(), &(0..=i64::from(u32::MAX)))?;
        self.store(TagValue::Integers(values.to_vec()));
        Ok(())
    }

    pub fn set_long(&mut self, value: i64) -> Result<(), ValueError> {
        self.set_longs(&[value])
    }

    /// Set a string on an ASCII or UNDEFINED tag.
    ///
    /// Characters outside ASCII are stored as `?`. ASCII values gain a NUL
    /// terminator unless they already end with one; UNDEFINED values are
    /// stored as-is. An empty ASCII string on a single-component tag is
    /// stored as a lone terminator.
    ///
    /// With a pinned count the terminated value must have exactly that many
    /// bytes. A string filling the whole count has its last byte replaced by
    /// the terminator.
    pub fn set_string(&mut self, value: &str) -> Result<(), ValueError> {
        if self.data_type != FieldType::Ascii && self.data_type != FieldType::Undefined {
            return Err(self.type_mismatch("string"));
        }

        let mut buf: Vec<u8> = value
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        let mut terminated = false;
        match buf.last() {
            Some(&last) if last != 0 && self.data_type == FieldType::Ascii => {
                buf.push(0);
                terminated = true;
            }
            None if self.data_type == FieldType::Ascii && self.component_count == 1 => {
                buf.push(0);
            }
            _ => {}
        }

        // A string filling a pinned count gives up its last byte to the terminator
        if terminated && self.has_defined_count && buf.len() == self.component_count as usize + 1
        {
            buf.pop();
            if let Some(last) = buf.last_mut() {
                *last = 0;
            }
        }
        self.check_component_count(buf.len())?;
        self.store(TagValue::Bytes(buf));
        Ok(())
    }

    /// Set rational components on a RATIONAL or SRATIONAL tag.
    ///
    /// RATIONAL components must fit in u32 and SRATIONAL components in i32.
    pub fn set_rationals(&mut self, values: &[Rational]) -> Result<(), ValueError> {
        self.check_component_count(values.len())?;
        let range = match self.data_type {
            FieldType::Rational => 0..=i64::from(u32::MAX),
            FieldType::SRational => i64::from(i32::MIN)..=i64::from(i32::MAX),
            _ => return Err(self.type_mismatch("rational")),
        };
        check_range(
            values.iter().flat_map(|r| [r.numerator, r.denominator]),
            &range,
        )
        .map_err(|e| match e {
            ValueError::OutOfRange { index, value } => ValueError::OutOfRange {
                index: index / 2,
                value,
            },
            other => other,
        })?;
        self.store(TagValue::Rationals(values.to_vec()));
        Ok(())
    }

    pub fn set_rational(&mut self, value: Rational) -> Result<(), ValueError> {
        self.set_rationals(&[value])
    }

    /// Set raw bytes on a BYTE or UNDEFINED tag.
    pub fn set_bytes(&mut self, values: &[u8]) -> Result<(), ValueError> {
        self.check_component_count(values.len())?;
        if self.data_type != FieldType::Byte && self.data_type != FieldType::Undefined {
            return Err(self.type_mismatch("byte"));
        }
        self.store(TagValue::Bytes(values.to_vec()));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    /// Component `index` widened to i64.
    ///
    /// # Errors
    /// `NotInteger` for rational tags, `NoValue` for unresolved tags and
    /// `IndexOutOfBounds` past the last component.
    pub fn value_at(&self, index: usize) -> Result<i64, ValueError> {
        let value = self.value.as_ref().ok_or(ValueError::NoValue)?;
        let component = match value {
            TagValue::Integers(v) => v.get(index).copied(),
            TagValue::Bytes(v) => v.get(index).map(|&b| i64::from(b)),
            TagValue::Rationals(_) => return Err(ValueError::NotInteger(self.data_type)),
        };
        component.ok_or(ValueError::IndexOutOfBounds {
            index,
            len: value.len(),
        })
    }

    /// Integer components truncated to i32.
    pub fn value_as_ints(&self) -> Option<Vec<i32>> {
        match &self.value {
            Some(TagValue::Integers(v)) => Some(v.iter().map(|&x| x as i32).collect()),
            _ => None,
        }
    }

    pub fn value_as_longs(&self) -> Option<&[i64]> {
        match &self.value {
            Some(TagValue::Integers(v)) => Some(v),
            _ => None,
        }
    }

    pub fn value_as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Some(TagValue::Bytes(v)) => Some(v),
            _ => None,
        }
    }

    pub fn value_as_rationals(&self) -> Option<&[Rational]> {
        match &self.value {
            Some(TagValue::Rationals(v)) => Some(v),
            _ => None,
        }
    }

    /// ASCII value up to its first NUL.
    pub fn value_as_string(&self) -> Option<String> {
        if self.data_type != FieldType::Ascii {
            return None;
        }
        let bytes = self.value_as_bytes()?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Render the value for diagnostics, whatever its type.
    pub fn value_display(&self) -> String {
        match &self.value {
            None => String::from("<unresolved>"),
            Some(TagValue::Bytes(_)) if self.data_type == FieldType::Ascii => {
                self.value_as_string().unwrap_or_default()
            }
            Some(TagValue::Bytes(v)) => format!("{:?}", v),
            Some(TagValue::Integers(v)) => format!("{:?}", v),
            Some(TagValue::Rationals(v)) => {
                let parts: Vec<String> = v.iter().map(|r| r.to_string()).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

fn check_range(
    values: impl Iterator<Item = i64>,
    range: &std::ops::RangeInclusive<i64>,
) -> Result<(), ValueError> {
    for (index, value) in values.enumerate() {
        if !range.contains(&value) {
            return Err(ValueError::OutOfRange { index, value });
        }
    }
    Ok(())
}

impl PartialEq for ExifTag {
    /// Tags are equal when id, type, count and value match. Directory and
    /// offset are placement, not content.
    fn eq(&self, other: &Self) -> bool {
        self.tag_id == other.tag_id
            && self.data_type == other.data_type
            && self.component_count == other.component_count
            && self.value == other.value
    }
}

impl fmt::Display for ExifTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tag id: {:04X}", self.tag_id)?;
        writeln!(f, "ifd id: {}", self.ifd.name())?;
        writeln!(f, "type: {}", self.data_type.name())?;
        writeln!(f, "count: {}", self.component_count)?;
        writeln!(f, "offset: {}", self.offset)?;
        writeln!(f, "value: {}", self.value_display())
    }
}

// =============================================================================
// Tests
// =============================================================================
