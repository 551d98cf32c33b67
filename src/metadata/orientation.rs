//! EXIF orientation codes.
//!
//! Maps the eight orientation values of tag 0x0112 to the rotation and
//! mirroring needed to display the image upright.

use serde::Serialize;

/// How to display an image stored with a given EXIF orientation code.
///
/// Apply the rotation (clockwise, in degrees) after the flips.
/// `invert_dimensions` is set when the displayed width and height are
/// swapped relative to the stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrientationParams {
    pub rotation: u16,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub invert_dimensions: bool,
}

impl OrientationParams {
    const fn new(
        rotation: u16,
        flip_horizontal: bool,
        flip_vertical: bool,
        invert_dimensions: bool,
    ) -> Self {
        Self {
            rotation,
            flip_horizontal,
            flip_vertical,
            invert_dimensions,
        }
    }

    /// Horizontal scale factor (-1 when mirrored).
    pub fn scale_x(&self) -> i8 {
        if self.flip_horizontal {
            -1
        } else {
            1
        }
    }

    /// Vertical scale factor (-1 when mirrored).
    pub fn scale_y(&self) -> i8 {
        if self.flip_vertical {
            -1
        } else {
            1
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Transform for an orientation code. Codes outside 1-8 map to identity.
pub fn orientation_params(orientation: i32) -> OrientationParams {
    match orientation {
        2 => OrientationParams::new(0, true, false, false),
        3 => OrientationParams::new(180, false, false, false),
        4 => OrientationParams::new(0, false, true, false),
        5 => OrientationParams::new(90, true, false, true),
        6 => OrientationParams::new(90, false, false, true),
        7 => OrientationParams::new(270, true, false, true),
        8 => OrientationParams::new(270, false, false, true),
        _ => OrientationParams::default(),
    }
}
