//! Screen color to vibration intensity mapping.
//!
//! Tuned for a red-encoded on-screen signal: only the red channel drives
//! the output, and any pixel carrying green or blue is treated as not being
//! part of the signal at all.

use crate::intensity::Intensity;

/// One sampled screen pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Red fractions below this floor map to zero instead of a barely-on motor.
pub const RED_FLOOR: f64 = 0.04;

/// Maps a sampled color to the next intensity.
///
/// Any green or blue content means the pixel is not the signal, so the
/// current intensity is kept unchanged. A pure-red fraction below
/// [`RED_FLOOR`] switches off; anything above it maps to the red fraction
/// itself, so brighter red is always stronger.
pub fn map_color(color: Rgb, current: Intensity) -> Intensity {
    if color.g > 0 || color.b > 0 {
        return current;
    }
    let red = f64::from(color.r) / 255.0;
    if red < RED_FLOOR {
        Intensity::ZERO
    } else {
        Intensity::clamped(red)
    }
}
