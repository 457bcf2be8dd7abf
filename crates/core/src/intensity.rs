//! Normalized vibration intensity.

use crate::error::{Error, Result};

/// Vibration intensity normalized to `[0.0, 1.0]`.
///
/// One value drives the whole session; it is replicated across every
/// vibration channel of every device when a command goes out.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Intensity(f64);

impl Intensity {
    /// No vibration.
    pub const ZERO: Intensity = Intensity(0.0);
    /// Full vibration.
    pub const MAX: Intensity = Intensity(1.0);

    /// Builds an intensity from a unit value. Rejects NaN and anything
    /// outside `[0.0, 1.0]`.
    pub fn from_unit(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Intensity(value))
        } else {
            Err(Error::IntensityRange(value))
        }
    }

    /// Builds an intensity from a user-facing percentage in `[0, 100]`.
    /// The stored value is exactly `percent / 100`.
    pub fn from_percent(percent: f64) -> Result<Self> {
        if (0.0..=100.0).contains(&percent) {
            Ok(Intensity(percent / 100.0))
        } else {
            Err(Error::IntensityRange(percent))
        }
    }

    /// Builds an intensity from a computed value, clamping into range.
    /// NaN clamps to zero.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Intensity::ZERO
        } else {
            Intensity(value.clamp(0.0, 1.0))
        }
    }

    /// The unit value sent on the wire.
    pub fn value(self) -> f64 {
        self.0
    }

    /// The value scaled back to a percentage for console display.
    pub fn as_percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}
