//! LED colour type and the darkness quantization rule.

use serde::{Deserialize, Serialize};

/// Channel cutoff below which a decoded pixel counts as an unlit LED.
///
/// Encoding writes literal black for unset voxels, so decoding folds any
/// pixel with all three channels under this value back to unset. A voxel
/// deliberately painted near-black is lost the same way; this asymmetry is
/// part of the container contract, not an accident.
pub const DARKNESS_THRESHOLD: u8 = 30;

/// An 8-bit RGB triple for one lit LED.
///
/// A voxel is `Option<Rgb>`; `None` is an LED that is off, which is
/// distinct from a lit black LED right up until the animation passes
/// through the raster container (see [`DARKNESS_THRESHOLD`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True when all three channels fall under [`DARKNESS_THRESHOLD`].
    #[inline]
    pub fn is_dark(self) -> bool {
        self.r < DARKNESS_THRESHOLD && self.g < DARKNESS_THRESHOLD && self.b < DARKNESS_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_is_dark() {
        assert!(Rgb::BLACK.is_dark());
        assert!(Rgb::new(10, 10, 10).is_dark());
        assert!(Rgb::new(29, 29, 29).is_dark());
    }

    #[test]
    fn test_one_bright_channel_is_lit() {
        assert!(!Rgb::new(30, 0, 0).is_dark());
        assert!(!Rgb::new(0, 30, 0).is_dark());
        assert!(!Rgb::new(0, 0, 30).is_dark());
        assert!(!Rgb::new(255, 255, 255).is_dark());
    }
}
