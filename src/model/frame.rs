//! A single animation frame: every LED's colour plus a display duration.

use super::color::Rgb;

/// Cube edge length in voxels.
pub const CUBE_SIZE: usize = 8;

/// Voxels in one frame (8 * 8 * 8).
pub const VOXELS_PER_FRAME: usize = CUBE_SIZE * CUBE_SIZE * CUBE_SIZE;

/// Default frame display duration in seconds.
pub const DEFAULT_FRAME_DURATION: f32 = 0.02;

/// One complete voxel-grid snapshot.
///
/// Colours are stored as a flat array indexed by `x*64 + y*8 + z`; an
/// unset entry is an LED that is off. Frames are plain values: cloning
/// one and mutating the clone leaves the original untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Display duration in seconds. Must stay positive;
    /// [`Animation::set_duration`](super::Animation::set_duration) is the
    /// validated entry point.
    pub duration: f32,
    voxels: [Option<Rgb>; VOXELS_PER_FRAME],
}

impl Frame {
    /// Create a blank frame (all LEDs off, default duration).
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_FRAME_DURATION,
            voxels: [None; VOXELS_PER_FRAME],
        }
    }

    /// Convert (x, y, z) cube coordinates to the flat voxel index.
    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        x * CUBE_SIZE * CUBE_SIZE + y * CUBE_SIZE + z
    }

    /// Colour at (x, y, z). Panics if a coordinate is outside the cube.
    #[inline]
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> Option<Rgb> {
        self.voxels[Self::idx(x, y, z)]
    }

    /// Set the colour at (x, y, z); `None` switches the LED off.
    /// Panics if a coordinate is outside the cube.
    #[inline]
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, color: Option<Rgb>) {
        self.voxels[Self::idx(x, y, z)] = color;
    }

    /// Number of lit voxels.
    pub fn lit_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_some()).count()
    }

    /// True when every LED is off.
    pub fn is_blank(&self) -> bool {
        self.voxels.iter().all(|v| v.is_none())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_is_blank() {
        let frame = Frame::new();
        assert!(frame.is_blank());
        assert_eq!(frame.lit_count(), 0);
        assert_eq!(frame.duration, DEFAULT_FRAME_DURATION);
    }

    #[test]
    fn test_set_and_read_voxel() {
        let mut frame = Frame::new();
        frame.set_voxel(1, 2, 3, Some(Rgb::new(200, 100, 50)));

        assert_eq!(frame.voxel(1, 2, 3), Some(Rgb::new(200, 100, 50)));
        assert_eq!(frame.voxel(3, 2, 1), None);
        assert_eq!(frame.lit_count(), 1);

        frame.set_voxel(1, 2, 3, None);
        assert!(frame.is_blank());
    }

    #[test]
    fn test_frames_are_value_types() {
        let mut a = Frame::new();
        a.set_voxel(0, 0, 0, Some(Rgb::new(255, 0, 0)));

        let mut b = a.clone();
        b.set_voxel(0, 0, 0, None);

        assert_eq!(a.voxel(0, 0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(b.voxel(0, 0, 0), None);
    }

    #[test]
    fn test_idx_covers_grid_without_collisions() {
        let mut seen = [false; VOXELS_PER_FRAME];
        for x in 0..CUBE_SIZE {
            for y in 0..CUBE_SIZE {
                for z in 0..CUBE_SIZE {
                    let idx = Frame::idx(x, y, z);
                    assert!(!seen[idx], "index collision at ({x}, {y}, {z})");
                    seen[idx] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
