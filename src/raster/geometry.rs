//! Cube-to-raster coordinate mapping.
//!
//! The 8x8x8 cube is flattened into an 8x64 raster: each horizontal
//! cube layer (fixed y) contributes eight consecutive raster rows, one
//! per z. Both codec directions go through these functions; nothing
//! else may compute pixel positions.

use crate::model::CUBE_SIZE;

/// Raster width in pixels.
pub const RASTER_WIDTH: usize = 8;

/// Raster height in pixels (8 layers of 8 rows).
pub const RASTER_HEIGHT: usize = 64;

/// Bytes per pixel (RGB, no alpha).
pub const BYTES_PER_PIXEL: usize = 3;

/// Map cube coordinates to raster pixel coordinates.
#[inline]
pub fn cube_to_raster(x: usize, y: usize, z: usize) -> (usize, usize) {
    (x, z + y * CUBE_SIZE)
}

/// Map raster pixel coordinates back to cube coordinates.
#[inline]
pub fn raster_to_cube(px: usize, py: usize) -> (usize, usize, usize) {
    (px, py / CUBE_SIZE, py % CUBE_SIZE)
}

/// Byte offset of pixel (px, py) within a frame's RGB buffer.
#[inline]
pub fn pixel_offset(px: usize, py: usize) -> usize {
    BYTES_PER_PIXEL * (px + py * RASTER_WIDTH)
}
