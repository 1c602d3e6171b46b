//! Raster codec for cube animations.
//!
//! This module translates between the in-memory
//! [`Animation`](crate::model::Animation) model and the byte container
//! used for both on-disk storage and device transfer. Each cube frame
//! is flattened to an 8x64 RGB raster via the geometry mapping in
//! [`geometry`].
//!
//! # File Format
//!
//! The `.lca` (LED Cube Animation) format:
//!
//! ```text
//! Header (32 bytes):
//!   Magic: "LCAN" (4 bytes)
//!   Version: u16
//!   Flags: u16 (reserved, zero)
//!   Width: u32 (always 8)
//!   Height: u32 (always 64)
//!   Frame count: u32 (>= 1)
//!   Reserved: 12 bytes
//!
//! Frame blocks (frame_count * 1540 bytes):
//!   Delay: f32 (seconds)
//!   Pixels: 8 * 64 * 3 bytes, RGB row-major,
//!           offset(px, py) = 3 * (px + py * 8)
//! ```
//!
//! Encoding substitutes solid black for unset voxels; decoding treats
//! any pixel with all channels below the darkness threshold as unset.
//! The asymmetry is intentional: a deliberately near-black voxel does
//! not survive a round trip.

mod codec;
mod format;
pub mod geometry;
mod task;

pub use codec::{
    decode, decode_metadata, encode, encode_to_file, read_animation, read_metadata,
};
pub use format::{ANIMATION_EXTENSION, ANIMATION_MAGIC, ANIMATION_VERSION, RasterHeader};
pub use task::{
    Task, decode_in_background, encode_in_background, encode_to_file_in_background,
    read_animation_in_background,
};

use thiserror::Error;

/// Errors produced while encoding or decoding the raster container.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("not a cube animation file (bad magic bytes)")]
    BadMagic,

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),

    #[error("container is {width}x{height} pixels, cube rasters must be 8x64")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("container declares zero frames")]
    NoFrames,

    #[error("truncated or oversized container: expected {expected} bytes, got {actual}")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
