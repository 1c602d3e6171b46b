//! Conversion between [`Animation`] values and container bytes.
//!
//! Both directions are all-or-nothing: decode either yields a fully
//! populated animation or an error, and encode either writes the whole
//! container or leaves nothing behind.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use crate::model::{Animation, AnimationKind, CUBE_SIZE, CatalogEntry, Frame, Rgb};

use super::RasterError;
use super::format::{FRAME_BLOCK_BYTES, FRAME_PIXEL_BYTES, RasterHeader};
use super::geometry::{RASTER_HEIGHT, RASTER_WIDTH, cube_to_raster, pixel_offset, raster_to_cube};

/// Encode an animation into container bytes.
///
/// Unset voxels are written as solid black. Frame blocks are rendered
/// in parallel; output order always matches frame order.
pub fn encode(animation: &Animation) -> Result<Vec<u8>, RasterError> {
    let header = RasterHeader::for_cube(animation.frame_count() as u32);
    let blocks: Vec<[u8; FRAME_PIXEL_BYTES]> = animation
        .frames()
        .par_iter()
        .map(frame_pixels)
        .collect();

    let mut bytes = Vec::with_capacity(header.expected_len());
    header.write_to(&mut bytes)?;
    for (frame, pixels) in animation.frames().iter().zip(&blocks) {
        bytes.extend_from_slice(&frame.duration.to_le_bytes());
        bytes.extend_from_slice(pixels);
    }
    Ok(bytes)
}

/// Encode and write to `path`, replacing any existing file.
///
/// Returns the encoded size in bytes.
pub fn encode_to_file(animation: &Animation, path: &Path) -> Result<u64, RasterError> {
    let bytes = encode(animation)?;
    write_container(&bytes, path)
}

/// Write container bytes to disk. The bytes are staged in a sibling
/// temp file and renamed into place, so a failed write never leaves a
/// partial animation behind.
pub(crate) fn write_container(bytes: &[u8], path: &Path) -> Result<u64, RasterError> {
    let staging = path.with_extension("tmp");
    if let Err(err) = fs::write(&staging, bytes).and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}

/// Decode container bytes into a fresh animation.
///
/// `source` is an optional origin identifier (filename or remote name);
/// its extension-stripped stem becomes the animation's name. Pixels
/// with every channel under the darkness threshold decode as unset.
pub fn decode(bytes: &[u8], source: Option<&str>) -> Result<Animation, RasterError> {
    if bytes.len() < RasterHeader::SIZE {
        return Err(RasterError::UnexpectedLength {
            expected: RasterHeader::SIZE,
            actual: bytes.len(),
        });
    }

    let mut reader = bytes;
    let header = RasterHeader::read_from(&mut reader)?;
    header.validate_geometry()?;
    if header.frame_count == 0 {
        return Err(RasterError::NoFrames);
    }
    let expected = header.expected_len();
    if bytes.len() != expected {
        return Err(RasterError::UnexpectedLength {
            expected,
            actual: bytes.len(),
        });
    }

    let frames: Vec<Frame> = bytes[RasterHeader::SIZE..]
        .par_chunks_exact(FRAME_BLOCK_BYTES)
        .map(decode_frame_block)
        .collect();
    debug!("decoded {} frames from {} bytes", frames.len(), bytes.len());

    let mut animation = Animation::from_frames(frames);
    animation.kind = AnimationKind::Fixed;
    animation.size = Some(bytes.len() as u64);
    animation.name = source.map(source_stem);
    Ok(animation)
}

/// Build a catalog entry from a container header prefix and the total
/// byte length, without touching pixel data.
pub fn decode_metadata(
    header_bytes: &[u8],
    total_size: u64,
    source: &str,
) -> Result<CatalogEntry, RasterError> {
    if header_bytes.len() < RasterHeader::SIZE {
        return Err(RasterError::UnexpectedLength {
            expected: RasterHeader::SIZE,
            actual: header_bytes.len(),
        });
    }

    let mut reader = header_bytes;
    let header = RasterHeader::read_from(&mut reader)?;
    header.validate_geometry()?;
    if header.frame_count == 0 {
        return Err(RasterError::NoFrames);
    }

    Ok(CatalogEntry {
        name: source_stem(source),
        path: None,
        size: total_size,
        frame_count: header.frame_count,
        kind: AnimationKind::Fixed,
    })
}

/// Read only the header of a stored animation. This is the cheap path
/// used for library listings; pixel data is never loaded.
pub fn read_metadata(path: &Path) -> Result<CatalogEntry, RasterError> {
    let mut file = fs::File::open(path)?;
    let mut header_bytes = [0u8; RasterHeader::SIZE];
    file.read_exact(&mut header_bytes)?;
    let total_size = file.metadata()?.len();

    let mut entry = decode_metadata(&header_bytes, total_size, &path.to_string_lossy())?;
    entry.path = Some(path.to_path_buf());
    Ok(entry)
}

/// Read and fully decode a stored animation.
pub fn read_animation(path: &Path) -> Result<Animation, RasterError> {
    let bytes = fs::read(path)?;
    decode_file_contents(&bytes, path)
}

/// Decode bytes read from `path`, stamping name and origin from it.
pub(crate) fn decode_file_contents(bytes: &[u8], path: &Path) -> Result<Animation, RasterError> {
    let mut animation = decode(bytes, Some(&path.to_string_lossy()))?;
    animation.path = Some(path.to_path_buf());
    Ok(animation)
}

fn frame_pixels(frame: &Frame) -> [u8; FRAME_PIXEL_BYTES] {
    // Zeroed buffer means unset voxels come out black.
    let mut pixels = [0u8; FRAME_PIXEL_BYTES];
    for x in 0..CUBE_SIZE {
        for y in 0..CUBE_SIZE {
            for z in 0..CUBE_SIZE {
                if let Some(color) = frame.voxel(x, y, z) {
                    let (px, py) = cube_to_raster(x, y, z);
                    let at = pixel_offset(px, py);
                    pixels[at] = color.r;
                    pixels[at + 1] = color.g;
                    pixels[at + 2] = color.b;
                }
            }
        }
    }
    pixels
}

fn decode_frame_block(block: &[u8]) -> Frame {
    let mut frame = Frame::new();

    let delay = f32::from_le_bytes([block[0], block[1], block[2], block[3]]);
    if delay.is_finite() && delay > 0.0 {
        frame.duration = delay;
    }

    let pixels = &block[4..];
    for py in 0..RASTER_HEIGHT {
        for px in 0..RASTER_WIDTH {
            let at = pixel_offset(px, py);
            let color = Rgb::new(pixels[at], pixels[at + 1], pixels[at + 2]);
            if !color.is_dark() {
                let (x, y, z) = raster_to_cube(px, py);
                frame.set_voxel(x, y, z, Some(color));
            }
        }
    }
    frame
}

fn source_stem(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source)
        .to_string()
}
