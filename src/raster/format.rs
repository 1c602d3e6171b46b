//! Binary layout of the LED Cube Animation container.

use std::io::{Read, Write};

use super::RasterError;
use super::geometry::{BYTES_PER_PIXEL, RASTER_HEIGHT, RASTER_WIDTH};

/// Magic bytes identifying a cube animation file.
pub const ANIMATION_MAGIC: &[u8; 4] = b"LCAN";

/// Current container version.
pub const ANIMATION_VERSION: u16 = 1;

/// File extension for stored animations (without the dot).
pub const ANIMATION_EXTENSION: &str = "lca";

/// Bytes of pixel data in one frame block.
pub const FRAME_PIXEL_BYTES: usize = RASTER_WIDTH * RASTER_HEIGHT * BYTES_PER_PIXEL;

/// Total bytes of one frame block: delay f32 + pixel data.
pub const FRAME_BLOCK_BYTES: usize = 4 + FRAME_PIXEL_BYTES;

/// Container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterHeader {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Number of frame blocks following the header.
    pub frame_count: u32,
}

impl RasterHeader {
    /// Size of the header in bytes.
    /// Magic(4) + Version(2) + Flags(2) + Width(4) + Height(4) +
    /// FrameCount(4) + Reserved(12) = 32
    pub const SIZE: usize = 32;

    /// Header for a cube animation with the given frame count.
    pub fn for_cube(frame_count: u32) -> Self {
        Self {
            width: RASTER_WIDTH as u32,
            height: RASTER_HEIGHT as u32,
            frame_count,
        }
    }

    /// Reject any raster that is not the fixed 8x64 cube layout.
    pub fn validate_geometry(&self) -> Result<(), RasterError> {
        if self.width != RASTER_WIDTH as u32 || self.height != RASTER_HEIGHT as u32 {
            return Err(RasterError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Exact byte length of a container with this header.
    pub fn expected_len(&self) -> usize {
        Self::SIZE + self.frame_count as usize * FRAME_BLOCK_BYTES
    }

    /// Write the header.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), RasterError> {
        w.write_all(ANIMATION_MAGIC)?;
        w.write_all(&ANIMATION_VERSION.to_le_bytes())?;
        // Flags, reserved for future use.
        w.write_all(&0u16.to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.frame_count.to_le_bytes())?;
        // Reserved bytes
        w.write_all(&[0u8; 12])?;
        Ok(())
    }

    /// Read a header, rejecting wrong magic and unknown versions.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, RasterError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != ANIMATION_MAGIC {
            return Err(RasterError::BadMagic);
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != ANIMATION_VERSION {
            return Err(RasterError::UnsupportedVersion(version));
        }

        // Flags are reserved; readers skip them.
        r.read_exact(&mut buf2)?;

        r.read_exact(&mut buf4)?;
        let width = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let height = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let frame_count = u32::from_le_bytes(buf4);

        let mut reserved = [0u8; 12];
        r.read_exact(&mut reserved)?;

        Ok(Self {
            width,
            height,
            frame_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_roundtrip() {
        let header = RasterHeader::for_cube(17);

        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), RasterHeader::SIZE);

        let mut cursor = Cursor::new(&buf);
        let decoded = RasterHeader::read_from(&mut cursor).unwrap();

        assert_eq!(decoded, header);
        assert_eq!(decoded.width, 8);
        assert_eq!(decoded.height, 64);
        assert_eq!(decoded.frame_count, 17);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut buf = Vec::new();
        RasterHeader::for_cube(1).write_to(&mut buf).unwrap();
        buf[0] = b'G';

        let err = RasterHeader::read_from(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, RasterError::BadMagic));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut buf = Vec::new();
        RasterHeader::for_cube(1).write_to(&mut buf).unwrap();
        buf[4] = 99;

        let err = RasterHeader::read_from(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_geometry_validation() {
        assert!(RasterHeader::for_cube(1).validate_geometry().is_ok());

        let skewed = RasterHeader {
            width: 16,
            height: 16,
            frame_count: 1,
        };
        assert!(matches!(
            skewed.validate_geometry(),
            Err(RasterError::InvalidGeometry {
                width: 16,
                height: 16
            })
        ));
    }

    #[test]
    fn test_expected_len() {
        assert_eq!(RasterHeader::for_cube(1).expected_len(), 32 + 1540);
        assert_eq!(RasterHeader::for_cube(3).expected_len(), 32 + 3 * 1540);
    }
}
