//! The animation aggregate: an ordered, never-empty list of frames plus
//! identity metadata (name, device id, on-disk location).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::color::Rgb;
use super::frame::{CUBE_SIZE, Frame};

/// Display name used when an animation has not been named yet.
pub const UNSAVED_NAME: &str = "Unsaved";

/// How an animation's content is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// A stored sequence of frames.
    Fixed,
    /// Generated on the fly; has no stored frame data on the device.
    Programmatic,
}

/// Errors from mutating an [`Animation`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("frame index {index} out of bounds (animation has {frames} frames)")]
    FrameOutOfBounds { index: usize, frames: usize },

    #[error("voxel ({x}, {y}, {z}) outside the {CUBE_SIZE}x{CUBE_SIZE}x{CUBE_SIZE} cube")]
    VoxelOutOfBounds { x: usize, y: usize, z: usize },

    #[error("invalid frame duration {seconds}s, must be positive and finite")]
    InvalidDuration { seconds: f32 },
}

/// An editable voxel animation.
///
/// Invariants:
/// - there is always at least one frame;
/// - every content mutation (voxel edit, duration change, frame
///   append/removal) clears `id`, since the copy on the device no
///   longer matches this one. Failed mutations leave `id` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Frame>,
    /// User-facing name; `None` until the animation is saved or named.
    pub name: Option<String>,
    id: Option<String>,
    /// Where this animation was loaded from, if anywhere.
    pub path: Option<PathBuf>,
    /// Encoded size in bytes, when known.
    pub size: Option<u64>,
    pub kind: AnimationKind,
}

impl Animation {
    /// A new unsaved animation with a single blank frame.
    pub fn new() -> Self {
        Self::from_frames(vec![Frame::new()])
    }

    /// Build an animation from existing frames. An empty list is
    /// replaced with a single blank frame so the never-empty invariant
    /// holds from construction onward.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let frames = if frames.is_empty() {
            vec![Frame::new()]
        } else {
            frames
        };
        Self {
            frames,
            name: None,
            id: None,
            path: None,
            size: None,
            kind: AnimationKind::Fixed,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Display duration of the given frame, in seconds.
    pub fn duration(&self, index: usize) -> Option<f32> {
        self.frames.get(index).map(|f| f.duration)
    }

    /// Append a blank frame at the end.
    pub fn append_frame(&mut self) {
        self.frames.push(Frame::new());
        self.id = None;
    }

    /// Drop the last frame. Does nothing when only one frame remains.
    pub fn remove_last_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            self.id = None;
        }
    }

    /// Set one voxel of one frame. On success the device id is cleared:
    /// the edited animation no longer matches any uploaded copy.
    pub fn set_voxel(
        &mut self,
        frame: usize,
        x: usize,
        y: usize,
        z: usize,
        color: Option<Rgb>,
    ) -> Result<(), ModelError> {
        let frames = self.frames.len();
        if frame >= frames {
            return Err(ModelError::FrameOutOfBounds {
                index: frame,
                frames,
            });
        }
        if x >= CUBE_SIZE || y >= CUBE_SIZE || z >= CUBE_SIZE {
            return Err(ModelError::VoxelOutOfBounds { x, y, z });
        }
        self.frames[frame].set_voxel(x, y, z, color);
        self.id = None;
        Ok(())
    }

    /// Set a frame's display duration. Rejects zero, negative and
    /// non-finite values. On success the device id is cleared.
    pub fn set_duration(&mut self, frame: usize, seconds: f32) -> Result<(), ModelError> {
        let frames = self.frames.len();
        if frame >= frames {
            return Err(ModelError::FrameOutOfBounds {
                index: frame,
                frames,
            });
        }
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ModelError::InvalidDuration { seconds });
        }
        self.frames[frame].duration = seconds;
        self.id = None;
        Ok(())
    }

    /// The name to show in listings and to derive filenames from.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNSAVED_NAME)
    }

    /// Device-side identifier, present only while this animation is an
    /// unmodified copy of one stored on the cube.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

/// A row in the local library listing. Produced by reading only the
/// container header and the file size, never the pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: Option<PathBuf>,
    /// Encoded size in bytes.
    pub size: u64,
    pub frame_count: u32,
    pub kind: AnimationKind,
}
