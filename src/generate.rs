//! Programmatic animation patterns.
//!
//! Patterns produce complete [`Animation`] values from a small JSON
//! description. Generation is deterministic for a given seed, so the
//! same pattern file always yields the same animation.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::{Animation, AnimationKind, CUBE_SIZE, DEFAULT_FRAME_DURATION, Frame, Rgb};

/// Predefined generator patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Random voxels lit per frame.
    Sparkle {
        /// Number of frames to generate.
        frames: usize,
        /// Voxels lit per frame (duplicates collapse, so up to this many).
        lit: usize,
        /// Colour of lit voxels.
        color: Rgb,
        /// Random seed.
        seed: u64,
    },
    /// Droplets falling down random columns.
    Rain {
        /// Number of frames to generate.
        frames: usize,
        /// Number of droplets.
        drops: usize,
        /// Colour of droplets.
        color: Rgb,
        /// Random seed.
        seed: u64,
    },
    /// Every voxel lit with one colour.
    Fill {
        /// Number of frames to generate.
        frames: usize,
        /// Fill colour.
        color: Rgb,
        /// Display duration per frame in seconds.
        #[serde(default = "default_duration")]
        duration: f32,
    },
}

fn default_duration() -> f32 {
    DEFAULT_FRAME_DURATION
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Sparkle {
            frames: 24,
            lit: 12,
            color: Rgb::new(0, 200, 255),
            seed: 42,
        }
    }
}

impl Pattern {
    /// Generate the animation this pattern describes.
    ///
    /// The result is always non-empty; a zero frame request still
    /// produces one frame. The returned animation is programmatic and
    /// unnamed.
    pub fn generate(&self) -> Animation {
        let frames = match *self {
            Pattern::Sparkle {
                frames,
                lit,
                color,
                seed,
            } => sparkle(frames.max(1), lit, color, seed),
            Pattern::Rain {
                frames,
                drops,
                color,
                seed,
            } => rain(frames.max(1), drops, color, seed),
            Pattern::Fill {
                frames,
                color,
                duration,
            } => fill(frames.max(1), color, duration),
        };

        let mut animation = Animation::from_frames(frames);
        animation.kind = AnimationKind::Programmatic;
        animation
    }
}

fn sparkle(frames: usize, lit: usize, color: Rgb, seed: u64) -> Vec<Frame> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..frames)
        .map(|_| {
            let mut frame = Frame::new();
            for _ in 0..lit {
                let x = rng.gen_range(0..CUBE_SIZE);
                let y = rng.gen_range(0..CUBE_SIZE);
                let z = rng.gen_range(0..CUBE_SIZE);
                frame.set_voxel(x, y, z, Some(color));
            }
            frame
        })
        .collect()
}

fn rain(frames: usize, drops: usize, color: Rgb, seed: u64) -> Vec<Frame> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Each droplet is a vertical column plus the frame it starts on.
    let droplets: Vec<(usize, usize, usize)> = (0..drops)
        .map(|_| {
            (
                rng.gen_range(0..CUBE_SIZE),
                rng.gen_range(0..CUBE_SIZE),
                rng.gen_range(0..frames),
            )
        })
        .collect();

    (0..frames)
        .map(|f| {
            let mut frame = Frame::new();
            for &(x, z, start) in &droplets {
                if f >= start && f - start < CUBE_SIZE {
                    // Fall from the top layer (y = 7) to the bottom.
                    let y = CUBE_SIZE - 1 - (f - start);
                    frame.set_voxel(x, y, z, Some(color));
                }
            }
            frame
        })
        .collect()
}

fn fill(frames: usize, color: Rgb, duration: f32) -> Vec<Frame> {
    let duration = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        DEFAULT_FRAME_DURATION
    };

    (0..frames)
        .map(|_| {
            let mut frame = Frame::new();
            frame.duration = duration;
            for x in 0..CUBE_SIZE {
                for y in 0..CUBE_SIZE {
                    for z in 0..CUBE_SIZE {
                        frame.set_voxel(x, y, z, Some(color));
                    }
                }
            }
            frame
        })
        .collect()
}
