//! LED cube animations: model, raster codec, playback.
//!
//! This crate edits voxel-grid light animations for an 8x8x8 LED cube
//! and exchanges them with the cube itself. Animations are stored and
//! transferred as `.lca` containers, a fixed-geometry 8x64 RGB raster
//! with per-frame delays.
//!
//! # Architecture
//!
//! - `model`: frames, colours and the animation aggregate
//! - `raster`: geometry mapping, container format, codec, background tasks
//! - `playback`: frame pointer state machine and autoplay scheduling
//! - `generate`: programmatic pattern generators
//! - `store`: the local animation library
//! - `remote`: exchange with the cube device
//!
//! # Example
//!
//! ```rust,no_run
//! use lumicube::model::{Animation, Rgb};
//! use lumicube::playback::{ManualScheduler, Player};
//! use lumicube::raster;
//!
//! // Paint one voxel and round-trip it through the codec.
//! let mut animation = Animation::new();
//! animation
//!     .set_voxel(0, 3, 3, 3, Some(Rgb::new(255, 40, 0)))
//!     .unwrap();
//!
//! let bytes = raster::encode(&animation).unwrap();
//! let decoded = raster::decode(&bytes, Some("comet.lca")).unwrap();
//! assert_eq!(decoded.frames(), animation.frames());
//!
//! // Step through it with a hand-driven scheduler.
//! let mut player = Player::new(decoded, ManualScheduler::new());
//! player.toggle_play();
//! if let Some(token) = player.scheduler_mut().fire() {
//!     player.advance(token);
//! }
//! ```

pub mod generate;
pub mod model;
pub mod playback;
pub mod raster;
pub mod remote;
pub mod store;

// Re-export commonly used types
pub use generate::Pattern;
pub use model::{Animation, AnimationKind, Frame, Rgb};
pub use playback::Player;
pub use raster::RasterError;
