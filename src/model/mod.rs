//! Model module - Voxel animation data types.
//!
//! An [`Animation`] is an ordered, never-empty sequence of [`Frame`]s, each
//! a complete 8x8x8 snapshot of the cube's LEDs plus a display duration.
//! Colours are [`Rgb`] triples; a voxel holds `Option<Rgb>` where `None`
//! means the LED is off.

mod animation;
mod color;
mod frame;

pub use animation::*;
pub use color::*;
pub use frame::*;
