//! Frame selection and timer-paced autoplay.
//!
//! The [`Player`] is a two-state machine: idle, where a single current
//! frame is displayed and edited, and playing, where scheduled advances
//! walk the frame pointer forward in a loop. Scheduling goes through
//! the [`Scheduler`] trait so hosts can drive it from a real timer
//! thread or, in tests, by hand.

mod engine;
mod scheduler;

pub use engine::{FrameChange, ObserverId, PLAYBACK_PACING, Player};
pub use scheduler::{AdvanceToken, ManualScheduler, Scheduler, TimerScheduler};
