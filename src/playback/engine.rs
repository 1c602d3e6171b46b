//! The playback state machine.

use std::time::Duration;

use log::debug;

use crate::model::{Animation, DEFAULT_FRAME_DURATION, ModelError, Rgb};

use super::scheduler::{AdvanceToken, Scheduler};

/// Pacing multiplier applied to frame durations during autoplay.
pub const PLAYBACK_PACING: f32 = 1.5;

/// Emitted to observers whenever the current frame moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameChange {
    /// Index of the now-current frame.
    pub frame: usize,
    /// True when the move came from autoplay rather than navigation.
    pub animating: bool,
}

/// Handle returned by [`Player::subscribe`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

/// Owns an [`Animation`] and the frame pointer into it.
///
/// The player is either idle (one current frame, freely editable) or
/// playing (scheduled advances walk the pointer in a loop). Every
/// state change keeps the pointer inside `0..frame_count`. Navigation
/// clamps rather than errors, so UI-driven calls always succeed.
///
/// Observers are plain callbacks registered with [`subscribe`] and
/// removed with [`unsubscribe`]; the player never keeps one alive
/// beyond that registration.
///
/// [`subscribe`]: Player::subscribe
/// [`unsubscribe`]: Player::unsubscribe
pub struct Player<S: Scheduler> {
    animation: Animation,
    scheduler: S,
    current: usize,
    playing: bool,
    generation: u64,
    observers: Vec<(ObserverId, Box<dyn FnMut(FrameChange)>)>,
    next_observer: u64,
}

impl<S: Scheduler> Player<S> {
    pub fn new(animation: Animation, scheduler: S) -> Self {
        Self {
            animation,
            scheduler,
            current: 0,
            playing: false,
            generation: 0,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Register a frame-change observer.
    pub fn subscribe(&mut self, observer: impl FnMut(FrameChange) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop a previously registered observer.
    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.retain(|(registered, _)| *registered != id);
    }

    fn notify(&mut self, change: FrameChange) {
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }

    /// Start autoplay when idle, stop it when playing.
    ///
    /// Both directions bump the session generation, so advances
    /// scheduled before the toggle can never land afterwards.
    pub fn toggle_play(&mut self) {
        self.generation += 1;
        if self.playing {
            self.playing = false;
            self.scheduler.cancel();
            debug!("autoplay stopped at frame {}", self.current);
        } else {
            self.playing = true;
            self.schedule_advance();
            debug!("autoplay started at frame {}", self.current);
        }
    }

    fn schedule_advance(&mut self) {
        let seconds = self
            .animation
            .duration(self.current)
            .unwrap_or(DEFAULT_FRAME_DURATION)
            * PLAYBACK_PACING;
        let token = AdvanceToken {
            generation: self.generation,
        };
        self.scheduler
            .schedule_once(Duration::from_secs_f32(seconds), token);
    }

    /// Apply a fired advance: step to the next frame (wrapping), then
    /// reschedule using the new frame's duration. Tokens from an
    /// earlier play session are discarded without effect.
    pub fn advance(&mut self, token: AdvanceToken) {
        if !self.playing || token.generation != self.generation {
            debug!("discarding stale advance token");
            return;
        }
        self.current = (self.current + 1) % self.animation.frame_count();
        self.schedule_advance();
        self.notify(FrameChange {
            frame: self.current,
            animating: true,
        });
    }

    /// Jump to a frame, clamping the index into range. Notifies only
    /// when the pointer actually moves.
    pub fn set_frame(&mut self, index: usize) {
        let clamped = index.min(self.animation.frame_count() - 1);
        if clamped != self.current {
            self.current = clamped;
            self.notify(FrameChange {
                frame: clamped,
                animating: false,
            });
        }
    }

    pub fn next_frame(&mut self) {
        self.set_frame(self.current + 1);
    }

    pub fn previous_frame(&mut self) {
        self.set_frame(self.current.saturating_sub(1));
    }

    /// Append a blank frame after the last one. The pointer stays put;
    /// callers that want to land on the new frame navigate explicitly.
    pub fn append_frame(&mut self) {
        self.animation.append_frame();
    }

    /// Remove the last frame, pulling the pointer back into range when
    /// it pointed at the removed frame.
    pub fn remove_last_frame(&mut self) {
        self.animation.remove_last_frame();
        let last = self.animation.frame_count() - 1;
        if self.current > last {
            self.current = last;
            self.notify(FrameChange {
                frame: last,
                animating: false,
            });
        }
    }

    /// Edit a voxel on the current frame.
    pub fn set_voxel(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        color: Option<Rgb>,
    ) -> Result<(), ModelError> {
        self.animation.set_voxel(self.current, x, y, z, color)
    }

    /// Set the current frame's display duration.
    pub fn set_duration(&mut self, seconds: f32) -> Result<(), ModelError> {
        self.animation.set_duration(self.current, seconds)
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.animation.name = name;
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.animation.set_id(id);
    }

    /// Swap in a different animation, stopping autoplay and resetting
    /// the pointer to frame 0. Returns the previous animation.
    pub fn replace_animation(&mut self, animation: Animation) -> Animation {
        self.generation += 1;
        if self.playing {
            self.playing = false;
            self.scheduler.cancel();
        }
        self.current = 0;
        let previous = std::mem::replace(&mut self.animation, animation);
        self.notify(FrameChange {
            frame: 0,
            animating: false,
        });
        previous
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frame;
    use crate::playback::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn three_frame_animation() -> Animation {
        let mut frames = vec![Frame::new(), Frame::new(), Frame::new()];
        frames[0].duration = 0.02;
        frames[1].duration = 0.04;
        frames[2].duration = 0.06;
        Animation::from_frames(frames)
    }

    fn record_changes(player: &mut Player<ManualScheduler>) -> Rc<RefCell<Vec<FrameChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        player.subscribe(move |change| sink.borrow_mut().push(change));
        log
    }

    fn fire(player: &mut Player<ManualScheduler>) {
        let token = player.scheduler_mut().fire().unwrap();
        player.advance(token);
    }

    #[test]
    fn test_playback_cycle_paces_with_new_frame_durations() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.toggle_play();
        assert!(player.is_playing());
        assert_eq!(
            player.scheduler_mut().pending_delay(),
            Some(Duration::from_secs_f32(0.02 * PLAYBACK_PACING))
        );

        fire(&mut player);
        assert_eq!(player.current_frame(), 1);
        assert_eq!(
            player.scheduler_mut().pending_delay(),
            Some(Duration::from_secs_f32(0.04 * PLAYBACK_PACING))
        );

        fire(&mut player);
        assert_eq!(player.current_frame(), 2);
        assert_eq!(
            player.scheduler_mut().pending_delay(),
            Some(Duration::from_secs_f32(0.06 * PLAYBACK_PACING))
        );

        assert_eq!(
            *changes.borrow(),
            vec![
                FrameChange {
                    frame: 1,
                    animating: true
                },
                FrameChange {
                    frame: 2,
                    animating: true
                },
            ]
        );
    }

    #[test]
    fn test_autoplay_wraps_to_frame_zero() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        player.toggle_play();
        fire(&mut player);
        fire(&mut player);
        fire(&mut player);
        assert_eq!(player.current_frame(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn test_single_frame_autoplay_still_notifies() {
        let mut player = Player::new(Animation::new(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.toggle_play();
        fire(&mut player);

        assert_eq!(player.current_frame(), 0);
        assert_eq!(
            *changes.borrow(),
            vec![FrameChange {
                frame: 0,
                animating: true
            }]
        );
    }

    #[test]
    fn test_stop_discards_inflight_advance() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.toggle_play();
        let token = player.scheduler_mut().fire().unwrap();

        // The timer fired, but the user stops before it is delivered.
        player.toggle_play();
        player.advance(token);

        assert_eq!(player.current_frame(), 0);
        assert!(!player.is_playing());
        assert!(changes.borrow().is_empty());
        assert_eq!(player.scheduler_mut().fire(), None);
    }

    #[test]
    fn test_restart_discards_previous_session_token() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());

        player.toggle_play();
        let stale = player.scheduler_mut().fire().unwrap();
        player.toggle_play();
        player.toggle_play();

        // The restarted session has its own pending advance; the stale
        // token from the first session must do nothing.
        player.advance(stale);
        assert_eq!(player.current_frame(), 0);

        fire(&mut player);
        assert_eq!(player.current_frame(), 1);
    }

    #[test]
    fn test_set_frame_clamps_and_notifies_on_move_only() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.set_frame(99);
        assert_eq!(player.current_frame(), 2);

        player.set_frame(99);
        assert_eq!(changes.borrow().len(), 1);
        assert_eq!(
            changes.borrow()[0],
            FrameChange {
                frame: 2,
                animating: false
            }
        );
    }

    #[test]
    fn test_navigation_saturates_at_both_ends() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.previous_frame();
        assert_eq!(player.current_frame(), 0);
        assert!(changes.borrow().is_empty());

        player.next_frame();
        player.next_frame();
        player.next_frame();
        player.next_frame();
        assert_eq!(player.current_frame(), 2);
        assert_eq!(changes.borrow().len(), 2);
    }

    #[test]
    fn test_append_keeps_pointer() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        player.set_frame(2);
        player.append_frame();
        assert_eq!(player.current_frame(), 2);
        assert_eq!(player.animation().frame_count(), 4);
    }

    #[test]
    fn test_remove_last_frame_clamps_pointer() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.set_frame(2);
        player.remove_last_frame();
        assert_eq!(player.current_frame(), 1);
        assert_eq!(player.animation().frame_count(), 2);

        player.remove_last_frame();
        player.remove_last_frame();
        assert_eq!(player.animation().frame_count(), 1);
        assert_eq!(player.current_frame(), 0);

        assert_eq!(
            *changes.borrow(),
            vec![
                FrameChange {
                    frame: 2,
                    animating: false
                },
                FrameChange {
                    frame: 1,
                    animating: false
                },
                FrameChange {
                    frame: 0,
                    animating: false
                },
            ]
        );
    }

    #[test]
    fn test_replace_animation_stops_playback_and_resets() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        let changes = record_changes(&mut player);

        player.set_frame(2);
        player.toggle_play();
        changes.borrow_mut().clear();

        let mut incoming = Animation::new();
        incoming.name = Some("Next".into());
        let previous = player.replace_animation(incoming);

        assert_eq!(previous.frame_count(), 3);
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 0);
        assert_eq!(player.animation().name.as_deref(), Some("Next"));
        assert_eq!(player.scheduler_mut().fire(), None);
        assert_eq!(
            *changes.borrow(),
            vec![FrameChange {
                frame: 0,
                animating: false
            }]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());

        let log: Rc<RefCell<Vec<FrameChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let id = player.subscribe(move |change| sink.borrow_mut().push(change));

        player.set_frame(1);
        player.unsubscribe(id);
        player.set_frame(2);

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_voxel_edits_go_to_current_frame() {
        let mut player = Player::new(three_frame_animation(), ManualScheduler::new());
        player.set_frame(1);
        player.set_voxel(3, 4, 5, Some(Rgb::new(90, 90, 90))).unwrap();

        assert_eq!(
            player.animation().frames()[1].voxel(3, 4, 5),
            Some(Rgb::new(90, 90, 90))
        );
        assert!(player.animation().frames()[0].is_blank());

        player.set_duration(0.3).unwrap();
        assert_eq!(player.animation().duration(1), Some(0.3));
    }
}
