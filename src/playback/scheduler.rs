//! Scheduling seam for autoplay advances.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Ticket for one scheduled advance. The player stamps each token with
/// its play-session generation and discards tokens from sessions that
/// have since been stopped or restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceToken {
    pub(crate) generation: u64,
}

/// Something that can fire one pending advance after a delay.
///
/// At most one advance is pending per scheduler; scheduling again
/// replaces the previous one.
pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration, token: AdvanceToken);
    fn cancel(&mut self);
}

/// Scheduler whose pending advance fires only when the caller says so.
/// This keeps playback tests free of real clocks.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Option<(Duration, AdvanceToken)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay of the pending advance, if any.
    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.map(|(delay, _)| delay)
    }

    /// Take the pending advance, as if its timer had elapsed.
    pub fn fire(&mut self) -> Option<AdvanceToken> {
        self.pending.take().map(|(_, token)| token)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration, token: AdvanceToken) {
        self.pending = Some((delay, token));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

enum Command {
    Schedule(Duration, AdvanceToken),
    Cancel,
}

/// Real-time scheduler backed by a dedicated timer thread.
///
/// Fired tokens arrive on the receiver returned by [`TimerScheduler::new`];
/// the host loop forwards each one to [`Player::advance`], which itself
/// rejects tokens made stale by a stop or restart in the meantime.
///
/// [`Player::advance`]: super::Player::advance
pub struct TimerScheduler {
    commands: Sender<Command>,
}

impl TimerScheduler {
    /// Start the timer thread. The thread exits when either end of the
    /// pair is dropped.
    pub fn new() -> (Self, Receiver<AdvanceToken>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (fire_tx, fire_rx) = mpsc::channel();
        thread::spawn(move || run_timer(command_rx, fire_tx));
        (Self { commands: command_tx }, fire_rx)
    }
}

impl Scheduler for TimerScheduler {
    fn schedule_once(&mut self, delay: Duration, token: AdvanceToken) {
        let _ = self.commands.send(Command::Schedule(delay, token));
    }

    fn cancel(&mut self) {
        let _ = self.commands.send(Command::Cancel);
    }
}

fn run_timer(commands: Receiver<Command>, fire: Sender<AdvanceToken>) {
    let mut pending: Option<(Instant, AdvanceToken)> = None;
    loop {
        match pending {
            None => match commands.recv() {
                Ok(Command::Schedule(delay, token)) => {
                    pending = Some((Instant::now() + delay, token));
                }
                Ok(Command::Cancel) => {}
                Err(_) => return,
            },
            Some((deadline, token)) => {
                let now = Instant::now();
                if now >= deadline {
                    pending = None;
                    if fire.send(token).is_err() {
                        return;
                    }
                    continue;
                }
                match commands.recv_timeout(deadline - now) {
                    Ok(Command::Schedule(delay, replacement)) => {
                        pending = Some((Instant::now() + delay, replacement));
                    }
                    Ok(Command::Cancel) => pending = None,
                    Err(RecvTimeoutError::Timeout) => {
                        pending = None;
                        if fire.send(token).is_err() {
                            return;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        }
    }
}
