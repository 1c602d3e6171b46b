//! One-shot background execution of codec work.
//!
//! Encoding and decoding scan every voxel of every frame, so they run
//! on a worker thread and hand their result back through a channel the
//! owning context polls. A job delivers exactly once or, if cancelled,
//! never.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use log::debug;

use crate::model::Animation;

use super::RasterError;
use super::codec;

/// Handle to a codec job running off the caller's thread.
///
/// Dropping the handle cancels the job cooperatively; a cancelled job
/// delivers no result.
pub struct Task<T> {
    rx: Receiver<T>,
    cancelled: Arc<AtomicBool>,
}

impl<T> Task<T> {
    /// Run `job` on a worker thread. A job returning `None` (it saw the
    /// cancel flag) delivers nothing.
    fn spawn<F>(job: F) -> Self
    where
        T: Send + 'static,
        F: FnOnce(&AtomicBool) -> Option<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        thread::spawn(move || {
            if let Some(result) = job(&flag) {
                if !flag.load(Ordering::Relaxed) {
                    let _ = tx.send(result);
                }
            }
        });
        Self { rx, cancelled }
    }

    /// Non-blocking check; `None` until the job has delivered.
    pub fn poll(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Block until the job delivers. `None` means it was cancelled.
    pub fn wait(self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Encode a snapshot of `animation` off-thread.
///
/// The clone taken here decouples the job from later edits to the
/// animation being encoded.
pub fn encode_in_background(animation: &Animation) -> Task<Result<Vec<u8>, RasterError>> {
    let snapshot = animation.clone();
    Task::spawn(move |_cancelled| Some(codec::encode(&snapshot)))
}

/// Encode a snapshot of `animation` and write it to `path` off-thread.
pub fn encode_to_file_in_background(
    animation: &Animation,
    path: PathBuf,
) -> Task<Result<u64, RasterError>> {
    let snapshot = animation.clone();
    Task::spawn(move |cancelled| {
        let bytes = match codec::encode(&snapshot) {
            Ok(bytes) => bytes,
            Err(err) => return Some(Err(err)),
        };
        if cancelled.load(Ordering::Relaxed) {
            debug!("save of {} cancelled before write", path.display());
            return None;
        }
        Some(codec::write_container(&bytes, &path))
    })
}

/// Decode container bytes off-thread.
pub fn decode_in_background(
    bytes: Vec<u8>,
    source: Option<String>,
) -> Task<Result<Animation, RasterError>> {
    Task::spawn(move |_cancelled| Some(codec::decode(&bytes, source.as_deref())))
}

/// Read and decode a stored animation off-thread.
pub fn read_animation_in_background(path: PathBuf) -> Task<Result<Animation, RasterError>> {
    Task::spawn(move |cancelled| {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => return Some(Err(err.into())),
        };
        if cancelled.load(Ordering::Relaxed) {
            debug!("load of {} cancelled before decode", path.display());
            return None;
        }
        Some(codec::decode_file_contents(&bytes, &path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;

    #[test]
    fn test_background_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.lca");

        let mut animation = Animation::new();
        animation
            .set_voxel(0, 4, 4, 4, Some(Rgb::new(255, 128, 64)))
            .unwrap();

        let written = encode_to_file_in_background(&animation, path.clone())
            .wait()
            .unwrap()
            .unwrap();
        assert!(written > 0);

        let loaded = read_animation_in_background(path).wait().unwrap().unwrap();
        assert_eq!(loaded.frames(), animation.frames());
        assert_eq!(loaded.name.as_deref(), Some("pulse"));
    }

    #[test]
    fn test_background_encode_then_decode() {
        let animation = Animation::new();

        let bytes = encode_in_background(&animation).wait().unwrap().unwrap();
        let decoded = decode_in_background(bytes, Some("Glow.lca".into()))
            .wait()
            .unwrap()
            .unwrap();

        assert_eq!(decoded.frame_count(), 1);
        assert_eq!(decoded.name.as_deref(), Some("Glow"));
    }

    #[test]
    fn test_poll_is_non_blocking() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let task = Task::spawn(move |_cancelled| {
            gate_rx.recv().ok();
            Some(7)
        });

        assert_eq!(task.poll(), None);
        gate_tx.send(()).unwrap();
        assert_eq!(task.wait(), Some(7));
    }

    #[test]
    fn test_cancelled_job_delivers_nothing() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let task = Task::spawn(move |cancelled: &AtomicBool| {
            gate_rx.recv().ok();
            if cancelled.load(Ordering::Relaxed) {
                None
            } else {
                Some(1)
            }
        });

        task.cancel();
        gate_tx.send(()).unwrap();
        assert_eq!(task.wait(), None);
    }

    #[test]
    fn test_drop_requests_cancellation() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (seen_tx, seen_rx) = mpsc::channel();
        let task = Task::spawn(move |cancelled: &AtomicBool| {
            gate_rx.recv().ok();
            seen_tx.send(cancelled.load(Ordering::Relaxed)).ok();
            None::<u8>
        });

        drop(task);
        gate_tx.send(()).unwrap();
        assert!(seen_rx.recv().unwrap());
    }
}
