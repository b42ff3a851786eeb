//! Frame acquisition coordinator.
//!
//! Runs a frame source on its own thread at a fixed cadence and keeps only
//! the newest processed result in a [`LatestSlot`]. Consumers read the slot
//! whenever they like and never wait on the source.

mod capture_loop;
mod slot;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::ascii::Granularity;
use crate::camera::{CameraError, FrameSource};

use capture_loop::{run_capture_loop, Ack, CaptureCommand, LoopContext};
pub use slot::{FrameOrigin, LatestSlot, SharedGranularity, Snapshot};

/// Default producer cadence.
pub const DEFAULT_FPS: u32 = 30;

/// Handle on a running capture thread.
///
/// Dropping the coordinator stops the thread and closes the source.
pub struct Coordinator {
    /// Newest snapshot (shared with capture thread)
    slot: LatestSlot,
    /// Granularity the capture thread reduces with
    granularity: SharedGranularity,
    /// Capture thread handle
    capture_thread: Option<JoinHandle<()>>,
    /// Channel to send commands to capture thread
    command_tx: Option<Sender<CaptureCommand>>,
    /// Signal to stop capture thread
    stop_signal: Arc<AtomicBool>,
    paused: bool,
    source_name: String,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("source", &self.source_name)
            .field("paused", &self.paused)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// Open `source` on a new capture thread and start producing snapshots.
    ///
    /// Returns once the source has been opened.
    ///
    /// # Errors
    /// * `CameraError::CannotOpen` (or whatever `open` reports) - the source is unavailable
    /// * `CameraError::StreamFailed` - the capture thread died during startup
    pub fn start<S: FrameSource>(
        source: S,
        fps: u32,
        granularity: Granularity,
    ) -> Result<Self, CameraError> {
        let slot = LatestSlot::new();
        let shared = SharedGranularity::new(granularity);
        let stop_signal = Arc::new(AtomicBool::new(false));
        let source_name = source.name();

        let (tx, rx) = mpsc::channel();
        let (info_tx, info_rx) = mpsc::channel::<Result<(), CameraError>>();

        let ctx = LoopContext {
            slot: slot.clone(),
            granularity: shared.clone(),
            stop: Arc::clone(&stop_signal),
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        };
        let handle = std::thread::Builder::new()
            .name("glyphcam-capture".to_string())
            .spawn(move || run_capture_loop(source, ctx, rx, info_tx))
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        // Wait for the thread to report success or failure
        match info_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                slot,
                granularity: shared,
                capture_thread: Some(handle),
                command_tx: Some(tx),
                stop_signal,
                paused: false,
                source_name,
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(CameraError::StreamFailed(
                    "Capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// The slot snapshots are published into.
    pub fn slot(&self) -> &LatestSlot {
        &self.slot
    }

    /// Newest snapshot, if any.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.slot.latest()
    }

    /// Granularity applied from the next tick on.
    pub fn set_granularity(&self, granularity: Granularity) {
        self.granularity.set(granularity);
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity.get()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend acquisition and release the device.
    ///
    /// Returns only after the capture thread has stopped reading, so no
    /// snapshot is published after this call until [`resume`](Self::resume).
    /// Pausing twice is a no-op.
    ///
    /// # Errors
    /// * `CameraError::ReleaseFailed` - the source could not release the device
    ///   (acquisition is still suspended)
    /// * `CameraError::NotRunning` - the capture thread has exited
    pub fn pause(&mut self) -> Result<(), CameraError> {
        if self.paused {
            return Ok(());
        }
        let result = self.request(CaptureCommand::Pause);
        if !matches!(result, Err(CameraError::NotRunning)) {
            self.paused = true;
        }
        result
    }

    /// Re-acquire the device and resume acquisition from now on.
    ///
    /// Frames missed while paused are not replayed. Resuming a running
    /// coordinator is a no-op.
    ///
    /// # Errors
    /// * `CameraError::StreamFailed` - the device could not be re-acquired;
    ///   the capture thread exits
    /// * `CameraError::NotRunning` - the capture thread has exited
    pub fn resume(&mut self) -> Result<(), CameraError> {
        if !self.paused {
            return Ok(());
        }
        let result = self.request(CaptureCommand::Resume);
        match &result {
            Ok(()) => self.paused = false,
            Err(_) => self.join_thread(),
        }
        result
    }

    /// Stop the capture thread and close the source.
    ///
    /// Waits for the thread to finish.
    pub fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);

        // Also send stop command via channel (thread may be parked while paused)
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(CaptureCommand::Stop);
        }
        self.join_thread();
    }

    /// Check if the capture thread is currently running.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Send a command and wait for the capture thread to acknowledge it.
    fn request(&self, command: fn(Ack) -> CaptureCommand) -> Result<(), CameraError> {
        let tx = self.command_tx.as_ref().ok_or(CameraError::NotRunning)?;
        let (ack_tx, ack_rx) = mpsc::channel();
        tx.send(command(ack_tx)).map_err(|_| CameraError::NotRunning)?;
        ack_rx.recv().map_err(|_| CameraError::NotRunning)?
    }

    fn join_thread(&mut self) {
        if let Some(handle) = self.capture_thread.take() {
            if handle.join().is_err() {
                log::error!("Capture thread for {} panicked", self.source_name);
            }
        }
        self.command_tx = None;
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{SourceStats, SyntheticSource};
    use std::thread;
    use std::time::Instant;

    fn wait_for_frame(coordinator: &Coordinator) -> Arc<Snapshot> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(snapshot) = coordinator.latest() {
                return snapshot;
            }
            assert!(Instant::now() < deadline, "no frame published");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_publishes_frames() {
        let source = SyntheticSource::default();
        let coordinator = Coordinator::start(source, 60, Granularity::default()).unwrap();
        let snapshot = wait_for_frame(&coordinator);
        assert_eq!(snapshot.origin, FrameOrigin::Live);
        assert_eq!((snapshot.blocks.width(), snapshot.blocks.height()), (8, 2));
    }

    #[test]
    fn test_start_reports_open_failure() {
        let source = SyntheticSource::default().unavailable();
        let result = Coordinator::start(source, 30, Granularity::default());
        assert!(matches!(result, Err(CameraError::CannotOpen(_))));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let source = SyntheticSource::default();
        let stats = source.stats();
        let mut coordinator = Coordinator::start(source, 60, Granularity::default()).unwrap();
        coordinator.pause().unwrap();
        coordinator.pause().unwrap();
        assert!(coordinator.is_paused());
        assert_eq!(SourceStats::count(&stats.pauses), 1);
        coordinator.resume().unwrap();
        coordinator.resume().unwrap();
        assert_eq!(SourceStats::count(&stats.resumes), 1);
    }

    #[test]
    fn test_stop_closes_source() {
        let source = SyntheticSource::default();
        let stats = source.stats();
        let mut coordinator = Coordinator::start(source, 60, Granularity::default()).unwrap();
        coordinator.stop();
        assert!(!coordinator.is_running());
        assert_eq!(SourceStats::count(&stats.closes), 1);
    }

    #[test]
    fn test_stop_while_paused() {
        let source = SyntheticSource::default();
        let stats = source.stats();
        let mut coordinator = Coordinator::start(source, 60, Granularity::default()).unwrap();
        coordinator.pause().unwrap();
        drop(coordinator);
        assert_eq!(SourceStats::count(&stats.closes), 1);
    }

    #[test]
    fn test_pause_after_stop_reports_not_running() {
        let source = SyntheticSource::default();
        let mut coordinator = Coordinator::start(source, 60, Granularity::default()).unwrap();
        coordinator.stop();
        assert_eq!(coordinator.pause(), Err(CameraError::NotRunning));
        assert!(!coordinator.is_paused());
    }
}
