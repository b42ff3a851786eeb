//! Background capture thread implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ascii::reduce;
use crate::camera::{prepare_live_frame, CameraError, FrameSource};

use super::slot::{FrameOrigin, LatestSlot, SharedGranularity, Snapshot};

/// Reply channel for commands that must complete before the caller continues.
pub type Ack = Sender<Result<(), CameraError>>;

/// Commands sent to the capture thread.
pub enum CaptureCommand {
    /// Stop reading and release the device, then wait for `Resume` or `Stop`.
    Pause(Ack),
    /// Re-acquire the device and start reading again.
    Resume(Ack),
    /// Close the device and exit.
    Stop,
}

/// State the capture thread shares with its coordinator.
pub struct LoopContext {
    pub slot: LatestSlot,
    pub granularity: SharedGranularity,
    pub stop: Arc<AtomicBool>,
    pub interval: Duration,
}

/// Run the capture loop in a background thread.
///
/// Opens the source, reports the outcome on `info_tx`, then reads one frame
/// per tick until stopped. Ticks that fall behind are skipped, not replayed.
pub fn run_capture_loop<S: FrameSource>(
    mut source: S,
    ctx: LoopContext,
    rx: Receiver<CaptureCommand>,
    info_tx: Sender<Result<(), CameraError>>,
) {
    let mut handle = match source.open() {
        Ok(handle) => handle,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };
    let _ = info_tx.send(Ok(()));
    log::info!("Capture started on {}", source.name());

    let mut next_tick = Instant::now();
    loop {
        if ctx.stop.load(Ordering::Relaxed) {
            break;
        }

        // Sleep until the next tick while staying responsive to commands
        let timeout = next_tick.saturating_duration_since(Instant::now());
        match rx.recv_timeout(timeout) {
            Ok(CaptureCommand::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(CaptureCommand::Resume(ack)) => {
                // Already running
                let _ = ack.send(Ok(()));
                continue;
            }
            Ok(CaptureCommand::Pause(ack)) => {
                let paused = source.pause(&mut handle);
                if let Err(e) = &paused {
                    log::warn!("Pausing {} failed: {}", source.name(), e);
                }
                let _ = ack.send(paused);
                log::info!("Capture paused on {}", source.name());

                match wait_for_resume(&mut source, handle, &rx) {
                    Some(resumed) => {
                        handle = resumed;
                        next_tick = Instant::now();
                        continue;
                    }
                    None => return,
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
        }

        let now = Instant::now();
        next_tick += ctx.interval;
        if next_tick < now {
            next_tick = now;
        }

        capture_tick(&mut source, &mut handle, &ctx);
    }

    if let Err(e) = source.close(handle) {
        log::warn!("Closing {} failed: {}", source.name(), e);
    }
    log::info!("Capture stopped on {}", source.name());
}

/// Block until the coordinator resumes or stops a paused source.
///
/// Returns the resumed handle, or `None` once the handle has been closed
/// (or lost to a failed resume) and the thread should exit.
fn wait_for_resume<S: FrameSource>(
    source: &mut S,
    handle: S::Handle,
    rx: &Receiver<CaptureCommand>,
) -> Option<S::Handle> {
    loop {
        match rx.recv() {
            Ok(CaptureCommand::Pause(ack)) => {
                let _ = ack.send(Ok(()));
            }
            Ok(CaptureCommand::Resume(ack)) => {
                return match source.resume(handle) {
                    Ok(resumed) => {
                        log::info!("Capture resumed on {}", source.name());
                        let _ = ack.send(Ok(()));
                        Some(resumed)
                    }
                    Err(e) => {
                        log::error!("Resuming {} failed: {}", source.name(), e);
                        let _ = ack.send(Err(e));
                        None
                    }
                };
            }
            Ok(CaptureCommand::Stop) | Err(_) => {
                if let Err(e) = source.close(handle) {
                    log::warn!("Closing {} failed: {}", source.name(), e);
                }
                log::info!("Capture stopped on {}", source.name());
                return None;
            }
        }
    }
}

/// Read, convert, reduce and publish one frame.
///
/// A failed read leaves the previous snapshot in place.
fn capture_tick<S: FrameSource>(source: &mut S, handle: &mut S::Handle, ctx: &LoopContext) {
    let Some(raw) = source.read_one(handle) else {
        log::debug!("Transient read failure on {}, keeping previous frame", source.name());
        return;
    };

    let frame = match prepare_live_frame(raw, source.mirror()) {
        Ok(frame) => frame,
        Err(e) => {
            log::debug!("Dropping malformed frame from {}: {}", source.name(), e);
            return;
        }
    };

    let granularity = ctx.granularity.get();
    match reduce(&frame, granularity.get()) {
        Ok(reduced) => ctx.slot.publish(Arc::new(Snapshot {
            source: frame,
            preview: reduced.preview,
            blocks: reduced.blocks,
            granularity,
            origin: FrameOrigin::Live,
            created_at: Instant::now(),
        })),
        Err(e) => log::debug!("Skipping frame from {}: {}", source.name(), e),
    }
}
