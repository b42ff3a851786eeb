//! Deterministic test-pattern source.
//!
//! Produces a diagonal RGB gradient that shifts a little every frame. Used by
//! tests and by `glyphcam live --synthetic` on machines without a camera.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::source::FrameSource;
use super::types::{CameraError, PixelFormat, RawFrame, Resolution};

/// Call counters shared between a [`SyntheticSource`] and whoever watches it.
#[derive(Debug, Default)]
pub struct SourceStats {
    pub opens: AtomicUsize,
    pub reads: AtomicUsize,
    pub pauses: AtomicUsize,
    pub resumes: AtomicUsize,
    pub closes: AtomicUsize,
    /// Reads attempted while the handle was paused. Should stay at zero.
    pub reads_while_paused: AtomicUsize,
    /// When set, every read fails as a transient error.
    pub fail_reads: AtomicBool,
}

impl SourceStats {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

/// Handle for an opened synthetic source.
#[derive(Debug)]
pub struct SyntheticHandle {
    frame_index: u64,
    paused: bool,
}

/// A camera stand-in that needs no hardware.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    resolution: Resolution,
    mirror: bool,
    fail_open: bool,
    stats: Arc<SourceStats>,
}

impl SyntheticSource {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            mirror: true,
            fail_open: false,
            stats: Arc::new(SourceStats::default()),
        }
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Make `open` fail, simulating a missing device.
    pub fn unavailable(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn stats(&self) -> Arc<SourceStats> {
        Arc::clone(&self.stats)
    }

    /// The RGB frame this source yields at `frame_index`.
    pub fn pattern(resolution: Resolution, frame_index: u64) -> RawFrame {
        let Resolution { width, height } = resolution;
        let span = (width + height).max(1) as u64;
        let shift = frame_index * 4;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height as u64 {
            for x in 0..width as u64 {
                let v = (((x + y + shift) % span) * 255 / span) as u8;
                data.extend_from_slice(&[v, v, 255 - v]);
            }
        }
        RawFrame::new(data, width, height, PixelFormat::Rgb)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(Resolution::default())
    }
}

impl FrameSource for SyntheticSource {
    type Handle = SyntheticHandle;

    fn open(&mut self) -> Result<Self::Handle, CameraError> {
        if self.fail_open {
            return Err(CameraError::CannotOpen(
                "synthetic source marked unavailable".to_string(),
            ));
        }
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        Ok(SyntheticHandle {
            frame_index: 0,
            paused: false,
        })
    }

    fn read_one(&mut self, handle: &mut Self::Handle) -> Option<RawFrame> {
        self.stats.reads.fetch_add(1, Ordering::SeqCst);
        if handle.paused {
            self.stats.reads_while_paused.fetch_add(1, Ordering::SeqCst);
            return None;
        }
        if self.stats.fail_reads.load(Ordering::SeqCst) {
            return None;
        }
        let frame = Self::pattern(self.resolution, handle.frame_index);
        handle.frame_index += 1;
        Some(frame)
    }

    fn pause(&mut self, handle: &mut Self::Handle) -> Result<(), CameraError> {
        self.stats.pauses.fetch_add(1, Ordering::SeqCst);
        handle.paused = true;
        Ok(())
    }

    fn resume(&mut self, mut handle: Self::Handle) -> Result<Self::Handle, CameraError> {
        self.stats.resumes.fetch_add(1, Ordering::SeqCst);
        handle.paused = false;
        Ok(handle)
    }

    fn close(&mut self, _handle: Self::Handle) -> Result<(), CameraError> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn mirror(&self) -> bool {
        self.mirror
    }

    fn name(&self) -> String {
        format!(
            "synthetic {}x{}",
            self.resolution.width, self.resolution.height
        )
    }
}
