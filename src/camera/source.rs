//! The frame source contract consumed by the acquisition coordinator.

use super::types::{CameraError, RawFrame};

/// A producer of raw frames, typically a camera.
///
/// The source value itself is moved onto the capture thread; the handle is
/// created there by [`open`](FrameSource::open) and never leaves that
/// thread, so hardware handles that are not `Send` are fine.
pub trait FrameSource: Send + 'static {
    /// Live hardware (or simulated) handle.
    type Handle;

    /// Acquire the device. Failure here is fatal for the session.
    fn open(&mut self) -> Result<Self::Handle, CameraError>;

    /// Read one frame. `None` means the stream ended or this read failed;
    /// the caller simply tries again on its next tick.
    fn read_one(&mut self, handle: &mut Self::Handle) -> Option<RawFrame>;

    /// Release the device without dropping the handle.
    fn pause(&mut self, handle: &mut Self::Handle) -> Result<(), CameraError>;

    /// Re-acquire a paused device.
    fn resume(&mut self, handle: Self::Handle) -> Result<Self::Handle, CameraError>;

    /// Release the device for good.
    fn close(&mut self, handle: Self::Handle) -> Result<(), CameraError>;

    /// Whether frames should be mirrored horizontally before processing.
    fn mirror(&self) -> bool {
        true
    }

    /// Short label for logs.
    fn name(&self) -> String {
        "camera".to_string()
    }
}
