//! Camera types and data structures.

use std::fmt;
use std::time::Instant;

use thiserror::Error;

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Camera resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Tiny resolution (128x56) - plenty for glyph art, the default
    pub const TINY: Resolution = Resolution {
        width: 128,
        height: 56,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::TINY
    }
}

/// Channel layout of a raw frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// R, G, B (3 bytes per pixel)
    Rgb,
    /// B, G, R (3 bytes per pixel)
    Bgr,
    /// Single luminance byte per pixel
    Gray,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Gray => 1,
        }
    }
}

/// A frame as delivered by a source, before grayscale conversion.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Raw pixel data, row-major, in `format` channel order
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl RawFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Requested capture resolution
    pub resolution: Resolution,
    /// Target FPS for the acquisition loop
    pub fps: u32,
    /// Mirror horizontally (selfie mode)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
            mirror: true,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Source could not be opened at startup
    #[error("Cannot open camera: {0}")]
    CannotOpen(String),

    /// No cameras found on the system
    #[error("No cameras found")]
    NoDevices,

    /// Failed to query camera devices
    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),

    /// Camera permission denied (macOS/iOS)
    #[error("Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera")]
    PermissionDenied,

    /// Camera device not found at specified index
    #[error("Camera device {0} not found. Run 'list-cameras' to see available devices")]
    DeviceNotFound(u32),

    /// Failed to start or restart the video stream
    #[error("Failed to start camera stream: {0}")]
    StreamFailed(String),

    /// Failed to pause or close the stream
    #[error("Failed to release camera: {0}")]
    ReleaseFailed(String),

    /// Capture thread is gone
    #[error("Capture thread is not running")]
    NotRunning,
}
