//! Frame sources: the contract, conversions, and concrete cameras.
//!
//! - [`FrameSource`] is what the acquisition coordinator drives
//! - [`SyntheticSource`] generates a moving test pattern
//! - `HardwareSource` and `list_devices` wrap nokhwa (`camera` feature)
//! - [`prepare_live_frame`] mirrors and converts raw frames to grayscale

mod frame_utils;
#[cfg(feature = "camera")]
mod hardware;
mod source;
mod synthetic;
mod types;

pub use frame_utils::{mirror_horizontal, prepare_live_frame, to_grayscale};
#[cfg(feature = "camera")]
pub use hardware::{list_devices, HardwareSource};
pub use source::FrameSource;
pub use synthetic::{SourceStats, SyntheticHandle, SyntheticSource};
pub use types::{CameraError, CameraInfo, CameraSettings, PixelFormat, RawFrame, Resolution};
