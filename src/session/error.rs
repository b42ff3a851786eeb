//! Session error type.

use thiserror::Error;

use crate::ascii::AsciiError;
use crate::camera::CameraError;
use crate::still::DecodeError;

/// Errors surfaced by session transitions.
///
/// Whenever one of these is returned from a transition, the session is left
/// in the state it had before the call.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Pipeline error: {0}")]
    Ascii(#[from] AsciiError),
}
