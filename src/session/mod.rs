//! Session state machine.
//!
//! - `LIVE -> FROZEN` via `freeze` (camera paused, newest snapshot kept)
//! - `FROZEN -> LIVE` via `freeze` again or `unfreeze` (camera resumed)
//! - `* -> UPLOADED` via `upload` (camera paused, frozen snapshot dropped)
//! - `UPLOADED -> FROZEN` via `freeze`
//! - `UPLOADED -> LIVE` via `back_to_camera`

mod error;
mod machine;
mod state;

pub use error::SessionError;
pub use machine::{Session, SessionOptions};
pub use state::{SessionState, StateKind};
