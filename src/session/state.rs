//! Session states and their payloads.

use std::fmt;
use std::sync::Arc;

use crate::ascii::Frame;
use crate::coordinator::Snapshot;

/// Which source drives the pipeline, with whatever that source needs.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Fresh camera frames every tick
    #[default]
    Live,

    /// Display held on a captured snapshot
    Frozen {
        /// Snapshot captured when the freeze happened (re-reduced on granularity changes)
        snapshot: Arc<Snapshot>,
    },

    /// Display driven by an uploaded still
    Uploaded {
        /// Decoded, bounded grayscale upload
        original: Frame,
        /// Reduction of `original` at the current granularity
        current: Arc<Snapshot>,
    },
}

impl SessionState {
    pub fn kind(&self) -> StateKind {
        match self {
            SessionState::Live => StateKind::Live,
            SessionState::Frozen { .. } => StateKind::Frozen,
            SessionState::Uploaded { .. } => StateKind::Uploaded,
        }
    }

    /// The snapshot this state pins, if it pins one.
    pub fn pinned(&self) -> Option<&Arc<Snapshot>> {
        match self {
            SessionState::Live => None,
            SessionState::Frozen { snapshot } => Some(snapshot),
            SessionState::Uploaded { current, .. } => Some(current),
        }
    }
}

/// Payload-free state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateKind {
    #[default]
    Live,
    Frozen,
    Uploaded,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Live => write!(f, "LIVE"),
            StateKind::Frozen => write!(f, "FROZEN"),
            StateKind::Uploaded => write!(f, "UPLOADED"),
        }
    }
}
