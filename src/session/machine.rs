//! The session state machine: arbitrates between live, frozen and uploaded
//! sources and owns the acquisition coordinator.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::ascii::{
    block_dimensions, reduce, to_glyph_grid, AsciiError, BlockGrid, Frame, GlyphGrid, GlyphRamp,
    Granularity,
};
use crate::camera::FrameSource;
use crate::coordinator::{Coordinator, FrameOrigin, Snapshot, DEFAULT_FPS};
use crate::still::{self, DEFAULT_MAX_SIDE};

use super::error::SessionError;
use super::state::{SessionState, StateKind};

/// Startup parameters for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub granularity: Granularity,
    pub ramp: GlyphRamp,
    pub hide_image: bool,
    /// Target producer cadence
    pub fps: u32,
    /// Longer-side bound for uploads
    pub max_side: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            ramp: GlyphRamp::default(),
            hide_image: false,
            fps: DEFAULT_FPS,
            max_side: DEFAULT_MAX_SIDE,
        }
    }
}

/// A running glyph-art session.
///
/// Starts `LIVE`. Only the transition methods below change the state, and
/// a transition that fails leaves the previous state in place.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    granularity: Granularity,
    ramp: GlyphRamp,
    hide_image: bool,
    max_side: u32,
    coordinator: Coordinator,
}

impl Session {
    /// Open `source` and start in `LIVE`.
    ///
    /// # Errors
    /// * `SessionError::Camera` - the source could not be opened
    pub fn start<S: FrameSource>(source: S, options: SessionOptions) -> Result<Self, SessionError> {
        let coordinator = Coordinator::start(source, options.fps, options.granularity)?;
        log::info!(
            "Session started on {} (granularity {}, ramp {})",
            coordinator.source_name(),
            options.granularity,
            options.ramp.name()
        );
        Ok(Self {
            state: SessionState::Live,
            granularity: options.granularity,
            ramp: options.ramp,
            hide_image: options.hide_image,
            max_side: options.max_side,
            coordinator,
        })
    }

    // ==================== Transitions ====================

    /// Freeze the current display, or unfreeze if already frozen.
    ///
    /// From `LIVE` the camera is paused and its newest snapshot kept; if no
    /// frame has arrived yet there is nothing to freeze and the session
    /// stays `LIVE`. From `UPLOADED` the upload's snapshot is kept and the
    /// upload discarded. From `FROZEN` this returns to `LIVE`.
    ///
    /// Returns the resulting state.
    pub fn freeze(&mut self) -> Result<StateKind, SessionError> {
        match self.state.kind() {
            StateKind::Frozen => self.unfreeze()?,
            StateKind::Uploaded => {
                if let Some(snapshot) = self.state.pinned().cloned() {
                    self.state = SessionState::Frozen { snapshot };
                    log::info!("Froze uploaded image");
                }
            }
            StateKind::Live => {
                self.suspend_camera();
                match self.coordinator.latest() {
                    Some(snapshot) => {
                        self.state = SessionState::Frozen { snapshot };
                        log::info!("Froze live frame");
                    }
                    None => {
                        log::info!("No frame captured yet, staying live");
                        self.coordinator.resume()?;
                    }
                }
            }
        }
        Ok(self.current_state())
    }

    /// Leave `FROZEN` for `LIVE` and resume the camera. No-op in other states.
    ///
    /// # Errors
    /// * `SessionError::Camera` - the camera could not be re-acquired (the
    ///   session is `LIVE` but will not receive frames)
    pub fn unfreeze(&mut self) -> Result<(), SessionError> {
        if self.state.kind() != StateKind::Frozen {
            return Ok(());
        }
        self.go_live()?;
        log::info!("Unfroze, back to live");
        Ok(())
    }

    /// Decode `path` and switch to `UPLOADED`.
    ///
    /// The camera is paused while the upload is displayed and any frozen
    /// snapshot is discarded.
    ///
    /// # Errors
    /// * `SessionError::Decode` - the file could not be decoded; state unchanged
    pub fn upload(&mut self, path: &Path) -> Result<(), SessionError> {
        let frame = still::decode(path, self.max_side)?;
        self.upload_frame(frame)?;
        log::info!("Uploaded {}", path.display());
        Ok(())
    }

    /// Switch to `UPLOADED` with an already decoded grayscale still.
    ///
    /// # Errors
    /// * `SessionError::Ascii` - the frame has zero area; state unchanged
    pub fn upload_frame(&mut self, original: Frame) -> Result<(), SessionError> {
        let current = build_snapshot(original.clone(), self.granularity, FrameOrigin::Still)?;
        if self.state.kind() == StateKind::Live {
            self.suspend_camera();
        }
        self.state = SessionState::Uploaded {
            original,
            current: Arc::clone(&current),
        };
        self.coordinator.slot().publish(current);
        Ok(())
    }

    /// Drop the upload and return to the live camera. No-op unless `UPLOADED`.
    ///
    /// # Errors
    /// * `SessionError::Camera` - the camera could not be re-acquired
    pub fn back_to_camera(&mut self) -> Result<(), SessionError> {
        if self.state.kind() != StateKind::Uploaded {
            return Ok(());
        }
        self.go_live()?;
        log::info!("Back to camera");
        Ok(())
    }

    /// Change block coarseness.
    ///
    /// `LIVE` applies it from the next frame; `UPLOADED` and `FROZEN`
    /// re-reduce their stored frame immediately without touching the camera.
    ///
    /// # Errors
    /// * `SessionError::Ascii` - non-finite or non-positive value, or one so
    ///   small the current frame would exceed the block limit; the previous
    ///   granularity is kept
    pub fn set_granularity(&mut self, value: f64) -> Result<(), SessionError> {
        let granularity = Granularity::new(value)?;

        let rebuilt = match &self.state {
            SessionState::Live => {
                // Check against the current camera frame size
                if let Some(latest) = self.coordinator.latest() {
                    block_dimensions(latest.source.width(), latest.source.height(), value)?;
                }
                None
            }
            SessionState::Frozen { snapshot } => Some(build_snapshot(
                snapshot.source.clone(),
                granularity,
                snapshot.origin,
            )?),
            SessionState::Uploaded { original, .. } => Some(build_snapshot(
                original.clone(),
                granularity,
                FrameOrigin::Still,
            )?),
        };

        self.granularity = granularity;
        self.coordinator.set_granularity(granularity);

        if let Some(fresh) = rebuilt {
            match &mut self.state {
                SessionState::Frozen { snapshot } => *snapshot = Arc::clone(&fresh),
                SessionState::Uploaded { current, .. } => *current = Arc::clone(&fresh),
                SessionState::Live => {}
            }
            self.coordinator.slot().publish(fresh);
        }
        log::debug!("Granularity set to {}", granularity);
        Ok(())
    }

    /// Swap the glyph ramp. Blocks are never recomputed for this.
    pub fn set_glyph_ramp(&mut self, ramp: GlyphRamp) {
        log::debug!("Glyph ramp set to {}", ramp.name());
        self.ramp = ramp;
    }

    pub fn set_hide_image(&mut self, hide: bool) {
        self.hide_image = hide;
    }

    /// Flip the hide-image flag, returning the new value.
    pub fn toggle_hide_image(&mut self) -> bool {
        self.hide_image = !self.hide_image;
        self.hide_image
    }

    /// Stop the camera for good.
    pub fn stop(&mut self) {
        self.coordinator.stop();
    }

    // ==================== Queries ====================

    pub fn current_state(&self) -> StateKind {
        self.state.kind()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn glyph_ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Whether the image layer should be hidden beneath the glyphs.
    pub fn hide_image(&self) -> bool {
        self.hide_image
    }

    pub fn is_camera_paused(&self) -> bool {
        self.coordinator.is_paused()
    }

    /// The snapshot currently on display, if any.
    pub fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        match self.state.pinned() {
            Some(snapshot) => Some(Arc::clone(snapshot)),
            None => self.coordinator.latest(),
        }
    }

    pub fn current_preview_frame(&self) -> Option<Frame> {
        self.current_snapshot().map(|s| s.preview.clone())
    }

    pub fn current_blocks(&self) -> Option<BlockGrid> {
        self.current_snapshot().map(|s| s.blocks.clone())
    }

    /// Current blocks mapped through the current ramp.
    pub fn current_glyph_grid(&self) -> Option<GlyphGrid> {
        self.current_snapshot()
            .map(|s| to_glyph_grid(&s.blocks, &self.ramp))
    }

    /// Text transcript of the current glyph grid; empty before the first frame.
    pub fn current_glyph_text(&self) -> String {
        self.current_glyph_grid()
            .map(|grid| grid.to_text())
            .unwrap_or_default()
    }

    // ==================== Internals ====================

    /// Switch to `LIVE`: drop pinned content, clear the stale snapshot and
    /// restart acquisition.
    fn go_live(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Live;
        self.coordinator.slot().clear();
        self.coordinator.resume()?;
        Ok(())
    }

    /// Pause the camera; release failures are logged, not fatal.
    fn suspend_camera(&mut self) {
        if let Err(e) = self.coordinator.pause() {
            log::warn!("Camera pause failed, continuing: {}", e);
        }
    }
}

/// Reduce `source` and wrap the result as a snapshot.
fn build_snapshot(
    source: Frame,
    granularity: Granularity,
    origin: FrameOrigin,
) -> Result<Arc<Snapshot>, AsciiError> {
    let reduced = reduce(&source, granularity.get())?;
    Ok(Arc::new(Snapshot {
        source,
        preview: reduced.preview,
        blocks: reduced.blocks,
        granularity,
        origin,
        created_at: Instant::now(),
    }))
}
