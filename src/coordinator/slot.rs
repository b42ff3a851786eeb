//! Single-value "latest snapshot" cell shared by producers and the renderer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::ascii::{BlockGrid, Frame, Granularity};

/// Where a snapshot's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    /// Live frame source
    Live,
    /// Uploaded still image
    Still,
}

/// One fully formed pipeline result.
///
/// Snapshots are immutable once published and shared by `Arc`, so a reader
/// always sees a matching preview/blocks pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Grayscale input the blocks were computed from
    pub source: Frame,
    /// Blocky full-size preview
    pub preview: Frame,
    /// Block intensities
    pub blocks: BlockGrid,
    /// Granularity used for `blocks`
    pub granularity: Granularity,
    pub origin: FrameOrigin,
    pub created_at: Instant,
}

/// Overwrite-on-write slot holding the newest [`Snapshot`].
///
/// Writers build the snapshot first and only take the lock to swap the
/// pointer; readers clone the `Arc` and never wait on a producer's work.
#[derive(Debug, Clone, Default)]
pub struct LatestSlot {
    inner: Arc<Mutex<Option<Arc<Snapshot>>>>,
    generation: Arc<AtomicU64>,
}

impl LatestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot (last writer wins).
    pub fn publish(&self, snapshot: Arc<Snapshot>) {
        match self.inner.lock() {
            Ok(mut slot) => {
                *slot = Some(snapshot);
                self.generation.fetch_add(1, Ordering::SeqCst);
            }
            Err(_) => log::error!("Latest-snapshot lock poisoned, dropping publish"),
        }
    }

    /// The newest snapshot, if any has been published.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        let slot = self.inner.lock().ok()?;
        slot.clone()
    }

    /// Forget the current snapshot.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Incremented on every publish or clear.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Granularity shared with the capture thread, stored as `f64` bits.
#[derive(Debug, Clone)]
pub struct SharedGranularity(Arc<AtomicU64>);

impl SharedGranularity {
    pub fn new(granularity: Granularity) -> Self {
        Self(Arc::new(AtomicU64::new(granularity.get().to_bits())))
    }

    pub fn set(&self, granularity: Granularity) {
        self.0.store(granularity.get().to_bits(), Ordering::SeqCst);
    }

    pub fn get(&self) -> Granularity {
        // Only validated values are ever stored
        Granularity::new(f64::from_bits(self.0.load(Ordering::SeqCst))).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::reduce;

    fn snapshot(value: u8) -> Arc<Snapshot> {
        let source = Frame::filled(6, 5, value);
        let reduced = reduce(&source, 1.0).unwrap();
        Arc::new(Snapshot {
            source,
            preview: reduced.preview,
            blocks: reduced.blocks,
            granularity: Granularity::new(1.0).unwrap(),
            origin: FrameOrigin::Live,
            created_at: Instant::now(),
        })
    }

    #[test]
    fn test_empty_slot() {
        let slot = LatestSlot::new();
        assert!(slot.latest().is_none());
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn test_last_writer_wins() {
        let slot = LatestSlot::new();
        slot.publish(snapshot(1));
        slot.publish(snapshot(2));
        let latest = slot.latest().unwrap();
        assert_eq!(latest.source.data()[0], 2);
        assert_eq!(slot.generation(), 2);
    }

    #[test]
    fn test_reader_keeps_old_snapshot_alive() {
        let slot = LatestSlot::new();
        slot.publish(snapshot(1));
        let held = slot.latest().unwrap();
        slot.publish(snapshot(2));
        assert_eq!(held.preview.data()[0], 1);
        assert_eq!(held.blocks.values()[0], 1);
    }

    #[test]
    fn test_clear() {
        let slot = LatestSlot::new();
        slot.publish(snapshot(1));
        slot.clear();
        assert!(slot.latest().is_none());
    }

    #[test]
    fn test_shared_granularity() {
        let shared = SharedGranularity::new(Granularity::default());
        let clone = shared.clone();
        clone.set(Granularity::new(7.25).unwrap());
        assert_eq!(shared.get().get(), 7.25);
    }
}
