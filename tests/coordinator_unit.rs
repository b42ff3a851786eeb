//! Tests for the frame acquisition coordinator and its latest-snapshot slot.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glyphcam::ascii::{reduce, Frame, Granularity};
use glyphcam::camera::{prepare_live_frame, Resolution, SourceStats, SyntheticSource};
use glyphcam::coordinator::{Coordinator, FrameOrigin, LatestSlot, Snapshot};

fn wait_for_new(coordinator: &Coordinator, after: Option<&Arc<Snapshot>>) -> Arc<Snapshot> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(snapshot) = coordinator.latest() {
            if after.map_or(true, |prev| !Arc::ptr_eq(prev, &snapshot)) {
                return snapshot;
            }
        }
        assert!(Instant::now() < deadline, "no new snapshot within 5s");
        thread::sleep(Duration::from_millis(5));
    }
}

fn still_snapshot(value: u8) -> Arc<Snapshot> {
    let frame = Frame::filled(30, 25, value);
    let reduced = reduce(&frame, 5.0).unwrap();
    Arc::new(Snapshot {
        source: frame,
        preview: reduced.preview,
        blocks: reduced.blocks,
        granularity: Granularity::default(),
        origin: FrameOrigin::Still,
        created_at: Instant::now(),
    })
}

// ==================== Slot Tests ====================

#[test]
fn test_slot_readers_never_see_torn_pairs() {
    let slot = LatestSlot::new();
    let writer = {
        let slot = slot.clone();
        thread::spawn(move || {
            for i in 0..200u32 {
                slot.publish(still_snapshot((i % 256) as u8));
            }
        })
    };
    for _ in 0..200 {
        if let Some(snapshot) = slot.latest() {
            let value = snapshot.source.data()[0];
            assert!(snapshot.blocks.values().iter().all(|&v| v == value));
            assert!(snapshot.preview.data().iter().all(|&v| v == value));
        }
    }
    writer.join().unwrap();
}

// ==================== Coordinator Tests ====================

/// Index of the synthetic pattern frame `source` was built from, if any.
fn pattern_index(snapshot: &Snapshot, mirror: bool, reads: usize) -> Option<u64> {
    (0..=reads as u64).find(|&i| {
        let raw = SyntheticSource::pattern(Resolution::TINY, i);
        prepare_live_frame(raw, mirror).ok().as_ref() == Some(&snapshot.source)
    })
}

#[test]
fn test_live_snapshots_are_mirrored_grayscale() {
    let source = SyntheticSource::new(Resolution::TINY);
    let stats = source.stats();
    let coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    let snapshot = wait_for_new(&coordinator, None);
    assert_eq!(snapshot.origin, FrameOrigin::Live);
    assert_eq!((snapshot.source.width(), snapshot.source.height()), (128, 56));
    assert_eq!((snapshot.preview.width(), snapshot.preview.height()), (128, 56));

    let reads = SourceStats::count(&stats.reads);
    assert!(pattern_index(&snapshot, true, reads).is_some());
    assert!(pattern_index(&snapshot, false, reads).is_none());
}

#[test]
fn test_unmirrored_source_keeps_orientation() {
    let source = SyntheticSource::new(Resolution::TINY).with_mirror(false);
    let stats = source.stats();
    let coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    let snapshot = wait_for_new(&coordinator, None);
    let reads = SourceStats::count(&stats.reads);
    assert!(pattern_index(&snapshot, false, reads).is_some());
}

#[test]
fn test_paused_coordinator_publishes_nothing() {
    let source = SyntheticSource::new(Resolution::TINY);
    let stats = source.stats();
    let mut coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    wait_for_new(&coordinator, None);

    coordinator.pause().unwrap();
    let held = coordinator.latest().unwrap();
    let generation = coordinator.slot().generation();
    let reads = SourceStats::count(&stats.reads);

    thread::sleep(Duration::from_millis(100));
    assert!(Arc::ptr_eq(&held, &coordinator.latest().unwrap()));
    assert_eq!(coordinator.slot().generation(), generation);
    assert_eq!(SourceStats::count(&stats.reads), reads);
}

#[test]
fn test_resume_produces_fresh_frames() {
    let source = SyntheticSource::new(Resolution::TINY);
    let mut coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    let before = wait_for_new(&coordinator, None);
    coordinator.pause().unwrap();
    coordinator.resume().unwrap();
    assert!(!coordinator.is_paused());
    let after = wait_for_new(&coordinator, Some(&before));
    assert!(after.created_at > before.created_at);
}

#[test]
fn test_granularity_applies_to_next_frame() {
    let source = SyntheticSource::new(Resolution::TINY);
    let coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    wait_for_new(&coordinator, None);
    coordinator.set_granularity(Granularity::new(1.0).unwrap());

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = coordinator.latest().unwrap();
        if snapshot.granularity.get() == 1.0 {
            assert_eq!((snapshot.blocks.width(), snapshot.blocks.height()), (42, 11));
            break;
        }
        assert!(Instant::now() < deadline, "granularity never applied");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_transient_read_failure_keeps_previous_snapshot() {
    let source = SyntheticSource::new(Resolution::TINY);
    let stats = source.stats();
    let coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    wait_for_new(&coordinator, None);

    stats.set_fail_reads(true);
    thread::sleep(Duration::from_millis(30));
    let held = coordinator.latest().unwrap();
    let reads = SourceStats::count(&stats.reads);
    thread::sleep(Duration::from_millis(100));

    // Still ticking, still showing the last good frame
    assert!(SourceStats::count(&stats.reads) > reads);
    assert!(Arc::ptr_eq(&held, &coordinator.latest().unwrap()));

    stats.set_fail_reads(false);
    wait_for_new(&coordinator, Some(&held));
}

#[test]
fn test_missed_ticks_are_not_replayed() {
    let source = SyntheticSource::new(Resolution::TINY);
    let stats = source.stats();
    let mut coordinator = Coordinator::start(source, 100, Granularity::default()).unwrap();
    coordinator.pause().unwrap();
    thread::sleep(Duration::from_millis(200));
    let reads = SourceStats::count(&stats.reads);
    coordinator.resume().unwrap();
    thread::sleep(Duration::from_millis(50));
    // 200ms paused at 10ms per tick would be 20 catch-up reads
    assert!(SourceStats::count(&stats.reads) - reads < 15);
}
