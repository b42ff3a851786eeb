//! Unit tests for the glyph pipeline.
//!
//! These tests verify the core conversion algorithms:
//! - Ramp mapping boundaries and monotonicity
//! - Block dimensions and reduction shapes
//! - Glyph grid and text transcript

use glyphcam::ascii::*;

fn gradient(width: u32, height: u32) -> Frame {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 7 + y * 13) % 256) as u8))
        .collect();
    Frame::new(data, width, height).unwrap()
}

// ==================== Ramp Mapping Tests ====================

#[test]
fn test_ramp_boundaries_for_every_named_ramp() {
    for kind in RampKind::ALL {
        let ramp = GlyphRamp::named(kind);
        let glyphs = ramp.glyphs();
        assert_eq!(ramp.map(0), glyphs[0], "ramp {}", kind.name());
        assert_eq!(ramp.map(255), glyphs[glyphs.len() - 1], "ramp {}", kind.name());
    }
}

#[test]
fn test_ramp_index_is_monotonic() {
    for kind in RampKind::ALL {
        let ramp = GlyphRamp::named(kind);
        let index_of = |c: char| ramp.glyphs().iter().position(|&g| g == c).unwrap();
        let mut previous = 0;
        for intensity in 0..=255u8 {
            let index = index_of(ramp.map(intensity));
            assert!(index >= previous, "ramp {} at {}", kind.name(), intensity);
            previous = index;
        }
    }
}

#[test]
fn test_inverted_ramp_is_monotonic_decreasing() {
    let ramp = GlyphRamp::named(RampKind::Detailed).inverted(true);
    let index_of = |c: char| ramp.glyphs().iter().position(|&g| g == c).unwrap();
    let mut previous = ramp.len() - 1;
    for intensity in 0..=255u8 {
        let index = index_of(ramp.map(intensity));
        assert!(index <= previous);
        previous = index;
    }
}

#[test]
fn test_dense_ramp_midpoint() {
    // floor(128 / 255 * 10) = 5 -> 'o'
    assert_eq!(GlyphRamp::named(RampKind::Dense).map(128), 'o');
}

// ==================== Block Reduction Tests ====================

#[test]
fn test_block_count_never_zero() {
    for &(w, h) in &[(1, 1), (2, 3), (17, 5), (128, 56), (640, 480)] {
        for &g in &[0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 1000.0] {
            let (bw, bh) = block_dimensions(w, h, g).unwrap();
            assert!(bw >= 1 && bh >= 1, "{}x{} at {}", w, h, g);
        }
    }
}

#[test]
fn test_reduce_shapes() {
    for &(w, h) in &[(1, 1), (13, 7), (128, 56), (300, 200)] {
        let frame = gradient(w, h);
        for &g in &[0.5, 1.0, 3.0, 5.0, 9.5] {
            let reduced = reduce(&frame, g).unwrap();
            let (bw, bh) = block_dimensions(w, h, g).unwrap();
            assert_eq!((reduced.preview.width(), reduced.preview.height()), (w, h));
            assert_eq!(reduced.preview.data().len(), (w * h) as usize);
            assert_eq!((reduced.blocks.width(), reduced.blocks.height()), (bw, bh));
            assert_eq!(reduced.blocks.values().len(), (bw * bh) as usize);
        }
    }
}

#[test]
fn test_preview_only_uses_block_values() {
    let frame = gradient(90, 50);
    let reduced = reduce(&frame, 2.0).unwrap();
    for value in reduced.preview.data() {
        assert!(reduced.blocks.values().contains(value));
    }
}

#[test]
fn test_reduce_zero_granularity_fails() {
    let frame = gradient(128, 56);
    assert_eq!(
        reduce(&frame, 0.0),
        Err(AsciiError::InvalidGranularity(0.0))
    );
}

#[test]
fn test_reduce_smooths_checkerboard() {
    // Alternating 0/255 pixels average to mid-grey instead of aliasing
    let data = (0..30u32 * 50)
        .map(|i| if (i % 30 + i / 30) % 2 == 0 { 0 } else { 255 })
        .collect();
    let frame = Frame::new(data, 30, 50).unwrap();
    let reduced = reduce(&frame, 2.0).unwrap(); // 6x10 px blocks
    for &value in reduced.blocks.values() {
        assert!((127..=128).contains(&value), "block value {}", value);
    }
}

// ==================== Glyph Grid Tests ====================

#[test]
fn test_example_128x56_at_granularity_5() {
    let frame = gradient(128, 56);
    let reduced = reduce(&frame, 5.0).unwrap();
    assert_eq!((reduced.blocks.width(), reduced.blocks.height()), (8, 2));

    let grid = to_glyph_grid(&reduced.blocks, &GlyphRamp::named(RampKind::Dense));
    let text = to_text(&grid);
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(line.chars().count(), 8);
    }
}

#[test]
fn test_glyph_grid_is_pure() {
    let frame = gradient(64, 64);
    let reduced = reduce(&frame, 1.5).unwrap();
    let ramp = GlyphRamp::named(RampKind::Classic);
    let first = to_glyph_grid(&reduced.blocks, &ramp);
    let second = to_glyph_grid(&reduced.blocks, &ramp);
    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
}

#[test]
fn test_text_row_major_order() {
    let frame = Frame::new(vec![0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255, 0, 0, 0], 15, 1)
        .unwrap();
    // 15 / 3 = 5 columns, 1 row
    let reduced = reduce(&frame, 1.0).unwrap();
    let grid = to_glyph_grid(&reduced.blocks, &GlyphRamp::custom(".#").unwrap());
    assert_eq!(grid.to_text(), ".#.#.");
}
