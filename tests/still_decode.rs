//! Tests for decoding uploaded stills from disk.

use std::path::Path;

use glyphcam::ascii::{reduce, to_glyph_grid, GlyphRamp};
use glyphcam::still::{decode, decode_bytes, DecodeError, DEFAULT_MAX_SIDE};

#[test]
fn test_decode_png_to_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("red.png");
    image::RgbImage::from_pixel(20, 10, image::Rgb([255, 0, 0]))
        .save(&path)
        .unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    assert_eq!((frame.width(), frame.height()), (20, 10));
    let first = frame.data()[0];
    // Pure red is a dark-ish grey, well away from both ends
    assert!(first > 40 && first < 120, "luma {}", first);
    assert!(frame.data().iter().all(|&v| v == first));
}

#[test]
fn test_decode_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grey.jpg");
    image::RgbImage::from_pixel(16, 16, image::Rgb([128, 128, 128]))
        .save(&path)
        .unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    assert_eq!((frame.width(), frame.height()), (16, 16));
    assert!(frame.data().iter().all(|&v| v.abs_diff(128) <= 4));
}

#[test]
fn test_decode_png_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let named = dir.path().join("source.png");
    image::GrayImage::from_pixel(20, 10, image::Luma([200]))
        .save(&named)
        .unwrap();
    let path = dir.path().join("upload");
    std::fs::rename(&named, &path).unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    assert_eq!((frame.width(), frame.height()), (20, 10));
    assert!(frame.data().iter().all(|&v| v == 200));
}

#[test]
fn test_decode_png_with_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let named = dir.path().join("source.png");
    image::GrayImage::from_pixel(12, 8, image::Luma([40]))
        .save(&named)
        .unwrap();
    let path = dir.path().join("photo.jpg");
    std::fs::rename(&named, &path).unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    assert_eq!((frame.width(), frame.height()), (12, 8));
    assert!(frame.data().iter().all(|&v| v == 40));
}

#[test]
fn test_decode_bounds_longer_side() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tall.png");
    image::GrayImage::new(300, 1200).save(&path).unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    assert_eq!((frame.width(), frame.height()), (100, 400));
}

#[test]
fn test_decode_respects_custom_bound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.png");
    image::GrayImage::new(640, 480).save(&path).unwrap();

    let frame = decode(&path, 64).unwrap();
    assert_eq!((frame.width(), frame.height()), (64, 48));
}

#[test]
fn test_decode_missing_file() {
    let result = decode(Path::new("/nonexistent/glyphcam/missing.png"), DEFAULT_MAX_SIDE);
    match result {
        Err(DecodeError::DecodeFailure { path, .. }) => {
            assert!(path.ends_with("missing.png"));
        }
        other => panic!("expected DecodeFailure, got {:?}", other.map(|f| f.width())),
    }
}

#[test]
fn test_decode_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\n\x00\x00garbage").unwrap();

    let err = decode(&path, DEFAULT_MAX_SIDE).unwrap_err();
    assert!(matches!(err, DecodeError::DecodeFailure { .. }));
    assert!(err.to_string().contains("broken.png"));
}

#[test]
fn test_decode_bytes_matches_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.png");
    image::GrayImage::from_fn(64, 32, |x, _| image::Luma([(x * 4) as u8]))
        .save(&path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(
        decode_bytes(&bytes, DEFAULT_MAX_SIDE).unwrap(),
        decode(&path, DEFAULT_MAX_SIDE).unwrap()
    );
}

#[test]
fn test_decoded_still_renders_left_to_right() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("steps.png");
    // Three 15px-wide bands: black, mid grey, white
    image::GrayImage::from_fn(45, 25, |x, _| {
        image::Luma([match x / 15 {
            0 => 0,
            1 => 128,
            _ => 255,
        }])
    })
    .save(&path)
    .unwrap();

    let frame = decode(&path, DEFAULT_MAX_SIDE).unwrap();
    let reduced = reduce(&frame, 5.0).unwrap();
    let grid = to_glyph_grid(&reduced.blocks, &GlyphRamp::default());
    assert_eq!(grid.to_text(), " o█");
}
