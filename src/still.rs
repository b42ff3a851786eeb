//! Still-image decoding for uploads.
//!
//! Decoded images are bounded to [`DEFAULT_MAX_SIDE`] pixels on the longer
//! side and converted to grayscale. Unlike live camera frames they are not
//! mirrored.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use thiserror::Error;

use crate::ascii::Frame;

/// Longer-side bound applied to uploads before block reduction.
pub const DEFAULT_MAX_SIDE: u32 = 400;

/// Errors that can occur while decoding an upload.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to decode image '{}': {source}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image '{}' has no pixels", path.display())]
    EmptyImage { path: PathBuf },
}

/// Decode an image file into a bounded grayscale frame.
///
/// The format is detected from the file contents, so the extension may be
/// missing or wrong.
///
/// # Errors
/// * `DecodeError::DecodeFailure` - unreadable file or unsupported/corrupt data
/// * `DecodeError::EmptyImage` - the image decoded to zero area
pub fn decode(path: &Path, max_side: u32) -> Result<Frame, DecodeError> {
    let failure = |source: image::ImageError| DecodeError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| failure(image::ImageError::IoError(e)))?
        .decode()
        .map_err(failure)?;
    from_image(&image, max_side).ok_or_else(|| DecodeError::EmptyImage {
        path: path.to_path_buf(),
    })
}

/// Decode an in-memory encoded image (PNG, JPEG, ...).
pub fn decode_bytes(bytes: &[u8], max_side: u32) -> Result<Frame, DecodeError> {
    let path = PathBuf::from("<memory>");
    let image = image::load_from_memory(bytes).map_err(|source| DecodeError::DecodeFailure {
        path: path.clone(),
        source,
    })?;
    from_image(&image, max_side).ok_or(DecodeError::EmptyImage { path })
}

/// Bound and convert an already decoded image. `None` for zero-area images.
pub fn from_image(image: &DynamicImage, max_side: u32) -> Option<Frame> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return None;
    }
    let (target_w, target_h) = bound_size(width, height, max_side);
    let gray = if (target_w, target_h) == (width, height) {
        image.to_luma8()
    } else {
        log::debug!(
            "Resizing still {}x{} -> {}x{}",
            width,
            height,
            target_w,
            target_h
        );
        image
            .resize_exact(target_w, target_h, FilterType::Triangle)
            .to_luma8()
    };
    Frame::new(gray.into_raw(), target_w, target_h).ok()
}

/// Scale `(width, height)` down so the longer side is at most `max_side`,
/// keeping the aspect ratio. Images already within bounds are untouched.
pub fn bound_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longer = width.max(height);
    if max_side == 0 || longer <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / longer as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).clamp(1, max_side);
    (scaled(width), scaled(height))
}
