//! Frame conversion and transformation utilities.

use crate::ascii::{AsciiError, Frame};

use super::types::{PixelFormat, RawFrame};

/// Convert a raw frame to a grayscale [`Frame`] using the ITU-R BT.601
/// luminance formula `Y = 0.299*R + 0.587*G + 0.114*B`.
///
/// Coefficients are scaled by 1000 so the hot path stays in integer math.
///
/// # Errors
/// * `AsciiError::BufferSize` - the buffer is shorter than `width * height` pixels
pub fn to_grayscale(raw: &RawFrame) -> Result<Frame, AsciiError> {
    let pixel_count = raw.width as usize * raw.height as usize;
    let bpp = raw.bytes_per_pixel();
    if raw.data.len() < pixel_count * bpp {
        return Err(AsciiError::BufferSize {
            expected: pixel_count * bpp,
            actual: raw.data.len(),
        });
    }
    let pixels = &raw.data[..pixel_count * bpp];

    let gray = match raw.format {
        PixelFormat::Gray => pixels.to_vec(),
        PixelFormat::Rgb => pixels
            .chunks_exact(3)
            .map(|p| luminance(p[0], p[1], p[2]))
            .collect(),
        PixelFormat::Bgr => pixels
            .chunks_exact(3)
            .map(|p| luminance(p[2], p[1], p[0]))
            .collect(),
    };

    Frame::new(gray, raw.width, raw.height)
}

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    // 299 + 587 + 114 = 1000
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut RawFrame) {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bpp = frame.bytes_per_pixel();
    if frame.data.len() < width * height * bpp {
        return;
    }

    for y in 0..height {
        let row_start = y * width * bpp;
        let row = &mut frame.data[row_start..row_start + width * bpp];

        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}

/// Turn a live camera frame into pipeline input: optional mirror, then grayscale.
pub fn prepare_live_frame(mut raw: RawFrame, mirror: bool) -> Result<Frame, AsciiError> {
    if mirror {
        mirror_horizontal(&mut raw);
    }
    to_grayscale(&raw)
}
