//! Error types for the frame-to-glyph pipeline.

use thiserror::Error;

/// Errors produced while reducing frames or building glyph ramps.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AsciiError {
    /// Granularity was zero, negative, NaN or infinite.
    #[error("Invalid granularity {0}: must be a finite number greater than 0")]
    InvalidGranularity(f64),

    /// Frame has no pixels to reduce.
    #[error("Empty frame ({width}x{height}): nothing to reduce")]
    EmptyFrame { width: u32, height: u32 },

    /// Pixel buffer length does not match `width * height`.
    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// A glyph ramp needs at least two glyphs to express any contrast.
    #[error("Glyph ramp needs at least 2 glyphs, got {0}")]
    InvalidRamp(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(AsciiError::InvalidGranularity(0.0)
            .to_string()
            .contains("greater than 0"));
        assert_eq!(
            AsciiError::EmptyFrame { width: 0, height: 4 }.to_string(),
            "Empty frame (0x4): nothing to reduce"
        );
        assert!(AsciiError::InvalidRamp(1).to_string().contains("got 1"));
    }
}
