//! Grayscale frame, block grid and granularity types.

use super::error::AsciiError;

/// Default granularity (matches the middle of the 2..=10 slider range).
pub const DEFAULT_GRANULARITY: f64 = 5.0;

/// A single-channel 8-bit grayscale image, row-major.
///
/// Frames handed to the pipeline are already converted to grayscale (and
/// mirrored, for live camera input) by the frame source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap a grayscale buffer, checking that it holds exactly `width * height` samples.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, AsciiError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AsciiError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub(crate) fn from_parts(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// A frame where every sample has the same intensity.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw samples in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Intensity at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Coarse grid of averaged intensities, one value per glyph cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGrid {
    values: Vec<u8>,
    width: u32,
    height: u32,
}

impl BlockGrid {
    pub(crate) fn from_raw(values: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        Self {
            values,
            width,
            height,
        }
    }

    /// Number of block columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of block rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.values.chunks_exact(self.width.max(1) as usize)
    }
}

/// Block coarseness: larger values give fewer, larger blocks.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Granularity(f64);

impl Granularity {
    pub fn new(value: f64) -> Result<Self, AsciiError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(AsciiError::InvalidGranularity(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self(DEFAULT_GRANULARITY)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
