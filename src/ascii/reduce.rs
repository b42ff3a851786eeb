//! Block reduction: downsample a frame into glyph-sized blocks and
//! expand the blocks back into a full-size preview.

use super::error::AsciiError;
use super::frame::{BlockGrid, Frame, Granularity};

/// Horizontal share of a glyph cell (a monospace cell is ~3 wide by 5 tall).
pub const CELL_UNITS_X: f64 = 3.0;

/// Vertical share of a glyph cell.
pub const CELL_UNITS_Y: f64 = 5.0;

/// Largest block count allowed on either axis. Granularities that would
/// exceed it are rejected rather than allocating a grid this large.
pub const MAX_BLOCKS_PER_AXIS: u32 = 8192;

/// Output of [`reduce`]: the blocky preview plus the block grid it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    /// Blocks expanded back to the source size with nearest-neighbour sampling.
    pub preview: Frame,
    /// Area-averaged block intensities.
    pub blocks: BlockGrid,
}

/// Block grid dimensions for a frame at the given granularity.
///
/// `block_w = max(1, floor(w / (g * 3)))`, `block_h = max(1, floor(h / (g * 5)))`.
///
/// # Errors
/// * `AsciiError::InvalidGranularity` - granularity is not finite and positive,
///   or so small that an axis would need more than [`MAX_BLOCKS_PER_AXIS`] blocks
pub fn block_dimensions(
    width: u32,
    height: u32,
    granularity: f64,
) -> Result<(u32, u32), AsciiError> {
    let g = Granularity::new(granularity)?.get();
    let axis = |pixels: u32, units: f64| -> Result<u32, AsciiError> {
        let blocks = (pixels as f64 / (g * units)).floor();
        if blocks > MAX_BLOCKS_PER_AXIS as f64 {
            return Err(AsciiError::InvalidGranularity(granularity));
        }
        Ok((blocks as u32).max(1))
    };
    Ok((axis(width, CELL_UNITS_X)?, axis(height, CELL_UNITS_Y)?))
}

/// Reduce a grayscale frame to glyph blocks at the given granularity.
///
/// Each block is the mean of the source pixels it covers, so fine detail
/// is smoothed rather than aliased. The preview repeats each block value
/// over its footprint at the original resolution. Output is a pure
/// function of `(frame, granularity)`.
///
/// # Errors
/// * `AsciiError::InvalidGranularity` - granularity is not finite and positive,
///   or too small for this frame (see [`block_dimensions`])
/// * `AsciiError::EmptyFrame` - the frame has zero width or height
///
/// # Example
/// ```ignore
/// // 128x56 at granularity 5 -> 8x2 blocks
/// let reduced = reduce(&frame, 5.0)?;
/// assert_eq!((reduced.blocks.width(), reduced.blocks.height()), (8, 2));
/// ```
pub fn reduce(frame: &Frame, granularity: f64) -> Result<Reduced, AsciiError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(AsciiError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    let (block_w, block_h) = block_dimensions(frame.width(), frame.height(), granularity)?;

    let blocks = downsample_area(frame, block_w, block_h);
    let preview = upsample_nearest(&blocks, frame.width(), frame.height());
    Ok(Reduced { preview, blocks })
}

/// Pixel span `[start, end)` covered by output cell `index` of `cells`.
///
/// Integer bounds keep the result reproducible; every cell covers at least
/// one pixel even when there are more cells than pixels.
fn cell_span(index: u32, cells: u32, pixels: u32) -> (usize, usize) {
    let index = index as u64;
    let cells = cells as u64;
    let pixels = pixels as u64;
    let start = (index * pixels / cells).min(pixels - 1);
    let end = ((index + 1) * pixels / cells).clamp(start + 1, pixels);
    (start as usize, end as usize)
}

/// Average every source pixel inside each block.
fn downsample_area(frame: &Frame, block_w: u32, block_h: u32) -> BlockGrid {
    let width = frame.width() as usize;
    let gray = frame.data();
    let mut values = Vec::with_capacity(block_w as usize * block_h as usize);

    let columns: Vec<(usize, usize)> = (0..block_w)
        .map(|bx| cell_span(bx, block_w, frame.width()))
        .collect();

    for by in 0..block_h {
        let (start_y, end_y) = cell_span(by, block_h, frame.height());
        for &(start_x, end_x) in &columns {
            let mut sum = 0u64;
            for py in start_y..end_y {
                let row = &gray[py * width..(py + 1) * width];
                sum += row[start_x..end_x].iter().map(|&v| v as u64).sum::<u64>();
            }
            let count = ((end_y - start_y) * (end_x - start_x)) as u64;
            // Round to nearest
            values.push(((sum + count / 2) / count) as u8);
        }
    }

    BlockGrid::from_raw(values, block_w, block_h)
}

/// Expand blocks back to `width x height`, repeating each block value.
fn upsample_nearest(blocks: &BlockGrid, width: u32, height: u32) -> Frame {
    let bw = blocks.width() as u64;
    let bh = blocks.height() as u64;
    let source_x: Vec<usize> = (0..width as u64)
        .map(|x| (x * bw / width as u64) as usize)
        .collect();

    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as u64 {
        let by = (y * bh / height as u64) as usize;
        let row = &blocks.values()[by * bw as usize..(by + 1) * bw as usize];
        data.extend(source_x.iter().map(|&bx| row[bx]));
    }

    Frame::from_parts(data, width, height)
}
