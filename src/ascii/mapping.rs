//! Block-to-glyph mapping and text transcripts.

use super::charset::GlyphRamp;
use super::frame::BlockGrid;

/// A 2-D grid of glyphs, one per block, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    glyphs: Vec<char>,
    width: u32,
    height: u32,
}

impl GlyphGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn get(&self, x: u32, y: u32) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.glyphs
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.glyphs.chunks_exact(self.width.max(1) as usize)
    }

    /// Rows joined by `\n`, glyphs within a row joined with no separator.
    pub fn to_text(&self) -> String {
        to_text(self)
    }
}

/// Map every block through the ramp.
///
/// Pure: the same `(blocks, ramp)` always yields the same grid.
pub fn to_glyph_grid(blocks: &BlockGrid, ramp: &GlyphRamp) -> GlyphGrid {
    let mut glyphs = Vec::new();
    map_to_glyphs_into(blocks.values(), ramp, &mut glyphs);
    GlyphGrid {
        glyphs,
        width: blocks.width(),
        height: blocks.height(),
    }
}

/// Map intensities to glyphs, reusing an existing buffer.
///
/// # Returns
/// The number of glyphs written to the buffer.
pub fn map_to_glyphs_into(intensities: &[u8], ramp: &GlyphRamp, buffer: &mut Vec<char>) -> usize {
    buffer.clear();
    buffer.reserve(intensities.len());
    buffer.extend(intensities.iter().map(|&v| ramp.map(v)));
    intensities.len()
}

/// Serialize a glyph grid: no trailing newline, empty string for an empty grid.
pub fn to_text(grid: &GlyphGrid) -> String {
    if grid.glyphs.is_empty() {
        return String::new();
    }
    let mut text = String::with_capacity(grid.glyphs.len() * 4 + grid.height as usize);
    for (row_index, row) in grid.rows().enumerate() {
        if row_index > 0 {
            text.push('\n');
        }
        text.extend(row.iter());
    }
    text
}
