//! Frame-to-glyph conversion pipeline.
//!
//! 1. **Block reduction** - average a grayscale frame into glyph-sized blocks
//!    and rebuild a blocky preview at full size ([`reduce`])
//! 2. **Glyph mapping** - map each block through a [`GlyphRamp`]
//!    ([`to_glyph_grid`])
//! 3. **Transcript** - join the glyph grid into newline separated text
//!    ([`to_text`])
//!
//! Ramps and blocks are independent: swapping the ramp never requires
//! recomputing blocks.

mod charset;
mod error;
mod frame;
mod mapping;
mod reduce;

pub use charset::{
    GlyphRamp, RampKind, BLOCKS_RAMP, CLASSIC_RAMP, DENSE_RAMP, DETAILED_RAMP, SIMPLE_RAMP,
};
pub use error::AsciiError;
pub use frame::{BlockGrid, Frame, Granularity, DEFAULT_GRANULARITY};
pub use mapping::{map_to_glyphs_into, to_glyph_grid, to_text, GlyphGrid};
pub use reduce::{
    block_dimensions, reduce, Reduced, CELL_UNITS_X, CELL_UNITS_Y, MAX_BLOCKS_PER_AXIS,
};
