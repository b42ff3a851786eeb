//! Glyph ramp definitions for ASCII rendering.

use std::borrow::Cow;

use super::error::AsciiError;

/// Block ramp (5 levels) using Unicode shade characters.
pub const BLOCKS_RAMP: &[char] = &[' ', '░', '▒', '▓', '█'];

/// Simple ASCII ramp (7 levels).
pub const SIMPLE_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '#'];

/// Classic ASCII density ramp (9 levels).
pub const CLASSIC_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '%', '@'];

/// Dense ramp (11 levels), ending in a full block. The default.
pub const DENSE_RAMP: &[char] = &[' ', '.', ':', '~', '+', 'o', 'O', '0', '8', '@', '█'];

/// Detailed ASCII ramp (16 levels).
pub const DETAILED_RAMP: &[char] = &[
    ' ', '.', '`', ':', '-', '~', '=', '+', '*', 'o', 'x', '%', '#', 'W', '&', '@',
];

/// Named ramps shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampKind {
    Blocks,
    Simple,
    Classic,
    #[default]
    Dense,
    Detailed,
}

impl RampKind {
    pub const ALL: [RampKind; 5] = [
        RampKind::Blocks,
        RampKind::Simple,
        RampKind::Classic,
        RampKind::Dense,
        RampKind::Detailed,
    ];

    pub fn chars(&self) -> &'static [char] {
        match self {
            RampKind::Blocks => BLOCKS_RAMP,
            RampKind::Simple => SIMPLE_RAMP,
            RampKind::Classic => CLASSIC_RAMP,
            RampKind::Dense => DENSE_RAMP,
            RampKind::Detailed => DETAILED_RAMP,
        }
    }

    /// Cycle to the next named ramp.
    ///
    /// Order: Blocks -> Simple -> Classic -> Dense -> Detailed -> Blocks
    pub fn next(&self) -> Self {
        match self {
            RampKind::Blocks => RampKind::Simple,
            RampKind::Simple => RampKind::Classic,
            RampKind::Classic => RampKind::Dense,
            RampKind::Dense => RampKind::Detailed,
            RampKind::Detailed => RampKind::Blocks,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RampKind::Blocks => "blocks",
            RampKind::Simple => "simple",
            RampKind::Classic => "classic",
            RampKind::Dense => "dense",
            RampKind::Detailed => "detailed",
        }
    }

    /// Look up a named ramp (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// An ordered brightness-to-glyph palette.
///
/// With `invert == false`, index 0 is used for intensity 0 and the last glyph
/// for intensity 255. Inverting flips that direction without touching the
/// glyph order, so the same palette works on light and dark backgrounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    name: Cow<'static, str>,
    glyphs: Cow<'static, [char]>,
    invert: bool,
}

impl GlyphRamp {
    /// One of the built-in ramps.
    pub fn named(kind: RampKind) -> Self {
        Self {
            name: Cow::Borrowed(kind.name()),
            glyphs: Cow::Borrowed(kind.chars()),
            invert: false,
        }
    }

    /// A user supplied ramp, e.g. `" .oO@"`.
    pub fn custom(glyphs: &str) -> Result<Self, AsciiError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(AsciiError::InvalidRamp(glyphs.len()));
        }
        Ok(Self {
            name: Cow::Borrowed("custom"),
            glyphs: Cow::Owned(glyphs),
            invert: false,
        })
    }

    /// Resolve a ramp name, falling back to a custom ramp built from the string.
    pub fn parse(name: &str) -> Result<Self, AsciiError> {
        match RampKind::from_name(name) {
            Some(kind) => Ok(Self::named(kind)),
            None => Self::custom(name),
        }
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Map an intensity to its glyph.
    ///
    /// `idx = floor(intensity / 255 * (len - 1))`, computed in integers so
    /// 0 and 255 land exactly on the first and last glyph.
    pub fn map(&self, intensity: u8) -> char {
        let levels = self.glyphs.len();
        if levels == 0 {
            return ' ';
        }
        let value = if self.invert { 255 - intensity } else { intensity };
        let idx = (value as usize * (levels - 1)) / 255;
        self.glyphs[idx.min(levels - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::named(RampKind::default())
    }
}

impl From<RampKind> for GlyphRamp {
    fn from(kind: RampKind) -> Self {
        Self::named(kind)
    }
}
