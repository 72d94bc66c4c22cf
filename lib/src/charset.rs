//! Character ramp definitions for luminance-based glyph selection.
//!
//! Ramps are ordered from darkest (space) to brightest; the glyph
//! mapper quantizes luminance into `ramp.len()` levels.

use crate::error::ConvertError;

/// Standard 10-level density ramp.
pub const STANDARD_RAMP: &str = " .:-=+*#%@";

/// Long 70-level ramp for fine tonal detail in large grids.
pub const DETAILED_RAMP: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Unicode block ramp (5 levels).
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Minimal 4-level ramp for a clean, low-noise look.
pub const MINIMAL_RAMP: &str = " .:#";

/// Named character ramp, or a user-supplied manual one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Standard 10-level density ramp
    #[default]
    Standard,
    /// 70-level ramp with fine tonal steps
    Detailed,
    /// Unicode block characters (5 levels)
    Blocks,
    /// 4-level ramp for a clean look
    Minimal,
    /// Ramp taken verbatim from `ConversionConfig::manual_chars`
    Manual,
}

impl Charset {
    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Standard => "standard",
            Charset::Detailed => "detailed",
            Charset::Blocks => "blocks",
            Charset::Minimal => "minimal",
            Charset::Manual => "manual",
        }
    }

    /// Resolve the active ramp to a glyph vector.
    ///
    /// `manual_chars` is consulted only for [`Charset::Manual`]. A ramp
    /// with zero glyphs cannot index anything and is rejected here; a
    /// single-glyph ramp is legal and handled downstream.
    pub fn resolve(&self, manual_chars: &str) -> Result<Vec<char>, ConvertError> {
        let ramp: Vec<char> = match self {
            Charset::Standard => STANDARD_RAMP.chars().collect(),
            Charset::Detailed => DETAILED_RAMP.chars().collect(),
            Charset::Blocks => BLOCKS_RAMP.chars().collect(),
            Charset::Minimal => MINIMAL_RAMP.chars().collect(),
            Charset::Manual => manual_chars.chars().collect(),
        };

        if ramp.is_empty() {
            return Err(ConvertError::EmptyCharset);
        }
        Ok(ramp)
    }
}
