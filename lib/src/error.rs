//! Error types for the conversion pipeline.

use thiserror::Error;

/// Errors surfaced by a conversion call.
///
/// Numeric knobs out of their documented range are never rejected, only
/// clamped where they are used; these variants cover the inputs that
/// cannot be repaired by clamping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Buffer shape does not describe a `width * height * 4` RGBA buffer
    #[error("invalid dimensions: {width}x{height} does not match an RGBA buffer of {len} bytes")]
    InvalidDimensions {
        width: u32,
        height: u32,
        len: usize,
    },

    /// Resolved character ramp has zero glyphs
    #[error("character ramp is empty")]
    EmptyCharset,

    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_display() {
        let err = ConvertError::InvalidDimensions {
            width: 4,
            height: 4,
            len: 16,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("4x4"));
        assert!(msg.contains("16 bytes"));
    }

    #[test]
    fn test_empty_charset_display() {
        let msg = format!("{}", ConvertError::EmptyCharset);
        assert!(msg.contains("empty"));
    }
}
