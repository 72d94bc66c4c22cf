use crate::charset::Charset;
use crate::error::ConvertError;

/// Edge extraction strategy. Both active variants bypass the dither
/// stage: their output is already binary or directional, not leveled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMethod {
    /// No edge pass; tone-mapped luminance flows straight through
    #[default]
    None,
    /// Single-pass Sobel magnitude threshold producing a binary ink/blank field
    Sobel,
    /// Difference-of-Gaussians contour extraction with directional glyphs
    DogContour,
}

/// Quantization strategy applied when dithering is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg error diffusion
    #[default]
    Floyd,
    /// Atkinson error diffusion (propagates 6/8 of the error, lighter look)
    Atkinson,
    /// Uniform random noise added before quantization
    Noise,
    /// Ordered dithering with a Bayer 4x4 threshold matrix
    Ordered,
}

/// Configuration for a single image-to-text conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Output geometry (consumed by the caller's rasterizer)
    pub width: u32,       // target columns, >= 1, default 100
    pub blur_radius: f32, // >= 0.0, rasterizer-side pre-blur, default 0.0

    /// Tone mapping
    pub brightness: f32, // -100..100, clamped at use, default 0.0
    pub contrast: f32,   // -100..100, clamped at use, default 0.0
    pub invert: bool,    // default false

    /// Glyph selection
    pub charset: Charset,
    pub manual_chars: String, // ramp used when charset == Charset::Manual
    pub ignore_white: bool,   // pure white pixels become spaces, default false

    /// Dithering
    pub dithering: bool, // default false
    pub dither_algorithm: DitherAlgorithm,
    pub noise_seed: Option<u64>, // fixed seed for DitherAlgorithm::Noise; None = OS entropy

    /// Edge extraction
    pub edge_method: EdgeMethod,
    pub edge_threshold: f32, // 0..255, Sobel binarizer cutoff, default 100.0
    pub dog_threshold: f32,  // 0..255, contour magnitude cutoff, default 25.0
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            // Output geometry
            width: 100,
            blur_radius: 0.0,

            // Tone mapping
            brightness: 0.0,
            contrast: 0.0,
            invert: false,

            // Glyph selection
            charset: Charset::Standard,
            manual_chars: String::new(),
            ignore_white: false,

            // Dithering
            dithering: false,
            dither_algorithm: DitherAlgorithm::Floyd,
            noise_seed: None,

            // Edge extraction
            edge_method: EdgeMethod::None,
            edge_threshold: 100.0,
            dog_threshold: 25.0,
        }
    }
}

impl ConversionConfig {
    /// Validates the configuration parameters
    ///
    /// Only shape-like parameters can fail validation; numeric knobs
    /// outside their documented range are clamped where they are used.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.width == 0 {
            return Err(ConvertError::InvalidConfig(
                "width must be at least 1".to_string(),
            ));
        }
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "blur_radius must be a finite value >= 0, got {}",
                self.blur_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConversionConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = ConversionConfig {
            width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_blur_rejected() {
        let config = ConversionConfig {
            blur_radius: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConversionConfig {
            blur_radius: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_knobs_are_not_rejected() {
        // Brightness/contrast/thresholds are clamped at use, never rejected
        let config = ConversionConfig {
            brightness: 500.0,
            contrast: -500.0,
            edge_threshold: 9000.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
