//! Tone mapping: grayscale conversion with brightness/contrast shaping.

use image::RgbaImage;
use rayon::prelude::*;

/// Tone-mapped luminance for one conversion call.
///
/// `adjusted` feeds the downstream stages. `reference` is the same
/// values before any edge or dither pass touches them; the glyph mapper
/// tests it against pure white for the ignore-white mask.
#[derive(Debug, Clone)]
pub struct ToneField {
    pub adjusted: Vec<f32>,
    pub reference: Vec<f32>,
}

/// Convert a pixel to luminance using ITU-R BT.601 weights
///
/// Formula: L = 0.299*R + 0.587*G + 0.114*B, in [0, 255].
/// The alpha channel does not participate.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Contrast scaling factor for a contrast setting
///
/// Classic photo contrast formula `259*(c+255) / (255*(259-c))`. The
/// formula has a pole at c = 259; the input is clamped to the
/// documented [-100, 100] range first, which keeps it well clear.
pub fn contrast_factor(contrast: f32) -> f32 {
    let c = contrast.clamp(-100.0, 100.0);
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Tone map an RGBA buffer into a luminance field
///
/// Per pixel: BT.601 luminance, optional inversion (255 - L), then
/// `factor * (L - 128) + 128 + brightness` clamped to [0, 255].
/// Pixels are independent and processed in parallel.
///
/// # Arguments
/// * `img` - Source RGBA buffer
/// * `brightness` - Additive shift, clamped to [-100, 100]
/// * `contrast` - Contrast setting, clamped to [-100, 100]
/// * `invert` - Invert luminance before shaping
///
/// # Returns
/// The adjusted field plus the retained pre-edge/pre-dither copy
pub fn tone_map(img: &RgbaImage, brightness: f32, contrast: f32, invert: bool) -> ToneField {
    let factor = contrast_factor(contrast);
    let brightness = brightness.clamp(-100.0, 100.0);

    let adjusted: Vec<f32> = img
        .as_raw()
        .par_chunks_exact(4)
        .map(|px| {
            let mut lum = luminance(px[0], px[1], px[2]);
            if invert {
                lum = 255.0 - lum;
            }
            (factor * (lum - 128.0) + 128.0 + brightness).clamp(0.0, 255.0)
        })
        .collect();

    let reference = adjusted.clone();
    ToneField {
        adjusted,
        reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert_eq!(luminance(255, 255, 255), 255.0);
        // Green dominates the perceived brightness
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
    }

    #[test]
    fn test_contrast_factor_neutral() {
        assert_eq!(contrast_factor(0.0), 1.0);
    }

    #[test]
    fn test_contrast_factor_monotonic() {
        assert!(contrast_factor(50.0) > contrast_factor(0.0));
        assert!(contrast_factor(-50.0) < contrast_factor(0.0));
        assert!(contrast_factor(-50.0) > 0.0);
    }

    #[test]
    fn test_contrast_factor_clamps_away_from_pole() {
        // Values beyond the documented range behave like the range edge
        assert_eq!(contrast_factor(300.0), contrast_factor(100.0));
        assert!(contrast_factor(300.0).is_finite());
    }

    #[test]
    fn test_tone_map_neutral_settings_keep_white() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        let tone = tone_map(&img, 0.0, 0.0, false);
        assert!(tone.adjusted.iter().all(|&v| v == 255.0));
        assert!(tone.reference.iter().all(|&v| v == 255.0));
    }

    #[test]
    fn test_tone_map_invert() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let tone = tone_map(&img, 0.0, 0.0, true);
        assert!(tone.adjusted.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tone_map_brightness_shift() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        let brighter = tone_map(&img, 40.0, 0.0, false);
        let baseline = tone_map(&img, 0.0, 0.0, false);
        assert!((brighter.adjusted[0] - baseline.adjusted[0] - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_tone_map_output_stays_in_range() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([250, 250, 250, 255]));
        let tone = tone_map(&img, 100.0, 100.0, false);
        assert!(tone.adjusted.iter().all(|&v| (0.0..=255.0).contains(&v)));

        let tone = tone_map(&img, -100.0, 100.0, true);
        assert!(tone.adjusted.iter().all(|&v| (0.0..=255.0).contains(&v)));
    }

    #[test]
    fn test_tone_map_contrast_pushes_from_midpoint() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 255]));
        let punchy = tone_map(&img, 0.0, 60.0, false);
        let baseline = tone_map(&img, 0.0, 0.0, false);
        // Above-midpoint values move up as contrast increases
        assert!(punchy.adjusted[0] > baseline.adjusted[0]);
    }
}
