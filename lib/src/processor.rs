use image::RgbaImage;
use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::{ConversionConfig, DitherAlgorithm, EdgeMethod};
use crate::dither;
use crate::edges::{contour_text, sobel_threshold};
use crate::error::ConvertError;
use crate::tone::tone_map;

/// Convert an RGBA buffer to an ASCII art string
///
/// This drives the full pipeline:
/// 1. Tone map: BT.601 luminance with brightness/contrast/inversion
/// 2. Contour mode hands the field to the DoG tracer and returns its
///    text directly
/// 3. Otherwise, an optional Sobel threshold replaces the field with a
///    binary ink/blank one
/// 4. Optional dithering quantizes luminance onto the ramp levels
///    (skipped in Sobel mode, whose output is already binary)
/// 5. The glyph mapper indexes the ramp per pixel and assembles rows
///
/// The result holds one character per pixel column plus a trailing
/// newline per row: `(width + 1) * height` characters. A 0x0 buffer
/// (no drawable input) yields an empty string. The call is a pure
/// function of `(img, config)` unless noise dithering runs unseeded.
///
/// # Arguments
/// * `img` - Source RGBA buffer
/// * `config` - Conversion parameters
///
/// # Returns
/// The text grid, or an error for invalid configuration or an empty ramp
pub fn convert(img: &RgbaImage, config: &ConversionConfig) -> Result<String, ConvertError> {
    config.validate()?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        // Nothing was rasterized, so there is nothing to draw
        return Ok(String::new());
    }
    let width = width as usize;
    let height = height as usize;

    debug!(
        "converting {}x{} buffer (edges: {:?}, dithering: {}, charset: {})",
        width,
        height,
        config.edge_method,
        config.dithering,
        config.charset.name()
    );

    // Step 1: tone mapping
    let tone = tone_map(img, config.brightness, config.contrast, config.invert);

    // Step 2: contour mode produces the final text itself
    if config.edge_method == EdgeMethod::DogContour {
        trace!("contour branch, threshold {}", config.dog_threshold);
        return Ok(contour_text(
            &tone.adjusted,
            width,
            height,
            config.dog_threshold,
        ));
    }

    let ramp = config.charset.resolve(&config.manual_chars)?;
    let n_levels = ramp.len();

    let mut gray = tone.adjusted;

    // Step 3: optional binary edge pass, replacing the luminance field
    if config.edge_method == EdgeMethod::Sobel {
        trace!("sobel binarizer, threshold {}", config.edge_threshold);
        gray = sobel_threshold(&gray, width, height, config.edge_threshold);
    }

    // Step 4: optional dithering. The Sobel field is binary, so there
    // is nothing to dither there; one-glyph ramps have no levels to
    // quantize between
    if config.dithering && config.edge_method != EdgeMethod::Sobel && n_levels >= 2 {
        trace!("dithering with {:?}", config.dither_algorithm);
        gray = match config.dither_algorithm {
            DitherAlgorithm::Floyd => dither::floyd_steinberg(&gray, width, height, n_levels),
            DitherAlgorithm::Atkinson => dither::atkinson(&gray, width, height, n_levels),
            DitherAlgorithm::Ordered => dither::ordered(&gray, width, height, n_levels),
            DitherAlgorithm::Noise => {
                let mut rng = match config.noise_seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_rng(&mut rand::rng()),
                };
                dither::noise(&gray, n_levels, &mut rng)
            }
        };
    }

    // Step 5: glyph mapping
    Ok(render_glyphs(
        &gray,
        &tone.reference,
        width,
        height,
        &ramp,
        config.ignore_white,
    ))
}

/// Convert a raw RGBA byte slice to an ASCII art string
///
/// Validates the buffer shape first: `data.len()` must equal
/// `width * height * 4`. An entirely absent input (zero dimensions and
/// no bytes) is treated as "nothing to draw" and yields an empty
/// string rather than an error.
///
/// # Arguments
/// * `data` - Interleaved RGBA bytes, row-major
/// * `width` - Buffer width in pixels
/// * `height` - Buffer height in pixels
/// * `config` - Conversion parameters
pub fn convert_rgba_bytes(
    data: &[u8],
    width: u32,
    height: u32,
    config: &ConversionConfig,
) -> Result<String, ConvertError> {
    if (width == 0 || height == 0) && data.is_empty() {
        return Ok(String::new());
    }

    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || data.len() != expected {
        return Err(ConvertError::InvalidDimensions {
            width,
            height,
            len: data.len(),
        });
    }

    let img = RgbaImage::from_raw(width, height, data.to_vec()).ok_or(
        ConvertError::InvalidDimensions {
            width,
            height,
            len: data.len(),
        },
    )?;
    convert(&img, config)
}

/// Map a luminance field onto ramp glyphs and assemble the text grid
///
/// Per pixel: the ignore-white mask (tested against the retained
/// pre-edge/pre-dither field, exactly 255) wins first, then the level
/// index `round(gray / 255 * (n_levels - 1))`. A one-glyph ramp has no
/// levels to interpolate and emits its single glyph. Rows are built in
/// parallel, each newline-terminated.
fn render_glyphs(
    gray: &[f32],
    reference: &[f32],
    width: usize,
    height: usize,
    ramp: &[char],
    ignore_white: bool,
) -> String {
    let n_levels = ramp.len();

    let rows: Vec<String> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut row = String::with_capacity(width + 1);
            for x in 0..width {
                let idx = y * width + x;

                if ignore_white && reference[idx] == 255.0 {
                    row.push(' ');
                    continue;
                }

                let ch = if n_levels == 1 {
                    ramp[0]
                } else {
                    let level = ((gray[idx] / 255.0) * (n_levels - 1) as f32).round() as usize;
                    ramp[level.min(n_levels - 1)]
                };
                row.push(ch);
            }
            row.push('\n');
            row
        })
        .collect();

    rows.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;
    use image::Rgba;

    fn uniform(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    fn gradient_row(width: u32) -> RgbaImage {
        let mut img = RgbaImage::new(width, 1);
        for x in 0..width {
            let v = (x as f32 / (width - 1) as f32 * 255.0).round() as u8;
            img.put_pixel(x, 0, Rgba([v, v, v, 255]));
        }
        img
    }

    #[test]
    fn test_output_shape_invariant() {
        let config = ConversionConfig::default();
        for &(w, h) in &[(1u32, 1u32), (4, 4), (13, 7), (32, 9)] {
            let img = uniform(w, h, 77);
            let out = convert(&img, &config).unwrap();
            assert_eq!(out.chars().count(), ((w + 1) * h) as usize);
            assert_eq!(out.lines().count(), h as usize);
            assert!(out.ends_with('\n'));
        }
    }

    #[test]
    fn test_shape_invariant_holds_across_modes() {
        let img = uniform(16, 12, 90);
        let configs = [
            ConversionConfig {
                edge_method: EdgeMethod::Sobel,
                ..Default::default()
            },
            ConversionConfig {
                edge_method: EdgeMethod::DogContour,
                ..Default::default()
            },
            ConversionConfig {
                dithering: true,
                dither_algorithm: DitherAlgorithm::Ordered,
                ..Default::default()
            },
        ];
        for config in configs {
            let out = convert(&img, &config).unwrap();
            assert_eq!(out.chars().count(), 17 * 12);
        }
    }

    #[test]
    fn test_deterministic_without_noise() {
        let img = gradient_row(64);
        for algorithm in [
            DitherAlgorithm::Floyd,
            DitherAlgorithm::Atkinson,
            DitherAlgorithm::Ordered,
        ] {
            let config = ConversionConfig {
                dithering: true,
                dither_algorithm: algorithm,
                ..Default::default()
            };
            let a = convert(&img, &config).unwrap();
            let b = convert(&img, &config).unwrap();
            assert_eq!(a, b);
        }

        let contour = ConversionConfig {
            edge_method: EdgeMethod::DogContour,
            ..Default::default()
        };
        let img = uniform(20, 20, 128);
        assert_eq!(
            convert(&img, &contour).unwrap(),
            convert(&img, &contour).unwrap()
        );
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let img = gradient_row(64);
        let config = ConversionConfig {
            dithering: true,
            dither_algorithm: DitherAlgorithm::Noise,
            noise_seed: Some(42),
            ..Default::default()
        };
        assert_eq!(
            convert(&img, &config).unwrap(),
            convert(&img, &config).unwrap()
        );
    }

    #[test]
    fn test_mid_gray_scenario() {
        // 4x4 mid-gray with an 11-glyph ramp: every pixel quantizes to
        // level round(128/255 * 10) = 5, the sixth glyph
        let img = uniform(4, 4, 128);
        let config = ConversionConfig {
            charset: Charset::Manual,
            manual_chars: "  .:-=+*#%@".to_string(),
            ..Default::default()
        };
        let out = convert(&img, &config).unwrap();
        assert_eq!(out, "====\n====\n====\n====\n");
    }

    #[test]
    fn test_single_glyph_ramp_never_panics() {
        let img = gradient_row(16);
        let config = ConversionConfig {
            charset: Charset::Manual,
            manual_chars: "#".to_string(),
            dithering: true,
            ..Default::default()
        };
        let out = convert(&img, &config).unwrap();
        assert_eq!(out, format!("{}\n", "#".repeat(16)));
    }

    #[test]
    fn test_ignore_white_masks_fully_white_buffer() {
        let img = uniform(6, 3, 255);
        for dithering in [false, true] {
            let config = ConversionConfig {
                ignore_white: true,
                dithering,
                ..Default::default()
            };
            let out = convert(&img, &config).unwrap();
            assert!(out.chars().all(|c| c == ' ' || c == '\n'));
        }
    }

    #[test]
    fn test_ignore_white_single_pixel() {
        let img = uniform(1, 1, 255);
        let config = ConversionConfig {
            ignore_white: true,
            charset: Charset::Manual,
            manual_chars: "@#".to_string(),
            ..Default::default()
        };
        assert_eq!(convert(&img, &config).unwrap(), " \n");
    }

    #[test]
    fn test_invert_matches_photometric_negative() {
        let img = gradient_row(32);
        let mut negative = RgbaImage::new(32, 1);
        for (x, _, px) in img.enumerate_pixels() {
            negative.put_pixel(x, 0, Rgba([255 - px[0], 255 - px[1], 255 - px[2], px[3]]));
        }

        let inverted = ConversionConfig {
            invert: true,
            ..Default::default()
        };
        let plain = ConversionConfig::default();
        assert_eq!(
            convert(&img, &inverted).unwrap(),
            convert(&negative, &plain).unwrap()
        );
    }

    #[test]
    fn test_sobel_mode_uses_only_ramp_endpoints() {
        let mut img = uniform(16, 16, 255);
        for y in 0..16 {
            for x in 0..8 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }

        // Dithering request is ignored in sobel mode
        let config = ConversionConfig {
            edge_method: EdgeMethod::Sobel,
            edge_threshold: 50.0,
            dithering: true,
            ..Default::default()
        };
        let out = convert(&img, &config).unwrap();

        let ramp: Vec<char> = crate::charset::STANDARD_RAMP.chars().collect();
        let ink = ramp[0];
        let blank = ramp[ramp.len() - 1];
        assert!(out.chars().all(|c| c == ink || c == blank || c == '\n'));
        assert!(out.contains(ink));
    }

    #[test]
    fn test_contour_mode_alphabet() {
        let mut img = uniform(24, 20, 230);
        for y in 0..20 {
            for x in 0..12 {
                img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
            }
        }

        let config = ConversionConfig {
            edge_method: EdgeMethod::DogContour,
            dog_threshold: 10.0,
            ..Default::default()
        };
        let out = convert(&img, &config).unwrap();
        assert!(
            out.chars()
                .all(|c| matches!(c, '-' | '/' | '|' | '\\' | ' ' | '\n'))
        );
    }

    #[test]
    fn test_floyd_gradient_row_energy() {
        let width = 256u32;
        let img = gradient_row(width);
        let config = ConversionConfig {
            charset: Charset::Manual,
            manual_chars: " #".to_string(),
            dithering: true,
            dither_algorithm: DitherAlgorithm::Floyd,
            ..Default::default()
        };
        let out = convert(&img, &config).unwrap();

        let ink = out.chars().filter(|&c| c == '#').count();
        let expected = width as usize / 2;
        assert!(
            ink.abs_diff(expected) <= width as usize / 8,
            "ink count {} too far from {}",
            ink,
            expected
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let img = RgbaImage::new(0, 0);
        let out = convert(&img, &ConversionConfig::default()).unwrap();
        assert_eq!(out, "");

        let out = convert_rgba_bytes(&[], 0, 0, &ConversionConfig::default()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_raw_entry_validates_shape() {
        let config = ConversionConfig::default();

        // Length mismatch
        let err = convert_rgba_bytes(&[0u8; 15], 2, 2, &config).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDimensions { .. }));

        // Zero dimension with a non-empty buffer
        let err = convert_rgba_bytes(&[0u8; 16], 0, 4, &config).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_raw_entry_matches_image_entry() {
        let img = gradient_row(16);
        let config = ConversionConfig::default();
        let from_raw = convert_rgba_bytes(img.as_raw(), 16, 1, &config).unwrap();
        let from_img = convert(&img, &config).unwrap();
        assert_eq!(from_raw, from_img);
    }

    #[test]
    fn test_empty_manual_charset_is_an_error() {
        let img = uniform(2, 2, 128);
        let config = ConversionConfig {
            charset: Charset::Manual,
            manual_chars: String::new(),
            ..Default::default()
        };
        assert_eq!(convert(&img, &config), Err(ConvertError::EmptyCharset));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let img = uniform(2, 2, 128);
        let config = ConversionConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            convert(&img, &config),
            Err(ConvertError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_black_and_white_map_to_ramp_endpoints() {
        let config = ConversionConfig::default();

        let out = convert(&uniform(3, 1, 0), &config).unwrap();
        assert_eq!(out, "   \n");

        let out = convert(&uniform(3, 1, 255), &config).unwrap();
        assert_eq!(out, "@@@\n");
    }
}
