//! Quantization strategies mapping continuous luminance onto a fixed
//! number of ramp levels.
//!
//! All four strategies consume and return a flat `width * height`
//! luminance field and are parameterized by `n_levels`, the glyph ramp
//! length. Callers guarantee `n_levels >= 2`; a one-glyph ramp skips
//! quantization entirely.

use rand::Rng;
use rayon::prelude::*;

/// Bayer 4x4 threshold matrix for ordered dithering.
#[rustfmt::skip]
const BAYER_4X4: [[f32; 4]; 4] = [
    [ 0.0,  8.0,  2.0, 10.0],
    [12.0,  4.0, 14.0,  6.0],
    [ 3.0, 11.0,  1.0,  9.0],
    [15.0,  7.0, 13.0,  5.0],
];

/// Snap a luminance value to the nearest of `n_levels` evenly spaced levels.
#[inline]
fn quantize(value: f32, n_levels: usize) -> f32 {
    let level = ((value / 255.0) * (n_levels - 1) as f32).round();
    let level = level.clamp(0.0, (n_levels - 1) as f32);
    level / (n_levels - 1) as f32 * 255.0
}

/// Add a clamped error share to a diffusion target.
#[inline]
fn diffuse(field: &mut [f32], idx: usize, amount: f32) {
    field[idx] = (field[idx] + amount).clamp(0.0, 255.0);
}

/// Floyd-Steinberg error diffusion
///
/// Raster scan, left-to-right, top-to-bottom. Each pixel is snapped to
/// the nearest level and its quantization error pushed onto the
/// not-yet-visited neighbors:
/// ```text
///        [*] 7/16
/// 3/16  5/16  1/16
/// ```
/// The scan mutates the working buffer it reads ahead from, so the
/// order is strict: a pixel must be finalized before its diffusion
/// targets are visited.
pub fn floyd_steinberg(gray: &[f32], width: usize, height: usize, n_levels: usize) -> Vec<f32> {
    assert!(n_levels >= 2, "error diffusion needs at least two levels");

    let mut field = gray.to_vec();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let quantized = quantize(field[idx], n_levels);
            let error = field[idx] - quantized;
            field[idx] = quantized;

            if x + 1 < width {
                diffuse(&mut field, idx + 1, error * 7.0 / 16.0);
            }
            if y + 1 < height {
                if x > 0 {
                    diffuse(&mut field, idx + width - 1, error * 3.0 / 16.0);
                }
                diffuse(&mut field, idx + width, error * 5.0 / 16.0);
                if x + 1 < width {
                    diffuse(&mut field, idx + width + 1, error * 1.0 / 16.0);
                }
            }
        }
    }

    field
}

/// Atkinson error diffusion
///
/// Same raster scan as Floyd-Steinberg but only 6/8 of the error is
/// propagated, an eighth to each of six neighbors (two ahead on the
/// row, three below, one two rows down). The discarded quarter gives
/// the characteristic lighter, higher-contrast look.
pub fn atkinson(gray: &[f32], width: usize, height: usize, n_levels: usize) -> Vec<f32> {
    assert!(n_levels >= 2, "error diffusion needs at least two levels");

    let mut field = gray.to_vec();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let quantized = quantize(field[idx], n_levels);
            let share = (field[idx] - quantized) / 8.0;
            field[idx] = quantized;

            if x + 1 < width {
                diffuse(&mut field, idx + 1, share);
            }
            if x + 2 < width {
                diffuse(&mut field, idx + 2, share);
            }
            if y + 1 < height {
                if x > 0 {
                    diffuse(&mut field, idx + width - 1, share);
                }
                diffuse(&mut field, idx + width, share);
                if x + 1 < width {
                    diffuse(&mut field, idx + width + 1, share);
                }
            }
            if y + 2 < height {
                diffuse(&mut field, idx + 2 * width, share);
            }
        }
    }

    field
}

/// Ordered (Bayer 4x4) dithering
///
/// No sequential dependency: each pixel is perturbed by the fixed
/// threshold matrix entry for its position, clamped, then floored into
/// one of `n_levels` buckets. Pixels are processed in parallel.
pub fn ordered(gray: &[f32], width: usize, _height: usize, n_levels: usize) -> Vec<f32> {
    assert!(n_levels >= 2, "quantization needs at least two levels");

    gray.par_iter()
        .enumerate()
        .map(|(idx, &value)| {
            let x = idx % width;
            let y = idx / width;

            let p = value / 255.0;
            let t = (BAYER_4X4[y % 4][x % 4] + 0.5) / 16.0 - 0.5;
            let perturbed = (p + t).clamp(0.0, 1.0);

            let level = ((perturbed * n_levels as f32) as usize).min(n_levels - 1);
            level as f32 / (n_levels - 1) as f32 * 255.0
        })
        .collect()
}

/// Random-noise dithering
///
/// Adds uniform noise in `+-255 / (2 * n_levels)` to each pixel before
/// snapping to the nearest level. The generator is injected by the
/// caller, so a fixed seed replays the exact same grid; the scan stays
/// single-threaded to keep the RNG stream order stable.
pub fn noise(gray: &[f32], n_levels: usize, rng: &mut impl Rng) -> Vec<f32> {
    assert!(n_levels >= 2, "quantization needs at least two levels");

    let amplitude = 255.0 / (2.0 * n_levels as f32);
    gray.iter()
        .map(|&value| {
            let perturbation = rng.random_range(-amplitude..=amplitude);
            quantize((value + perturbation).clamp(0.0, 255.0), n_levels)
        })
        .collect()
}
