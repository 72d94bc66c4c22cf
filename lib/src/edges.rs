use rayon::prelude::*;

use crate::kernel::{convolve2d, gaussian_kernel, non_max_suppression, sobel_gradient};

/// Theoretical maximum 3x3 Sobel response for 8-bit input, used to
/// normalize raw magnitudes into the 0-255 range.
const SOBEL_MAX_RESPONSE: f32 = 1442.0;

/// Fixed DoG scales; the contour look is tuned via the threshold knob.
const DOG_SIGMA_NARROW: f32 = 0.5;
const DOG_SIGMA_WIDE: f32 = 1.0;
const DOG_KERNEL_SIZE: usize = 3;

/// Luminance value emitted for edge pixels (ink) by the Sobel binarizer.
pub const EDGE_INK: f32 = 0.0;
/// Luminance value emitted for non-edge pixels (blank).
pub const EDGE_BLANK: f32 = 255.0;

/// Binarize a luminance field with a Sobel magnitude threshold
///
/// Interior pixels whose normalized gradient magnitude exceeds
/// `threshold` become [`EDGE_INK`], everything else [`EDGE_BLANK`].
/// The border ring, where the 3x3 window would leave the field, stays
/// blank. The result replaces the luminance field; it is binary, so
/// dithering never applies after this pass.
///
/// # Arguments
/// * `gray` - Tone-mapped luminance, `width * height` values in [0, 255]
/// * `width` - Field width
/// * `height` - Field height
/// * `threshold` - Cutoff on the 0-255 normalized magnitude, clamped
///
/// # Returns
/// Binary ink/blank field, same shape as the input
pub fn sobel_threshold(gray: &[f32], width: usize, height: usize, threshold: f32) -> Vec<f32> {
    assert_eq!(gray.len(), width * height, "field length mismatch");

    let mut edges = vec![EDGE_BLANK; width * height];
    if width < 3 || height < 3 {
        return edges;
    }

    let threshold = threshold.clamp(0.0, 255.0);

    edges[width..width * (height - 1)]
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| {
            let y = i + 1;
            for x in 1..width - 1 {
                let nw = gray[(y - 1) * width + (x - 1)];
                let n = gray[(y - 1) * width + x];
                let ne = gray[(y - 1) * width + (x + 1)];
                let w = gray[y * width + (x - 1)];
                let e = gray[y * width + (x + 1)];
                let sw = gray[(y + 1) * width + (x - 1)];
                let s = gray[(y + 1) * width + x];
                let se = gray[(y + 1) * width + (x + 1)];

                let gx = -nw + ne - 2.0 * w + 2.0 * e - sw + se;
                let gy = -nw - 2.0 * n - ne + sw + 2.0 * s + se;

                let normalized = (gx * gx + gy * gy).sqrt() / SOBEL_MAX_RESPONSE * 255.0;
                row[x] = if normalized > threshold {
                    EDGE_INK
                } else {
                    EDGE_BLANK
                };
            }
        });

    edges
}

/// Band-pass a field by subtracting two Gaussian blurs
///
/// DoG = blur(sigma_narrow) - blur(sigma_wide). Smooth regions cancel
/// out; responses survive only around luminance transitions.
pub fn difference_of_gaussians(
    gray: &[f32],
    width: usize,
    height: usize,
    sigma_narrow: f32,
    sigma_wide: f32,
    kernel_size: usize,
) -> Vec<f32> {
    let narrow_kernel = gaussian_kernel(sigma_narrow, kernel_size);
    let wide_kernel = gaussian_kernel(sigma_wide, kernel_size);

    let narrow = convolve2d(gray, width, height, &narrow_kernel, kernel_size);
    let wide = convolve2d(gray, width, height, &wide_kernel, kernel_size);

    narrow.iter().zip(&wide).map(|(a, b)| a - b).collect()
}

/// Pick the directional glyph for an edge orientation
///
/// The orientation is rotated by 90 degrees so the glyph follows the
/// edge itself rather than its gradient, then bucketed into the same
/// four 45-degree bins non-maximum suppression uses.
fn direction_glyph(angle_degrees: f32) -> char {
    let adjusted = (angle_degrees + 90.0) % 180.0;
    if !(22.5..157.5).contains(&adjusted) {
        '-'
    } else if adjusted < 67.5 {
        '/'
    } else if adjusted < 112.5 {
        '|'
    } else {
        '\\'
    }
}

/// Trace contours and render them directly to text
///
/// Pipeline: DoG band-pass at fixed scales, Sobel gradient, non-maximum
/// suppression, then one glyph per pixel: a directional stroke from
/// `{-, /, |, \}` where the thinned magnitude exceeds `threshold`, a
/// space everywhere else. Rows are newline-terminated, the last one
/// included. The glyph ramp plays no part in this mode.
///
/// # Arguments
/// * `gray` - Tone-mapped luminance, `width * height` values in [0, 255]
/// * `width` - Field width
/// * `height` - Field height
/// * `threshold` - Cutoff on the suppressed magnitude, clamped to 0-255
///
/// # Returns
/// The final text grid, `(width + 1) * height` characters
pub fn contour_text(gray: &[f32], width: usize, height: usize, threshold: f32) -> String {
    assert_eq!(gray.len(), width * height, "field length mismatch");

    let dog = difference_of_gaussians(
        gray,
        width,
        height,
        DOG_SIGMA_NARROW,
        DOG_SIGMA_WIDE,
        DOG_KERNEL_SIZE,
    );
    let grad = sobel_gradient(&dog, width, height);
    let suppressed = non_max_suppression(&grad.magnitude, &grad.angle_degrees, width, height);

    let threshold = threshold.clamp(0.0, 255.0);

    let mut text = String::with_capacity((width + 1) * height);
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if suppressed[idx] > threshold {
                text.push(direction_glyph(grad.angle_degrees[idx]));
            } else {
                text.push(' ');
            }
        }
        text.push('\n');
    }

    text
}
