//! Numeric primitives: Gaussian kernels, 2D convolution, Sobel gradients
//! and non-maximum suppression.
//!
//! Everything here operates on flat row-major `f32` fields
//! (`index = y * width + x`) and knows nothing about configuration.

use rayon::prelude::*;

/// Gradient magnitudes and orientations for a field.
///
/// `angle_degrees` holds undirected orientations in `[0, 180]`: an edge
/// at θ and one at θ+180 are the same edge.
#[derive(Debug, Clone)]
pub struct GradientField {
    pub magnitude: Vec<f32>,
    pub angle_degrees: Vec<f32>,
}

/// Build a normalized 2D Gaussian kernel
///
/// Entry (y, x) with offsets (dy, dx) from the center is
/// `exp(-(dx^2 + dy^2) / (2 * sigma^2))`; the matrix is normalized to
/// sum to 1 so convolution preserves overall field energy.
///
/// # Arguments
/// * `sigma` - Standard deviation of the Gaussian
/// * `size` - Side length of the kernel, must be odd
///
/// # Returns
/// Row-major `size * size` kernel
pub fn gaussian_kernel(sigma: f32, size: usize) -> Vec<f32> {
    assert!(size % 2 == 1, "kernel size must be odd");

    let half = (size / 2) as i32;
    let mut kernel = vec![0.0f32; size * size];
    let mut sum = 0.0f32;

    for ky in 0..size {
        for kx in 0..size {
            let dy = ky as i32 - half;
            let dx = kx as i32 - half;
            let value = (-((dx * dx + dy * dy) as f32) / (2.0 * sigma * sigma)).exp();
            kernel[ky * size + kx] = value;
            sum += value;
        }
    }

    for value in &mut kernel {
        *value /= sum;
    }

    kernel
}

/// Convolve a field with a square kernel
///
/// Source cells outside the field are treated as zero (zero padding,
/// not clamped or wrapped). Output has the same shape as the input.
/// Rows are computed in parallel; each output cell reads a read-only
/// neighborhood of the unmodified input.
///
/// # Arguments
/// * `field` - Input field, `width * height` values
/// * `width` - Field width in cells
/// * `height` - Field height in cells
/// * `kernel` - Row-major square kernel
/// * `size` - Kernel side length, must be odd
///
/// # Returns
/// Convolved field, same shape as the input
pub fn convolve2d(
    field: &[f32],
    width: usize,
    height: usize,
    kernel: &[f32],
    size: usize,
) -> Vec<f32> {
    assert_eq!(field.len(), width * height, "field length mismatch");
    assert_eq!(kernel.len(), size * size, "kernel length mismatch");

    let half = (size / 2) as i32;
    let mut output = vec![0.0f32; width * height];

    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for ky in 0..size {
                    for kx in 0..size {
                        let yy = y as i32 + ky as i32 - half;
                        let xx = x as i32 + kx as i32 - half;
                        if yy >= 0 && yy < height as i32 && xx >= 0 && xx < width as i32 {
                            sum += field[yy as usize * width + xx as usize]
                                * kernel[ky * size + kx];
                        }
                    }
                }
                *out = sum;
            }
        });

    output
}

/// Compute Sobel gradient magnitude and orientation
///
/// Applies the fixed 3x3 Sobel kernels to interior cells:
/// ```text
/// Gx:          Gy:
/// [-1  0  1]   [-1 -2 -1]
/// [-2  0  2]   [ 0  0  0]
/// [-1  0  1]   [ 1  2  1]
/// ```
/// Magnitude is `sqrt(Gx^2 + Gy^2)`; the angle is `atan2(Gy, Gx)` in
/// degrees folded into `[0, 180]` by adding 180 to negative values.
/// The one-cell border ring, where the window would leave the field,
/// keeps zero magnitude and angle.
///
/// # Arguments
/// * `field` - Input field, `width * height` values
/// * `width` - Field width in cells
/// * `height` - Field height in cells
///
/// # Returns
/// Gradient magnitudes and orientations, same shape as the input
pub fn sobel_gradient(field: &[f32], width: usize, height: usize) -> GradientField {
    assert_eq!(field.len(), width * height, "field length mismatch");

    let mut magnitude = vec![0.0f32; width * height];
    let mut angle_degrees = vec![0.0f32; width * height];

    if width < 3 || height < 3 {
        return GradientField {
            magnitude,
            angle_degrees,
        };
    }

    magnitude[width..width * (height - 1)]
        .par_chunks_mut(width)
        .zip(angle_degrees[width..width * (height - 1)].par_chunks_mut(width))
        .enumerate()
        .for_each(|(i, (mag_row, ang_row))| {
            let y = i + 1;
            for x in 1..width - 1 {
                let nw = field[(y - 1) * width + (x - 1)];
                let n = field[(y - 1) * width + x];
                let ne = field[(y - 1) * width + (x + 1)];
                let w = field[y * width + (x - 1)];
                let e = field[y * width + (x + 1)];
                let sw = field[(y + 1) * width + (x - 1)];
                let s = field[(y + 1) * width + x];
                let se = field[(y + 1) * width + (x + 1)];

                let gx = -nw + ne - 2.0 * w + 2.0 * e - sw + se;
                let gy = -nw - 2.0 * n - ne + sw + 2.0 * s + se;

                mag_row[x] = (gx * gx + gy * gy).sqrt();

                let mut theta = gy.atan2(gx).to_degrees();
                if theta < 0.0 {
                    theta += 180.0;
                }
                ang_row[x] = theta;
            }
        });

    GradientField {
        magnitude,
        angle_degrees,
    }
}

/// Thin gradient ridges to single-cell edges
///
/// Each interior cell's orientation is bucketed into one of four bins
/// (0, 45, 90, 135 degrees, each spanning +-22.5); its magnitude
/// survives only if it is >= both neighbors perpendicular to the edge
/// in that bin, otherwise it is zeroed. Border cells stay zero.
///
/// # Arguments
/// * `magnitude` - Gradient magnitudes
/// * `angle_degrees` - Orientations in `[0, 180]`
/// * `width` - Field width in cells
/// * `height` - Field height in cells
///
/// # Returns
/// Suppressed magnitude field, same shape as the input
pub fn non_max_suppression(
    magnitude: &[f32],
    angle_degrees: &[f32],
    width: usize,
    height: usize,
) -> Vec<f32> {
    assert_eq!(magnitude.len(), width * height, "field length mismatch");
    assert_eq!(angle_degrees.len(), width * height, "field length mismatch");

    let mut suppressed = vec![0.0f32; width * height];

    if width < 3 || height < 3 {
        return suppressed;
    }

    suppressed[width..width * (height - 1)]
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| {
            let y = i + 1;
            for x in 1..width - 1 {
                let idx = y * width + x;
                let mag = magnitude[idx];
                let theta = angle_degrees[idx];

                let (neighbor1, neighbor2) = if !(22.5..157.5).contains(&theta) {
                    // 0 degrees: edge runs vertically, compare left/right
                    (magnitude[idx - 1], magnitude[idx + 1])
                } else if theta < 67.5 {
                    // 45 degrees
                    (magnitude[idx - width + 1], magnitude[idx + width - 1])
                } else if theta < 112.5 {
                    // 90 degrees: edge runs horizontally, compare above/below
                    (magnitude[idx - width], magnitude[idx + width])
                } else {
                    // 135 degrees
                    (magnitude[idx - width - 1], magnitude[idx + width + 1])
                };

                row[x] = if mag >= neighbor1 && mag >= neighbor2 {
                    mag
                } else {
                    0.0
                };
            }
        });

    suppressed
}
