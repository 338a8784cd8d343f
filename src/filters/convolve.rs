//! Weighted convolution over the edge-clamped neighborhood.
//!
//! With one kernel each channel becomes `clamp(Σ w · src + bias)`.
//! With two kernels the directional responses are combined by magnitude,
//! `clamp(sqrt(r1² + r2²) + bias)`. Every channel, alpha included, is convolved.

use ndarray::{Array3, ArrayView3};

use super::core::{clamp_coords, map_pixels};
use super::kernel::Kernel;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn response(
    input: &ArrayView3<u8>,
    taps: &[(isize, isize, f32)],
    x: usize,
    y: usize,
    c: usize,
) -> f32 {
    let (height, width, _) = input.dim();
    let mut sum = 0.0f32;
    for &(dx, dy, w) in taps {
        let (sx, sy) = clamp_coords(width, height, x as isize + dx, y as isize + dy);
        sum += w * input[[sy, sx, c]] as f32;
    }
    sum
}

/// Convolve `input` with a single kernel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `kernel` - Weights applied around each pixel
/// * `bias` - Added to every response before clamping
///
/// # Returns
/// New image with the same shape as `input`
pub fn convolve(input: ArrayView3<u8>, kernel: &Kernel, bias: f32) -> Array3<u8> {
    let taps = kernel.taps();

    map_pixels(input, |x, y, out| {
        for (c, v) in out.iter_mut().enumerate() {
            *v = to_u8(response(&input, &taps, x, y, c) + bias);
        }
    })
}

/// Convolve `input` with two directional kernels and combine by magnitude.
///
/// Used for Sobel edge detection: flat regions map to 0, edges to high values.
pub fn convolve_magnitude(
    input: ArrayView3<u8>,
    first: &Kernel,
    second: &Kernel,
    bias: f32,
) -> Array3<u8> {
    let taps1 = first.taps();
    let taps2 = second.taps();

    map_pixels(input, |x, y, out| {
        for (c, v) in out.iter_mut().enumerate() {
            let r1 = response(&input, &taps1, x, y, c);
            let r2 = response(&input, &taps2, x, y, c);
            *v = to_u8((r1 * r1 + r2 * r2).sqrt() + bias);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(height: usize, width: usize, value: [u8; 4]) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 4), |(_, _, c)| value[c])
    }

    #[test]
    fn test_box_blur_center_is_mean() {
        let values = [10u8, 20, 30, 40, 50, 60, 70, 80, 90];
        let img = Array3::from_shape_fn((3, 3, 1), |(y, x, _)| values[y * 3 + x]);

        let result = convolve(img.view(), &Kernel::box_blur(1).unwrap(), 0.0);

        assert_eq!(result[[1, 1, 0]], 50);
    }

    #[test]
    fn test_box_blur_edge_replication() {
        let values = [10u8, 20, 30, 40, 50, 60, 70, 80, 90];
        let img = Array3::from_shape_fn((3, 3, 1), |(y, x, _)| values[y * 3 + x]);

        let result = convolve(img.view(), &Kernel::box_blur(1).unwrap(), 0.0);

        // Corner window: 10 x4, 20 x2, 40 x2, 50
        let expected = ((10.0 * 4.0 + 20.0 * 2.0 + 40.0 * 2.0 + 50.0) / 9.0f32).round() as u8;
        assert_eq!(result[[0, 0, 0]], expected);
    }

    #[test]
    fn test_blur_preserves_uniform_color() {
        let img = uniform(6, 5, [37, 128, 251, 200]);
        for radius in 0..4 {
            let result = convolve(img.view(), &Kernel::box_blur(radius).unwrap(), 0.0);
            assert_eq!(result, img, "box blur radius {radius}");
        }

        let result = convolve(img.view(), &Kernel::gaussian(2, 3.0).unwrap(), 0.0);
        assert_eq!(result, img);
    }

    #[test]
    fn test_sharpen_clamps() {
        let mut img = uniform(3, 3, [0, 0, 0, 255]);
        img[[1, 1, 0]] = 100;

        let result = convolve(img.view(), &Kernel::strong_sharpen(), 0.0);

        assert_eq!(result[[1, 1, 0]], 255);
        assert_eq!(result[[0, 1, 0]], 0);
        assert_eq!(result[[1, 1, 3]], 255);
    }

    #[test]
    fn test_emboss_bias() {
        let img = uniform(4, 4, [100, 100, 100, 255]);

        let flat = convolve(img.view(), &Kernel::emboss(), 0.0);
        assert_eq!(flat[[2, 2, 0]], 0);

        let biased = convolve(img.view(), &Kernel::emboss(), 128.0);
        assert_eq!(biased[[2, 2, 0]], 128);
    }

    #[test]
    fn test_sobel_uniform_is_zero() {
        let img = uniform(5, 5, [90, 180, 45, 255]);

        let result = convolve_magnitude(img.view(), &Kernel::sobel_x(), &Kernel::sobel_y(), 0.0);

        assert!(result.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sobel_detects_vertical_edge() {
        let img = Array3::from_shape_fn((5, 6, 1), |(_, x, _)| if x < 3 { 0u8 } else { 100 });

        let result = convolve_magnitude(img.view(), &Kernel::sobel_x(), &Kernel::sobel_y(), 0.0);

        assert_eq!(result[[2, 0, 0]], 0);
        assert_eq!(result[[2, 2, 0]], 255);
        assert_eq!(result[[2, 5, 0]], 0);
    }
}
