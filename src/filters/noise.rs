//! Noise reduction: order-statistic Median filter.
//!
//! The median is taken per channel over a `(2r + 1)²` window with
//! edge-clamped sampling. Unlike a blur it is not a weighted sum: single
//! outliers are dropped and edges stay sharp.

use ndarray::{Array3, ArrayView3};

use super::core::{clamp_coords, map_pixels, window_size};
use crate::error::Result;

/// Window radius used unless the caller picks one (3x3 window).
pub const DEFAULT_MEDIAN_RADIUS: usize = 1;

/// Check that a `(2r + 1)²` median window can be addressed.
///
/// # Errors
/// The window size overflows `usize`.
pub fn validate_radius(radius: usize) -> Result<usize> {
    window_size(radius).map(|_| radius)
}

/// Apply median filter.
///
/// Removes salt-and-pepper noise while preserving edges.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `radius` - Window radius; 0 returns a copy. Must pass [`validate_radius`].
///
/// # Returns
/// Median-filtered image with same channel count
pub fn median(input: ArrayView3<u8>, radius: usize) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let r = radius as isize;
    let capacity = window_size(radius).map_or(0, |(_, len)| len);

    map_pixels(input, |x, y, out| {
        let mut values: Vec<u8> = Vec::with_capacity(capacity);

        for (c, v) in out.iter_mut().enumerate() {
            values.clear();
            for dy in -r..=r {
                for dx in -r..=r {
                    let (sx, sy) = clamp_coords(width, height, x as isize + dx, y as isize + dy);
                    values.push(input[[sy, sx, c]]);
                }
            }

            let mid = values.len() / 2;
            let (_, m, _) = values.select_nth_unstable(mid);
            *v = *m;
        }
    })
}
