//! Core utilities shared by every neighborhood filter.
//!
//! This module provides:
//! - Boundary-clamped pixel access (edge replication)
//! - Single-pixel traversal into a freshly allocated output
//! - Two-phase traversal (whole-image reduction, then per-pixel map)
//!
//! The source is always an immutable view and the destination a separate
//! allocation, so traversal order never matters. Rows are written in parallel
//! with Rayon.

use ndarray::{s, Array3, ArrayView1, ArrayView3};
use rayon::prelude::*;

use crate::error::{FilterError, Result};

/// Number of channels a colour operation touches.
///
/// Alpha (the 4th channel of RGBA) is excluded.
#[inline]
pub fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Map a possibly out-of-range coordinate to the nearest in-range pixel.
///
/// `width` and `height` must be non-zero.
#[inline]
pub fn clamp_coords(width: usize, height: usize, x: isize, y: isize) -> (usize, usize) {
    let sx = x.clamp(0, width as isize - 1) as usize;
    let sy = y.clamp(0, height as isize - 1) as usize;
    (sx, sy)
}

/// Side and cell count of a `(2 * radius + 1)²` window.
///
/// # Errors
/// [`FilterError::InvalidParameter`] if either value overflows `usize`.
pub fn window_size(radius: usize) -> Result<(usize, usize)> {
    radius
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .and_then(|side| Some((side, side.checked_mul(side)?)))
        .ok_or_else(|| FilterError::parameter("radius", radius, "window size overflows"))
}

/// Read one channel at `(x, y)` with edge replication.
#[inline]
pub fn sample_channel(image: &ArrayView3<u8>, x: isize, y: isize, c: usize) -> u8 {
    sample(image, x, y)[c]
}

/// Read the whole pixel at `(x, y)` with edge replication.
///
/// Total over all integer coordinates for any non-empty image. This is the
/// public accessor; the per-pixel loops of the operators call
/// [`clamp_coords`] directly and index the source without building a view.
pub fn sample<'a>(image: &ArrayView3<'a, u8>, x: isize, y: isize) -> ArrayView1<'a, u8> {
    let (height, width, _) = image.dim();
    let (sx, sy) = clamp_coords(width, height, x, y);
    let view: ArrayView3<'a, u8> = *image;
    view.slice_move(s![sy, sx, ..])
}

#[inline]
fn is_empty(height: usize, width: usize, channels: usize) -> bool {
    height == 0 || width == 0 || channels == 0
}

/// Run a per-pixel rule over every coordinate of `input`.
///
/// `per_pixel(x, y, out)` receives the output pixel slice (one entry per
/// channel) and must fill it from the read-only source alone.
pub fn map_pixels<F>(input: ArrayView3<u8>, per_pixel: F) -> Array3<u8>
where
    F: Fn(usize, usize, &mut [u8]) + Sync,
{
    let (height, width, channels) = input.dim();
    if is_empty(height, width, channels) {
        return Array3::<u8>::zeros((height, width, channels));
    }

    let mut output_flat = vec![0u8; height * width * channels];
    output_flat
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.chunks_mut(channels).enumerate() {
                per_pixel(x, y, pixel);
            }
        });

    Array3::from_shape_vec((height, width, channels), output_flat)
        .expect("Shape mismatch in map_pixels")
}

/// Reduce the whole image, then map every pixel using the reduction.
///
/// The reduction is fully computed before the first pixel is mapped.
pub fn reduce_then_map<R, Reduce, Map>(
    input: ArrayView3<u8>,
    reduce: Reduce,
    map: Map,
) -> Array3<u8>
where
    R: Sync,
    Reduce: FnOnce(&ArrayView3<u8>) -> R,
    Map: Fn(&R, &[u8], &mut [u8]) + Sync,
{
    let (height, width, channels) = input.dim();
    if is_empty(height, width, channels) {
        return Array3::<u8>::zeros((height, width, channels));
    }

    let stats = reduce(&input);

    map_pixels(input, |x, y, out| {
        let src = input.slice(s![y, x, ..]);
        match src.as_slice() {
            Some(pixel) => map(&stats, pixel, out),
            None => {
                let pixel = src.to_vec();
                map(&stats, &pixel, out)
            }
        }
    })
}

/// Per-channel minimum and maximum over the whole image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRange {
    pub min: Vec<u8>,
    pub max: Vec<u8>,
}

impl ChannelRange {
    fn empty(channels: usize) -> Self {
        ChannelRange {
            min: vec![u8::MAX; channels],
            max: vec![u8::MIN; channels],
        }
    }

    fn merge(mut self, other: ChannelRange) -> Self {
        for c in 0..self.min.len() {
            self.min[c] = self.min[c].min(other.min[c]);
            self.max[c] = self.max[c].max(other.max[c]);
        }
        self
    }

    /// Scan every pixel of `input` (rows in parallel).
    pub fn of(input: &ArrayView3<u8>) -> Self {
        let (height, width, channels) = input.dim();

        (0..height)
            .into_par_iter()
            .map(|y| {
                let mut range = ChannelRange::empty(channels);
                for x in 0..width {
                    for c in 0..channels {
                        let v = input[[y, x, c]];
                        range.min[c] = range.min[c].min(v);
                        range.max[c] = range.max[c].max(v);
                    }
                }
                range
            })
            .reduce(|| ChannelRange::empty(channels), ChannelRange::merge)
    }
}
