//! Global-statistics filters: histogram stretch and perfect reflector.
//!
//! Both run in two phases. The first phase scans the whole image for
//! per-channel statistics; only after it completes does the second phase remap
//! each pixel.
//!
//! Colour channels are remapped, alpha (if present) is preserved.

use log::trace;
use ndarray::{Array3, ArrayView3};

use super::core::{color_channels, reduce_then_map, ChannelRange};

#[inline]
fn scale(v: u8, offset: u8, range: u8) -> u8 {
    let scaled = (v - offset) as f32 * 255.0 / range as f32;
    scaled.round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Histogram stretch
// ============================================================================

/// Stretch every colour channel so its observed range covers 0-255.
///
/// `out = round((v - min) * 255 / (max - min))`. A channel whose minimum
/// equals its maximum is passed through unchanged.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
///
/// # Returns
/// Stretched image with same channel count
pub fn stretch_histogram(input: ArrayView3<u8>) -> Array3<u8> {
    let color = color_channels(input.dim().2);

    reduce_then_map(
        input,
        |image| {
            let range = ChannelRange::of(image);
            trace!("histogram stretch: min {:?}, max {:?}", range.min, range.max);
            range
        },
        |range, src, out| {
            out.copy_from_slice(src);
            for c in 0..color {
                let (lo, hi) = (range.min[c], range.max[c]);
                if hi > lo {
                    out[c] = scale(src[c], lo, hi - lo);
                }
            }
        },
    )
}

// ============================================================================
// Perfect reflector
// ============================================================================

/// White-balance against the brightest value seen in each colour channel.
///
/// `out = round(v * 255 / max)`. A channel that is black everywhere is passed
/// through unchanged.
pub fn perfect_reflector(input: ArrayView3<u8>) -> Array3<u8> {
    let color = color_channels(input.dim().2);

    reduce_then_map(
        input,
        |image| {
            let range = ChannelRange::of(image);
            trace!("perfect reflector: max {:?}", range.max);
            range.max
        },
        |max, src, out| {
            out.copy_from_slice(src);
            for c in 0..color {
                if max[c] > 0 {
                    out[c] = scale(src[c], 0, max[c]);
                }
            }
        },
    )
}
