//! Stylize filters: Wave.
//!
//! The wave filter shifts each row horizontally by
//! `amplitude * sin(2π * y / period)` and resamples with edge clamping.
//! It moves pixels but never mixes them, so every output pixel is a copy of
//! one source pixel (alpha included).

use std::f32::consts::PI;

use ndarray::{Array3, ArrayView3};

use super::core::{clamp_coords, map_pixels};
use crate::error::{FilterError, Result};

pub const DEFAULT_WAVE_AMPLITUDE: f32 = 20.0;
pub const DEFAULT_WAVE_PERIOD: f32 = 60.0;

/// Parameters of the horizontal wave distortion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    amplitude: f32,
    period: f32,
}

impl Wave {
    /// # Errors
    /// `amplitude` must be finite and `period` finite and non-zero.
    pub fn new(amplitude: f32, period: f32) -> Result<Self> {
        if !amplitude.is_finite() {
            return Err(FilterError::parameter("amplitude", amplitude, "must be finite"));
        }
        if !period.is_finite() || period == 0.0 {
            return Err(FilterError::parameter("period", period, "must be finite and non-zero"));
        }
        Ok(Wave { amplitude, period })
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Horizontal source offset for row `y`.
    #[inline]
    pub fn shift(&self, y: usize) -> isize {
        (self.amplitude * (2.0 * PI * y as f32 / self.period).sin()).round() as isize
    }
}

impl Default for Wave {
    fn default() -> Self {
        Wave {
            amplitude: DEFAULT_WAVE_AMPLITUDE,
            period: DEFAULT_WAVE_PERIOD,
        }
    }
}

/// Apply the wave distortion.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `wave` - Amplitude and period of the row shift
///
/// # Returns
/// Distorted image with same shape
pub fn wave(input: ArrayView3<u8>, wave: &Wave) -> Array3<u8> {
    let (height, width, _) = input.dim();
    // Any shift past the row width lands on the same edge pixel.
    let limit = width as isize;

    map_pixels(input, |x, y, out| {
        let shift = wave.shift(y).clamp(-limit, limit);
        let (sx, sy) = clamp_coords(width, height, (x as isize).saturating_add(shift), y as isize);
        for (c, v) in out.iter_mut().enumerate() {
            *v = input[[sy, sx, c]];
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_validation() {
        assert!(Wave::new(5.0, 0.0).is_err());
        assert!(Wave::new(f32::INFINITY, 10.0).is_err());
        assert_eq!(Wave::default(), Wave::new(20.0, 60.0).unwrap());
    }

    #[test]
    fn test_wave_shift() {
        let w = Wave::default();
        assert_eq!(w.shift(0), 0);
        assert_eq!(w.shift(15), 20);
        assert_eq!(w.shift(45), -20);
    }

    #[test]
    fn test_wave_moves_rows() {
        let img = Array3::from_shape_fn((20, 10, 1), |(_, x, _)| x as u8 * 10);
        let w = Wave::new(2.0, 8.0).unwrap();

        let result = wave(img.view(), &w);

        // Row 0 has no shift
        assert_eq!(result[[0, 4, 0]], 40);
        // Row 2 is shifted by +2 (sin(π/2) = 1)
        assert_eq!(result[[2, 4, 0]], 60);
        // Clamped at the right edge
        assert_eq!(result[[2, 9, 0]], 90);
        // Row 6 is shifted by -2
        assert_eq!(result[[6, 4, 0]], 20);
        assert_eq!(result[[6, 0, 0]], 0);
    }

    #[test]
    fn test_huge_amplitude_clamps_to_edges() {
        let img = Array3::from_shape_fn((16, 9, 2), |(y, x, c)| (y * 9 + x + c) as u8);
        let w = Wave::new(1.0e30, 60.0).unwrap();

        let result = wave(img.view(), &w);

        assert_eq!(result.dim(), img.dim());
        for x in 0..9 {
            // Row 0: sin(0) = 0
            assert_eq!(result[[0, x, 0]], img[[0, x, 0]]);
            // Row 15: sin(π/2) = 1, every source lands on the right edge
            assert_eq!(result[[15, x, 1]], img[[15, 8, 1]]);
        }
    }

    #[test]
    fn test_zero_amplitude_is_copy() {
        let img = Array3::from_shape_fn((5, 5, 4), |(y, x, c)| (y * 20 + x * 4 + c) as u8);
        let result = wave(img.view(), &Wave::new(0.0, 7.0).unwrap());
        assert_eq!(result, img);
    }
}
