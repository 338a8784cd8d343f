//! Convolution kernels.
//!
//! A [`Kernel`] is a square grid of `f32` weights with side `2 * radius + 1`.
//! Weights are stored dx-major: the weight for offset `(dx, dy)` lives at
//! `(dx + r) * size + (dy + r)`.
//!
//! | Kernel | Weights (radius 1) |
//! |--------|--------------------|
//! | Box blur | all `1 / size²` |
//! | Gaussian | `exp(-(dx² + dy²) / 2σ²)`, normalized |
//! | Sharpen | `0,-1,0 / -1,5,-1 / 0,-1,0` |
//! | Strong sharpen | `-1,-1,-1 / -1,9,-1 / -1,-1,-1` |
//! | Emboss | `0,1,0 / 1,0,-1 / 0,-1,0` |
//! | Sobel X | `-1,-2,-1 / 0,0,0 / 1,2,1` |
//! | Sobel Y | `-1,0,1 / -2,0,2 / -1,0,1` |

use super::core::window_size;
use crate::error::{FilterError, Result};

/// Radius used by kernel filters unless the caller picks one.
pub const DEFAULT_RADIUS: usize = 1;

/// Gaussian standard deviation used unless the caller picks one.
pub const DEFAULT_GAUSSIAN_SIGMA: f32 = 3.0;

const SHARPEN_3X3: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
const STRONG_SHARPEN_3X3: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];
const EMBOSS_3X3: [f32; 9] = [0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, -1.0, 0.0];
const SOBEL_X_3X3: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
const SOBEL_Y_3X3: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];

/// Immutable square array of convolution weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    radius: usize,
    data: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from explicit weights.
    ///
    /// # Errors
    /// [`FilterError::InvalidKernel`] if `data.len() != (2 * radius + 1)²`.
    pub fn new(radius: usize, data: Vec<f32>) -> Result<Self> {
        let (_, expected) = window_size(radius)?;

        if data.len() != expected {
            return Err(FilterError::InvalidKernel {
                radius,
                expected,
                actual: data.len(),
            });
        }

        Ok(Kernel { radius, data })
    }

    fn from_3x3(weights: [f32; 9]) -> Self {
        Kernel {
            radius: 1,
            data: weights.to_vec(),
        }
    }

    /// Uniform average over a `(2r + 1)²` window.
    ///
    /// Radius 0 gives the identity kernel.
    pub fn box_blur(radius: usize) -> Result<Self> {
        let (_, len) = window_size(radius)?;
        Kernel::new(radius, vec![1.0 / len as f32; len])
    }

    /// Gaussian kernel normalized so the weights sum to 1.
    ///
    /// # Errors
    /// `sigma` must be finite and positive.
    pub fn gaussian(radius: usize, sigma: f32) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(FilterError::parameter(
                "sigma",
                sigma,
                "gaussian sigma must be finite and positive",
            ));
        }

        let (_, len) = window_size(radius)?;
        let r = radius as isize;
        let two_sigma_sq = 2.0 * sigma * sigma;

        let mut data = Vec::with_capacity(len);
        for dx in -r..=r {
            for dy in -r..=r {
                let dist_sq = (dx * dx + dy * dy) as f32;
                data.push((-dist_sq / two_sigma_sq).exp());
            }
        }

        // Normalize
        let sum: f32 = data.iter().sum();
        for w in data.iter_mut() {
            *w /= sum;
        }

        Kernel::new(radius, data)
    }

    pub fn sharpen() -> Self {
        Kernel::from_3x3(SHARPEN_3X3)
    }

    pub fn strong_sharpen() -> Self {
        Kernel::from_3x3(STRONG_SHARPEN_3X3)
    }

    pub fn emboss() -> Self {
        Kernel::from_3x3(EMBOSS_3X3)
    }

    /// First directional kernel of the Sobel pair.
    pub fn sobel_x() -> Self {
        Kernel::from_3x3(SOBEL_X_3X3)
    }

    /// Second directional kernel of the Sobel pair.
    pub fn sobel_y() -> Self {
        Kernel::from_3x3(SOBEL_Y_3X3)
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    #[inline]
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    pub fn weights(&self) -> &[f32] {
        &self.data
    }

    /// Weight at offset `(dx, dy)`, both in `[-radius, radius]`.
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let r = self.radius as isize;
        let idx = (dx + r) as usize * self.size() + (dy + r) as usize;
        self.data[idx]
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Non-zero taps as `(dx, dy, weight)`.
    pub(crate) fn taps(&self) -> Vec<(isize, isize, f32)> {
        let r = self.radius as isize;
        let mut taps = Vec::with_capacity(self.data.len());
        for dx in -r..=r {
            for dy in -r..=r {
                let w = self.weight(dx, dy);
                if w != 0.0 {
                    taps.push((dx, dy, w));
                }
            }
        }
        taps
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::from_3x3([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0])
    }
}
