//! Filter modules for image processing effects.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! ## Architecture
//!
//! A [`Filter`] is a plain description: a kernel pair, a structural element, a
//! window radius or a point operation. [`Filter::process`] resolves the
//! concrete operator once and runs it over the whole image:
//! - **Read-only source** - the input view is never written
//! - **Fresh output** - every call allocates its own destination
//! - **Edge replication** - neighbors outside the image clamp to the border
//! - **Thread-safe** - rows are processed in parallel with rayon
//!
//! ## Filter Categories
//!
//! - **Convolution**: box blur, gaussian, sharpen, emboss, sobel (all channels)
//! - **Morphology**: erode, dilate, open, close, gradient, top-hat, black-hat (all channels)
//! - **Noise**: median (all channels)
//! - **Levels**: histogram stretch, perfect reflector (colour channels, alpha kept)
//! - **Point**: invert, grayscale, sepia, brighten, wave, tone (colour channels, alpha kept)

pub mod color_adjust;
pub mod convolve;
pub mod core;
pub mod kernel;
pub mod levels;
pub mod morphology;
pub mod noise;
pub mod stylize;

use log::debug;
use ndarray::{Array3, ArrayView3};

use crate::error::Result;
use color_adjust::ToneTable;
use kernel::Kernel;
use morphology::{MorphOp, StructuralElement};
use stylize::Wave;

/// Bias added after the emboss convolution.
pub const EMBOSS_BIAS: f32 = 0.0;

/// Single-pixel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PointOp {
    Invert,
    Grayscale,
    Sepia,
    Brighten(i16),
    Wave(Wave),
    Tone(ToneTable),
}

impl PointOp {
    pub fn name(&self) -> &'static str {
        match self {
            PointOp::Invert => "invert",
            PointOp::Grayscale => "grayscale",
            PointOp::Sepia => "sepia",
            PointOp::Brighten(_) => "brighten",
            PointOp::Wave(_) => "wave",
            PointOp::Tone(_) => "tone",
        }
    }

    pub fn apply(&self, input: ArrayView3<u8>) -> Array3<u8> {
        match self {
            PointOp::Invert => color_adjust::invert(input),
            PointOp::Grayscale => color_adjust::grayscale(input),
            PointOp::Sepia => color_adjust::sepia(input),
            PointOp::Brighten(amount) => color_adjust::brighten(input, *amount),
            PointOp::Wave(params) => stylize::wave(input, params),
            PointOp::Tone(table) => color_adjust::tone(input, table),
        }
    }
}

/// An image filter: `process(image) -> image`.
///
/// Construct through the named constructors; invalid configurations are
/// rejected there, so [`Filter::process`] itself cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Point(PointOp),
    Convolution {
        kernel: Kernel,
        kernel2: Option<Kernel>,
        bias: f32,
    },
    Morphology {
        op: MorphOp,
        element: StructuralElement,
    },
    Median {
        radius: usize,
    },
    StretchHistogram,
    PerfectReflector,
}

impl Filter {
    // ------------------------------------------------------------------------
    // Convolution
    // ------------------------------------------------------------------------

    pub fn convolution(kernel: Kernel) -> Self {
        Filter::Convolution {
            kernel,
            kernel2: None,
            bias: 0.0,
        }
    }

    /// Combine two directional kernels by magnitude.
    pub fn magnitude(kernel: Kernel, kernel2: Kernel) -> Self {
        Filter::Convolution {
            kernel,
            kernel2: Some(kernel2),
            bias: 0.0,
        }
    }

    pub fn box_blur(radius: usize) -> Result<Self> {
        Ok(Filter::convolution(Kernel::box_blur(radius)?))
    }

    pub fn gaussian(radius: usize, sigma: f32) -> Result<Self> {
        Ok(Filter::convolution(Kernel::gaussian(radius, sigma)?))
    }

    pub fn sharpen() -> Self {
        Filter::convolution(Kernel::sharpen())
    }

    pub fn strong_sharpen() -> Self {
        Filter::convolution(Kernel::strong_sharpen())
    }

    pub fn emboss() -> Self {
        Filter::emboss_with_bias(EMBOSS_BIAS)
    }

    /// Emboss with a constant offset, e.g. 128 to center on mid gray.
    pub fn emboss_with_bias(bias: f32) -> Self {
        Filter::Convolution {
            kernel: Kernel::emboss(),
            kernel2: None,
            bias,
        }
    }

    pub fn sobel_x() -> Self {
        Filter::convolution(Kernel::sobel_x())
    }

    pub fn sobel_y() -> Self {
        Filter::convolution(Kernel::sobel_y())
    }

    /// Sobel gradient magnitude.
    pub fn sobel() -> Self {
        Filter::magnitude(Kernel::sobel_x(), Kernel::sobel_y())
    }

    // ------------------------------------------------------------------------
    // Morphology
    // ------------------------------------------------------------------------

    pub fn morphology(op: MorphOp, element: StructuralElement) -> Self {
        Filter::Morphology { op, element }
    }

    pub fn erosion(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::Erode, element)
    }

    pub fn dilation(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::Dilate, element)
    }

    pub fn opening(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::Open, element)
    }

    pub fn closing(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::Close, element)
    }

    pub fn gradient(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::Gradient, element)
    }

    pub fn top_hat(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::TopHat, element)
    }

    pub fn black_hat(element: StructuralElement) -> Self {
        Filter::morphology(MorphOp::BlackHat, element)
    }

    // ------------------------------------------------------------------------
    // Order statistics and global statistics
    // ------------------------------------------------------------------------

    pub fn median(radius: usize) -> Result<Self> {
        Ok(Filter::Median {
            radius: noise::validate_radius(radius)?,
        })
    }

    pub fn stretch_histogram() -> Self {
        Filter::StretchHistogram
    }

    pub fn perfect_reflector() -> Self {
        Filter::PerfectReflector
    }

    // ------------------------------------------------------------------------
    // Point operations
    // ------------------------------------------------------------------------

    pub fn invert() -> Self {
        Filter::Point(PointOp::Invert)
    }

    pub fn grayscale() -> Self {
        Filter::Point(PointOp::Grayscale)
    }

    pub fn sepia() -> Self {
        Filter::Point(PointOp::Sepia)
    }

    pub fn brighten(amount: i16) -> Self {
        Filter::Point(PointOp::Brighten(amount))
    }

    pub fn wave(amplitude: f32, period: f32) -> Result<Self> {
        Ok(Filter::Point(PointOp::Wave(Wave::new(amplitude, period)?)))
    }

    pub fn tone(table: ToneTable) -> Self {
        Filter::Point(PointOp::Tone(table))
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Point(op) => op.name(),
            Filter::Convolution { kernel2: Some(_), .. } => "convolution_magnitude",
            Filter::Convolution { .. } => "convolution",
            Filter::Morphology { op, .. } => op.name(),
            Filter::Median { .. } => "median",
            Filter::StretchHistogram => "stretch_histogram",
            Filter::PerfectReflector => "perfect_reflector",
        }
    }

    /// Apply the filter to `input` and return a newly allocated image of the
    /// same shape. The input is never modified.
    pub fn process(&self, input: ArrayView3<u8>) -> Array3<u8> {
        let (height, width, channels) = input.dim();
        debug!(
            "Applying {} to {}x{} image with {} channels",
            self.name(),
            width,
            height,
            channels
        );

        match self {
            Filter::Point(op) => op.apply(input),
            Filter::Convolution {
                kernel,
                kernel2: None,
                bias,
            } => convolve::convolve(input, kernel, *bias),
            Filter::Convolution {
                kernel,
                kernel2: Some(kernel2),
                bias,
            } => convolve::convolve_magnitude(input, kernel, kernel2, *bias),
            Filter::Morphology { op, element } => op.apply(input, element),
            Filter::Median { radius } => noise::median(input, *radius),
            Filter::StretchHistogram => levels::stretch_histogram(input),
            Filter::PerfectReflector => levels::perfect_reflector(input),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::convolution(Kernel::default())
    }
}
