//! ImageStag Filters
//!
//! Neighborhood image filters implemented in Rust, with optional Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are `ndarray` arrays of shape (height, width, channels) with `u8`
//! channels (0-255). RGBA is the primary layout; 1- and 3-channel images are
//! accepted as well.
//!
//! ## Filter Architecture
//! Every filter is a [`Filter`] value exposing one operation,
//! [`Filter::process`], which never touches its input and returns a freshly
//! allocated image with the same shape. Configuration (kernels, structural
//! elements, radii) is validated when the filter is built.
//!
//! ```
//! use imagestag_filters::{Filter, StructuralElement};
//! use ndarray::Array3;
//!
//! let image = Array3::<u8>::from_elem((8, 8, 4), 200);
//! let blurred = Filter::gaussian(1, 3.0).unwrap().process(image.view());
//! let opened = Filter::opening(StructuralElement::SQUARE_3X3).process(blurred.view());
//! assert_eq!(opened.dim(), (8, 8, 4));
//! ```

pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::color_adjust::ToneTable;
pub use filters::kernel::Kernel;
pub use filters::morphology::{MorphOp, StructuralElement};
pub use filters::stylize::Wave;
pub use filters::{Filter, PointOp};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::color_adjust::DEFAULT_BRIGHTEN;
    use crate::filters::kernel::{DEFAULT_GAUSSIAN_SIGMA, DEFAULT_RADIUS};
    use crate::filters::noise::DEFAULT_MEDIAN_RADIUS;
    use crate::filters::stylize::{DEFAULT_WAVE_AMPLITUDE, DEFAULT_WAVE_PERIOD};
    use crate::{Filter, MorphOp, StructuralElement};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn run<'py>(
        py: Python<'py>,
        filter: &Filter,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        filter.process(image.as_array()).into_pyarray(py)
    }

    fn element(mask: Option<Vec<bool>>, line: usize, row: usize) -> PyResult<StructuralElement> {
        match mask {
            Some(mask) => Ok(StructuralElement::new(mask, line, row)?),
            None => Ok(StructuralElement::SQUARE_3X3),
        }
    }

    fn morphology<'py>(
        py: Python<'py>,
        op: MorphOp,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = Filter::morphology(op, element(mask, line, row)?);
        Ok(run(py, &filter, image))
    }

    // ========================================================================
    // Convolution Filters
    // ========================================================================

    /// Uniform box blur over a (2r+1)² window.
    #[pyfunction]
    #[pyo3(signature = (image, radius=DEFAULT_RADIUS))]
    pub fn box_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(run(py, &Filter::box_blur(radius)?, image))
    }

    /// Gaussian blur with a normalized (2r+1)² kernel.
    #[pyfunction]
    #[pyo3(signature = (image, radius=DEFAULT_RADIUS, sigma=DEFAULT_GAUSSIAN_SIGMA))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
        sigma: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(run(py, &Filter::gaussian(radius, sigma)?, image))
    }

    #[pyfunction]
    #[pyo3(signature = (image, strong=false))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        strong: bool,
    ) -> Bound<'py, PyArray3<u8>> {
        let filter = if strong {
            Filter::strong_sharpen()
        } else {
            Filter::sharpen()
        };
        run(py, &filter, image)
    }

    #[pyfunction]
    #[pyo3(signature = (image, bias=0.0))]
    pub fn emboss<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        bias: f32,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::emboss_with_bias(bias), image)
    }

    /// Sobel edge detection: "x", "y" or "both" (magnitude).
    #[pyfunction]
    #[pyo3(signature = (image, direction="both"))]
    pub fn sobel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        direction: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter = match direction {
            "x" => Filter::sobel_x(),
            "y" => Filter::sobel_y(),
            "both" => Filter::sobel(),
            other => {
                return Err(PyValueError::new_err(format!(
                    "direction must be 'x', 'y' or 'both', got '{}'",
                    other
                )))
            }
        };
        Ok(run(py, &filter, image))
    }

    // ========================================================================
    // Morphology Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn erode<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::Erode, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn dilate<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::Dilate, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn opening<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::Open, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn closing<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::Close, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn morph_gradient<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::Gradient, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn top_hat<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::TopHat, image, mask, line, row)
    }

    #[pyfunction]
    #[pyo3(signature = (image, mask=None, line=3, row=3))]
    pub fn black_hat<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: Option<Vec<bool>>,
        line: usize,
        row: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        morphology(py, MorphOp::BlackHat, image, mask, line, row)
    }

    // ========================================================================
    // Statistics Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, radius=DEFAULT_MEDIAN_RADIUS))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(run(py, &Filter::median(radius)?, image))
    }

    #[pyfunction]
    pub fn stretch_histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::stretch_histogram(), image)
    }

    #[pyfunction]
    pub fn perfect_reflector<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::perfect_reflector(), image)
    }

    // ========================================================================
    // Point Filters
    // ========================================================================

    #[pyfunction]
    pub fn invert<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::invert(), image)
    }

    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::grayscale(), image)
    }

    #[pyfunction]
    pub fn sepia<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::sepia(), image)
    }

    #[pyfunction]
    #[pyo3(signature = (image, amount=DEFAULT_BRIGHTEN))]
    pub fn brighten<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: i16,
    ) -> Bound<'py, PyArray3<u8>> {
        run(py, &Filter::brighten(amount), image)
    }

    #[pyfunction]
    #[pyo3(signature = (image, amplitude=DEFAULT_WAVE_AMPLITUDE, period=DEFAULT_WAVE_PERIOD))]
    pub fn wave<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amplitude: f32,
        period: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(run(py, &Filter::wave(amplitude, period)?, image))
    }

    /// ImageStag filters extension module
    #[pymodule]
    pub fn imagestag_filters(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Convolution filters
        m.add_function(wrap_pyfunction!(box_blur, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(emboss, m)?)?;
        m.add_function(wrap_pyfunction!(sobel, m)?)?;

        // Morphology filters
        m.add_function(wrap_pyfunction!(erode, m)?)?;
        m.add_function(wrap_pyfunction!(dilate, m)?)?;
        m.add_function(wrap_pyfunction!(opening, m)?)?;
        m.add_function(wrap_pyfunction!(closing, m)?)?;
        m.add_function(wrap_pyfunction!(morph_gradient, m)?)?;
        m.add_function(wrap_pyfunction!(top_hat, m)?)?;
        m.add_function(wrap_pyfunction!(black_hat, m)?)?;

        // Statistics filters
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(stretch_histogram, m)?)?;
        m.add_function(wrap_pyfunction!(perfect_reflector, m)?)?;

        // Point filters
        m.add_function(wrap_pyfunction!(invert, m)?)?;
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(sepia, m)?)?;
        m.add_function(wrap_pyfunction!(brighten, m)?)?;
        m.add_function(wrap_pyfunction!(wave, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagestag_filters;
