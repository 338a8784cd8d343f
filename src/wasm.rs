//! WebAssembly exports for ImageStag filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//! Every function takes a flat RGBA buffer (length = width * height * 4)
//! and returns a new flat RGBA buffer of the same length.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::{Filter, MorphOp, StructuralElement};

impl From<FilterError> for JsValue {
    fn from(err: FilterError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

fn run(filter: &Filter, data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec()).map_err(|_| {
        JsValue::from_str(&format!(
            "Invalid dimensions: {} bytes for {}x{} RGBA",
            data.len(),
            width,
            height
        ))
    })?;

    let result = filter.process(input.view());
    Ok(result.into_raw_vec_and_offset().0)
}

fn morphology(
    op: MorphOp,
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    let element = match mask {
        Some(mask) => StructuralElement::new(mask.iter().map(|&m| m != 0).collect(), line, row)?,
        None => StructuralElement::SQUARE_3X3,
    };
    run(&Filter::morphology(op, element), data, width, height)
}

// ============================================================================
// Convolution Filters
// ============================================================================

#[wasm_bindgen]
pub fn box_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
) -> Result<Vec<u8>, JsValue> {
    run(&Filter::box_blur(radius)?, data, width, height)
}

#[wasm_bindgen]
pub fn gaussian_blur_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
    sigma: f32,
) -> Result<Vec<u8>, JsValue> {
    run(&Filter::gaussian(radius, sigma)?, data, width, height)
}

#[wasm_bindgen]
pub fn sharpen_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    strong: bool,
) -> Result<Vec<u8>, JsValue> {
    let filter = if strong {
        Filter::strong_sharpen()
    } else {
        Filter::sharpen()
    };
    run(&filter, data, width, height)
}

#[wasm_bindgen]
pub fn emboss_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    bias: f32,
) -> Result<Vec<u8>, JsValue> {
    run(&Filter::emboss_with_bias(bias), data, width, height)
}

/// Sobel gradient magnitude.
#[wasm_bindgen]
pub fn sobel_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(&Filter::sobel(), data, width, height)
}

// ============================================================================
// Morphology Filters
// ============================================================================
//
// `mask` holds one byte per cell (non-zero = active); omit it for the 3x3 square.

#[wasm_bindgen]
pub fn erode_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    morphology(MorphOp::Erode, data, width, height, mask, line, row)
}

#[wasm_bindgen]
pub fn dilate_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    morphology(MorphOp::Dilate, data, width, height, mask, line, row)
}

#[wasm_bindgen]
pub fn opening_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    morphology(MorphOp::Open, data, width, height, mask, line, row)
}

#[wasm_bindgen]
pub fn closing_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    morphology(MorphOp::Close, data, width, height, mask, line, row)
}

#[wasm_bindgen]
pub fn morph_gradient_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    mask: Option<Vec<u8>>,
    line: usize,
    row: usize,
) -> Result<Vec<u8>, JsValue> {
    morphology(MorphOp::Gradient, data, width, height, mask, line, row)
}

// ============================================================================
// Statistics Filters
// ============================================================================

#[wasm_bindgen]
pub fn median_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: usize,
) -> Result<Vec<u8>, JsValue> {
    run(&Filter::median(radius)?, data, width, height)
}

#[wasm_bindgen]
pub fn stretch_histogram_wasm(
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsValue> {
    run(&Filter::stretch_histogram(), data, width, height)
}
