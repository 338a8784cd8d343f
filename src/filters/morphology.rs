//! Morphology filters: Erode, Dilate, Open, Close, Gradient, TopHat, BlackHat.
//!
//! Erosion takes the per-channel minimum over the active cells of a
//! [`StructuralElement`], dilation the maximum. The composite operators run
//! two complete passes; the second pass reads the fully materialized output of
//! the first.
//!
//! All channels (alpha included) are processed. Out-of-range neighbors are
//! replaced by the nearest edge pixel.

use std::borrow::Cow;

use log::trace;
use ndarray::{Array3, ArrayView3, Zip};

use super::core::{clamp_coords, map_pixels, window_size};
use crate::error::{FilterError, Result};

// ============================================================================
// Structural element
// ============================================================================

/// Boolean neighborhood mask.
///
/// The mask is stored line by line: `line` is the number of entries in each
/// line (mask width) and `row` is the number of lines (mask height). The cell
/// at `(line / 2, row / 2)` sits on the processed pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralElement {
    mask: Cow<'static, [bool]>,
    line: usize,
    row: usize,
}

impl StructuralElement {
    /// Dense 3x3 square: the pixel and its 8 neighbors.
    pub const SQUARE_3X3: StructuralElement = StructuralElement {
        mask: Cow::Borrowed(&[true; 9]),
        line: 3,
        row: 3,
    };

    /// Build an element from an explicit mask.
    ///
    /// # Errors
    /// - `line` or `row` is zero
    /// - `mask.len() != line * row`
    /// - no entry of `mask` is set
    pub fn new(mask: Vec<bool>, line: usize, row: usize) -> Result<Self> {
        if line == 0 {
            return Err(FilterError::parameter("line", line, "must be at least 1"));
        }
        if row == 0 {
            return Err(FilterError::parameter("row", row, "must be at least 1"));
        }
        if line.checked_mul(row) != Some(mask.len()) {
            return Err(FilterError::MaskSizeMismatch {
                len: mask.len(),
                line,
                row,
            });
        }
        if !mask.iter().any(|&m| m) {
            return Err(FilterError::EmptyMask);
        }

        Ok(StructuralElement {
            mask: Cow::Owned(mask),
            line,
            row,
        })
    }

    fn from_fn(radius: usize, active: impl Fn(isize, isize) -> bool) -> Result<Self> {
        if radius == 0 {
            return Err(FilterError::parameter("radius", radius, "must be at least 1"));
        }
        let (side, len) = window_size(radius)?;
        let r = radius as isize;
        let mask = (0..len)
            .map(|i| active((i % side) as isize - r, (i / side) as isize - r))
            .collect();
        StructuralElement::new(mask, side, side)
    }

    /// Dense square of side `2 * radius + 1`.
    pub fn square(radius: usize) -> Result<Self> {
        StructuralElement::from_fn(radius, |_, _| true)
    }

    /// Plus-shaped element with arms of length `radius`.
    pub fn cross(radius: usize) -> Result<Self> {
        StructuralElement::from_fn(radius, |dx, dy| dx == 0 || dy == 0)
    }

    /// Disk of the given radius.
    pub fn disk(radius: usize) -> Result<Self> {
        window_size(radius)?;
        let r_sq = (radius * radius) as isize;
        StructuralElement::from_fn(radius, |dx, dy| dx * dx + dy * dy <= r_sq)
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.mask.len()
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// `(dx, dy)` offsets of the active cells relative to the anchor.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let cx = (self.line / 2) as isize;
        let cy = (self.row / 2) as isize;
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &active)| active)
            .map(|(i, _)| ((i % self.line) as isize - cx, (i / self.line) as isize - cy))
            .collect()
    }
}

impl Default for StructuralElement {
    fn default() -> Self {
        StructuralElement::SQUARE_3X3
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Morphological operator applied by a morphology filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Erode,
    Dilate,
    Open,
    Close,
    Gradient,
    TopHat,
    BlackHat,
}

impl MorphOp {
    pub fn name(&self) -> &'static str {
        match self {
            MorphOp::Erode => "erosion",
            MorphOp::Dilate => "dilation",
            MorphOp::Open => "opening",
            MorphOp::Close => "closing",
            MorphOp::Gradient => "gradient",
            MorphOp::TopHat => "top_hat",
            MorphOp::BlackHat => "black_hat",
        }
    }

    /// Run the operator over `input`.
    pub fn apply(&self, input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
        match self {
            MorphOp::Erode => erode(input, element),
            MorphOp::Dilate => dilate(input, element),
            MorphOp::Open => open(input, element),
            MorphOp::Close => close(input, element),
            MorphOp::Gradient => gradient(input, element),
            MorphOp::TopHat => top_hat(input, element),
            MorphOp::BlackHat => black_hat(input, element),
        }
    }
}

fn extremum(
    input: ArrayView3<u8>,
    element: &StructuralElement,
    init: u8,
    pick: fn(u8, u8) -> u8,
) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let offsets = element.offsets();

    map_pixels(input, |x, y, out| {
        for (c, v) in out.iter_mut().enumerate() {
            let mut acc = init;
            for &(dx, dy) in &offsets {
                let (sx, sy) = clamp_coords(width, height, x as isize + dx, y as isize + dy);
                acc = pick(acc, input[[sy, sx, c]]);
            }
            *v = acc;
        }
    })
}

/// Per-channel pixelwise `clamp(a - b, 0, 255)`.
fn saturating_difference(a: ArrayView3<u8>, b: ArrayView3<u8>) -> Array3<u8> {
    let mut output = Array3::<u8>::zeros(a.dim());
    Zip::from(&mut output)
        .and(a)
        .and(b)
        .for_each(|o, &x, &y| *o = x.saturating_sub(y));
    output
}

/// Apply erosion: per-channel minimum over the element.
///
/// Dark regions grow and bright regions shrink.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `element` - Neighborhood mask
///
/// # Returns
/// Eroded image with the same shape
pub fn erode(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    extremum(input, element, u8::MAX, std::cmp::min)
}

/// Apply dilation: per-channel maximum over the element.
///
/// Bright regions grow and dark regions shrink.
pub fn dilate(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    extremum(input, element, u8::MIN, std::cmp::max)
}

/// Opening: erosion, then dilation of the eroded image.
///
/// Removes bright features smaller than the element.
pub fn open(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    trace!("opening: erosion pass");
    let eroded = erode(input, element);
    trace!("opening: dilation pass");
    dilate(eroded.view(), element)
}

/// Closing: dilation, then erosion of the dilated image.
///
/// Fills dark gaps smaller than the element.
pub fn close(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    trace!("closing: dilation pass");
    let dilated = dilate(input, element);
    trace!("closing: erosion pass");
    erode(dilated.view(), element)
}

/// Morphological gradient: `dilation - erosion`.
///
/// Edges get high values, flat regions 0.
pub fn gradient(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    let dilated = dilate(input, element);
    let eroded = erode(input, element);
    saturating_difference(dilated.view(), eroded.view())
}

/// White top-hat: `input - opening`. Extracts small bright details.
pub fn top_hat(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    let opened = open(input, element);
    saturating_difference(input, opened.view())
}

/// Black top-hat: `closing - input`. Extracts small dark details.
pub fn black_hat(input: ArrayView3<u8>, element: &StructuralElement) -> Array3<u8> {
    let closed = close(input, element);
    saturating_difference(closed.view(), input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(height: usize, width: usize, value: u8) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 4), |(_, _, c)| if c == 3 { 255 } else { value })
    }

    fn pattern(height: usize, width: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
            ((x * 37 + y * 91 + c * 53) % 256) as u8
        })
    }

    #[test]
    fn test_element_validation() {
        assert_eq!(
            StructuralElement::new(vec![true; 8], 3, 3),
            Err(FilterError::MaskSizeMismatch { len: 8, line: 3, row: 3 })
        );
        assert!(StructuralElement::new(vec![], 0, 3).is_err());
        assert!(StructuralElement::new(vec![], 3, 0).is_err());
        assert_eq!(
            StructuralElement::new(vec![false; 4], 2, 2),
            Err(FilterError::EmptyMask)
        );
        assert!(StructuralElement::square(0).is_err());

        let mask = vec![true, false, true, true, true, false];
        let element = StructuralElement::new(mask, 3, 2).unwrap();
        assert_eq!(element.line(), 3);
        assert_eq!(element.row(), 2);
        assert_eq!(element.size(), 6);
    }

    #[test]
    fn test_oversized_radius_is_rejected() {
        for radius in [usize::MAX / 2 + 1, usize::MAX / 4] {
            assert!(StructuralElement::square(radius).is_err());
            assert!(StructuralElement::cross(radius).is_err());
            assert!(StructuralElement::disk(radius).is_err());
        }
    }

    #[test]
    fn test_default_element() {
        let element = StructuralElement::default();
        assert_eq!(element, StructuralElement::SQUARE_3X3);
        assert_eq!(element, StructuralElement::square(1).unwrap());
        assert_eq!(element.offsets().len(), 9);
        assert!(element.offsets().contains(&(-1, -1)));
        assert!(element.offsets().contains(&(1, 1)));
    }

    #[test]
    fn test_offsets_follow_line_layout() {
        // 3 entries per line, 1 line: horizontal segment
        let element = StructuralElement::new(vec![true, true, true], 3, 1).unwrap();
        assert_eq!(element.offsets(), vec![(-1, 0), (0, 0), (1, 0)]);

        let cross = StructuralElement::cross(1).unwrap();
        assert_eq!(cross.offsets(), vec![(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)]);

        let disk = StructuralElement::disk(2).unwrap();
        assert_eq!(disk.offsets().len(), 13);
    }

    #[test]
    fn test_erode_white_stays_white() {
        let img = Array3::<u8>::from_elem((6, 5, 4), 255);
        for element in [
            StructuralElement::SQUARE_3X3,
            StructuralElement::cross(2).unwrap(),
            StructuralElement::disk(3).unwrap(),
        ] {
            assert_eq!(erode(img.view(), &element), img);
        }
    }

    #[test]
    fn test_dilate_black_stays_black() {
        let img = Array3::<u8>::zeros((6, 5, 4));
        for element in [StructuralElement::SQUARE_3X3, StructuralElement::cross(1).unwrap()] {
            assert_eq!(dilate(img.view(), &element), img);
        }
    }

    #[test]
    fn test_dilate_grows_bright() {
        let mut img = filled(5, 5, 0);
        img[[2, 2, 0]] = 255;

        let result = dilate(img.view(), &StructuralElement::SQUARE_3X3);

        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(result[[y, x, 0]], 255);
            }
        }
        assert_eq!(result[[0, 0, 0]], 0);
        assert_eq!(result[[2, 2, 3]], 255);
    }

    #[test]
    fn test_erode_shrinks_bright() {
        let mut img = filled(5, 5, 255);
        img[[2, 2, 0]] = 0;

        let result = erode(img.view(), &StructuralElement::cross(1).unwrap());

        assert_eq!(result[[2, 1, 0]], 0);
        assert_eq!(result[[1, 2, 0]], 0);
        // Diagonal is outside the cross
        assert_eq!(result[[1, 1, 0]], 255);
    }

    #[test]
    fn test_edges_are_replicated_not_black() {
        let img = filled(4, 4, 200);
        let result = erode(img.view(), &StructuralElement::square(2).unwrap());
        assert_eq!(result[[0, 0, 0]], 200);
    }

    #[test]
    fn test_open_close_compose() {
        let img = pattern(7, 9);
        let element = StructuralElement::SQUARE_3X3;

        let eroded = erode(img.view(), &element);
        assert_eq!(open(img.view(), &element), dilate(eroded.view(), &element));

        let dilated = dilate(img.view(), &element);
        assert_eq!(close(img.view(), &element), erode(dilated.view(), &element));
    }

    #[test]
    fn test_opening_removes_bright_spot() {
        let mut img = filled(7, 7, 50);
        img[[3, 3, 0]] = 250;

        let result = open(img.view(), &StructuralElement::SQUARE_3X3);

        assert_eq!(result[[3, 3, 0]], 50);
    }

    #[test]
    fn test_closing_fills_dark_spot() {
        let mut img = filled(7, 7, 180);
        img[[3, 3, 1]] = 0;

        let result = close(img.view(), &StructuralElement::SQUARE_3X3);

        assert_eq!(result[[3, 3, 1]], 180);
    }

    #[test]
    fn test_gradient_is_dilation_minus_erosion() {
        let img = pattern(6, 6);
        let element = StructuralElement::disk(1).unwrap();

        let grad = gradient(img.view(), &element);
        let dilated = dilate(img.view(), &element);
        let eroded = erode(img.view(), &element);

        for ((g, d), e) in grad.iter().zip(dilated.iter()).zip(eroded.iter()) {
            assert_eq!(*g, d.saturating_sub(*e));
        }
    }

    #[test]
    fn test_gradient_flat_region_is_zero() {
        let img = filled(5, 5, 99);
        let result = gradient(img.view(), &StructuralElement::SQUARE_3X3);
        assert!(result.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_top_hat_and_black_hat() {
        let mut img = filled(7, 7, 40);
        img[[3, 3, 0]] = 240;
        img[[1, 1, 2]] = 0;

        let white = top_hat(img.view(), &StructuralElement::SQUARE_3X3);
        assert_eq!(white[[3, 3, 0]], 200);
        assert_eq!(white[[0, 0, 0]], 0);

        let black = black_hat(img.view(), &StructuralElement::SQUARE_3X3);
        assert_eq!(black[[1, 1, 2]], 40);
        assert_eq!(black[[5, 5, 2]], 0);
    }

    #[test]
    fn test_morph_op_dispatch() {
        let img = pattern(4, 5);
        let element = StructuralElement::SQUARE_3X3;

        assert_eq!(MorphOp::Erode.apply(img.view(), &element), erode(img.view(), &element));
        assert_eq!(MorphOp::Close.apply(img.view(), &element), close(img.view(), &element));
        assert_eq!(MorphOp::BlackHat.name(), "black_hat");
    }
}
