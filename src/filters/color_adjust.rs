//! Color adjustment filters: Invert, Grayscale, Sepia, Brighten, Tone.
//!
//! These are pixel-wise operations that don't require spatial context.
//!
//! ## Supported Formats
//!
//! All filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - single luminance channel
//! - **RGB**: (height, width, 3) - red, green, blue
//! - **RGBA**: (height, width, 4) - red, green, blue, alpha
//!
//! Alpha channel (if present) is always preserved unchanged. Grayscale and
//! sepia need RGB and leave 1-channel images as they are.

use ndarray::{Array3, ArrayView3};

use super::core::{color_channels, map_pixels};
use crate::error::{FilterError, Result};

/// ITU-R BT.709 luminosity coefficients
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Offset added by [`brighten`] unless the caller picks one.
pub const DEFAULT_BRIGHTEN: i16 = 50;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Apply `remap` to every colour channel, copying alpha through.
fn map_colors<F>(input: ArrayView3<u8>, remap: F) -> Array3<u8>
where
    F: Fn(u8) -> u8 + Sync,
{
    let color = color_channels(input.dim().2);

    map_pixels(input, |x, y, out| {
        for (c, v) in out.iter_mut().enumerate() {
            let src = input[[y, x, c]];
            *v = if c < color { remap(src) } else { src };
        }
    })
}

/// Apply an RGB -> RGB transform, copying alpha through.
fn map_rgb<F>(input: ArrayView3<u8>, transform: F) -> Array3<u8>
where
    F: Fn([f32; 3]) -> [f32; 3] + Sync,
{
    if input.dim().2 < 3 {
        return input.to_owned();
    }

    map_pixels(input, |x, y, out| {
        let rgb = [
            input[[y, x, 0]] as f32,
            input[[y, x, 1]] as f32,
            input[[y, x, 2]] as f32,
        ];
        let mapped = transform(rgb);
        for (c, v) in out.iter_mut().enumerate() {
            *v = if c < 3 { to_u8(mapped[c]) } else { input[[y, x, c]] };
        }
    })
}

// ============================================================================
// Invert
// ============================================================================

/// Invert colours: `255 - v`.
pub fn invert(input: ArrayView3<u8>) -> Array3<u8> {
    map_colors(input, |v| 255 - v)
}

// ============================================================================
// Grayscale
// ============================================================================

/// Broadcast BT.709 luminosity to R, G and B.
pub fn grayscale(input: ArrayView3<u8>) -> Array3<u8> {
    map_rgb(input, |[r, g, b]| {
        let gray = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        [gray; 3]
    })
}

// ============================================================================
// Sepia
// ============================================================================

/// Apply the standard sepia colour matrix.
pub fn sepia(input: ArrayView3<u8>) -> Array3<u8> {
    map_rgb(input, |rgb| {
        let mut out = [0.0f32; 3];
        for (o, row) in out.iter_mut().zip(SEPIA.iter()) {
            *o = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
        }
        out
    })
}

// ============================================================================
// Brighten
// ============================================================================

/// Add `amount` to every colour channel, clamping to 0-255.
pub fn brighten(input: ArrayView3<u8>, amount: i16) -> Array3<u8> {
    map_colors(input, |v| (v as i16 + amount).clamp(0, 255) as u8)
}

// ============================================================================
// Tone carryover
// ============================================================================

/// Monotonic lookup table applied to each colour channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneTable {
    table: [u8; 256],
}

impl ToneTable {
    /// Build a table from explicit entries.
    ///
    /// # Errors
    /// The table must be non-decreasing.
    pub fn new(table: [u8; 256]) -> Result<Self> {
        if let Some(i) = table.windows(2).position(|w| w[0] > w[1]) {
            return Err(FilterError::parameter(
                "table",
                format!("[{}] = {} > [{}] = {}", i, table[i], i + 1, table[i + 1]),
                "tone table must be non-decreasing",
            ));
        }
        Ok(ToneTable { table })
    }

    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        ToneTable { table }
    }

    /// Power curve `255 * (v / 255)^(1 / gamma)`.
    pub fn gamma(gamma: f32) -> Result<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(FilterError::parameter("gamma", gamma, "must be finite and positive"));
        }

        let inv_gamma = 1.0 / gamma;
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = to_u8((i as f32 / 255.0).powf(inv_gamma) * 255.0);
        }
        ToneTable::new(table)
    }

    #[inline]
    pub fn lookup(&self, v: u8) -> u8 {
        self.table[v as usize]
    }
}

impl Default for ToneTable {
    fn default() -> Self {
        ToneTable::identity()
    }
}

/// Remap every colour channel through `table`.
pub fn tone(input: ArrayView3<u8>, table: &ToneTable) -> Array3<u8> {
    map_colors(input, |v| table.lookup(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(r: u8, g: u8, b: u8, a: u8) -> Array3<u8> {
        let values = [r, g, b, a];
        Array3::from_shape_fn((1, 1, 4), |(_, _, c)| values[c])
    }

    #[test]
    fn test_invert_rgba() {
        let result = invert(pixel(0, 100, 255, 77).view());
        assert_eq!(result.iter().copied().collect::<Vec<_>>(), vec![255, 155, 0, 77]);
    }

    #[test]
    fn test_invert_grayscale_channel() {
        let img = Array3::<u8>::from_elem((2, 2, 1), 30);
        assert!(invert(img.view()).iter().all(|&v| v == 225));
    }

    #[test]
    fn test_grayscale_broadcasts_luma() {
        let result = grayscale(pixel(255, 0, 0, 200).view());
        assert_eq!(result[[0, 0, 0]], 54);
        assert_eq!(result[[0, 0, 1]], 54);
        assert_eq!(result[[0, 0, 2]], 54);
        assert_eq!(result[[0, 0, 3]], 200);

        let white = grayscale(pixel(255, 255, 255, 255).view());
        assert_eq!(white[[0, 0, 1]], 255);
    }

    #[test]
    fn test_grayscale_single_channel_noop() {
        let img = Array3::<u8>::from_elem((2, 3, 1), 91);
        assert_eq!(grayscale(img.view()), img);
    }

    #[test]
    fn test_sepia() {
        let result = sepia(pixel(100, 100, 100, 255).view());
        assert_eq!(result[[0, 0, 0]], 135);
        assert_eq!(result[[0, 0, 1]], 120);
        assert_eq!(result[[0, 0, 2]], 94);

        let white = sepia(pixel(255, 255, 255, 9).view());
        assert_eq!(white[[0, 0, 0]], 255);
        assert_eq!(white[[0, 0, 3]], 9);
    }

    #[test]
    fn test_brighten_clamps() {
        let result = brighten(pixel(10, 220, 128, 100).view(), DEFAULT_BRIGHTEN);
        assert_eq!(result.iter().copied().collect::<Vec<_>>(), vec![60, 255, 178, 100]);

        let darker = brighten(pixel(10, 220, 128, 100).view(), -20);
        assert_eq!(darker.iter().copied().collect::<Vec<_>>(), vec![0, 200, 108, 100]);
    }

    #[test]
    fn test_tone_table_validation() {
        let mut table = [0u8; 256];
        table[10] = 5;
        assert!(ToneTable::new(table).is_err());

        assert!(ToneTable::gamma(0.0).is_err());
        assert_eq!(ToneTable::gamma(1.0).unwrap(), ToneTable::identity());
    }

    #[test]
    fn test_tone_gamma_brightens_midtones() {
        let table = ToneTable::gamma(2.2).unwrap();
        let result = tone(pixel(0, 128, 255, 42).view(), &table);

        assert_eq!(result[[0, 0, 0]], 0);
        assert!(result[[0, 0, 1]] > 128);
        assert_eq!(result[[0, 0, 2]], 255);
        assert_eq!(result[[0, 0, 3]], 42);
    }
}
