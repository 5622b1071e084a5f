//! YCbCr to RGB conversion.
//!
//! The conversion uses 16-bit fixed point lookup tables built from the luma
//! coefficients and reference black/white levels, reproducing the results
//! of the reference TIFF library bit for bit.
//!
//! # Example
//!
//! ```rust
//! use tiffnorm_color::YCbCrConverter;
//!
//! let conv = YCbCrConverter::new(
//!     YCbCrConverter::DEFAULT_COEFFICIENTS,
//!     YCbCrConverter::DEFAULT_REFERENCE_BLACK_WHITE,
//! ).unwrap();
//! assert_eq!(conv.convert(100, 128, 128), [100, 100, 100]);
//! ```

use crate::{ColorError, ColorResult};

/// Fixed point fraction bits.
const SHIFT: u32 = 16;
/// 0.5 in fixed point.
const ONE_HALF: i32 = 1 << (SHIFT - 1);
/// Table values are clamped to +-128 * 32.
const TABLE_LIMIT: f32 = 128.0 * 32.0;

#[inline]
fn fix(x: f32) -> i32 {
    (x * (1 << SHIFT) as f32 + 0.5) as i32
}

/// Maps a code value onto `cr` steps between reference black and white.
#[inline]
fn code_to_value(c: i32, rb: f32, rw: f32, cr: f32) -> f32 {
    let range = if rw - rb != 0.0 { rw - rb } else { 1.0 };
    ((c - rb as i32) as f32 * cr) / range
}

#[inline]
fn clamp_table(v: f32) -> i32 {
    v.clamp(-TABLE_LIMIT, TABLE_LIMIT) as i32
}

/// Chroma subsampling factors of a YCbCr source.
///
/// Each data unit of a subsampled chunk holds `horizontal * vertical` luma
/// samples followed by one Cb and one Cr sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subsampling {
    /// Horizontal factor (luma columns per chroma sample)
    pub horizontal: u16,
    /// Vertical factor (luma rows per chroma sample)
    pub vertical: u16,
}

impl Default for Subsampling {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl Subsampling {
    /// No subsampling.
    pub const NONE: Self = Self::new(1, 1);

    /// Creates subsampling factors.
    #[inline]
    pub const fn new(horizontal: u16, vertical: u16) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Whether both factors are usable for indexing.
    #[inline]
    pub const fn is_nonzero(&self) -> bool {
        self.horizontal != 0 && self.vertical != 0
    }

    /// Whether both factors are 1, 2 or 4 and vertical does not exceed horizontal.
    pub const fn is_standard(&self) -> bool {
        matches!(self.horizontal, 1 | 2 | 4)
            && matches!(self.vertical, 1 | 2 | 4)
            && self.vertical <= self.horizontal
    }

    /// Bytes of one data unit.
    #[inline]
    pub const fn unit_len(&self) -> usize {
        self.horizontal as usize * self.vertical as usize + 2
    }

    /// Data units needed to cover `width` columns, partial units included.
    #[inline]
    pub fn units_across(&self, width: u32) -> usize {
        (width as usize).div_ceil(self.horizontal as usize)
    }

    /// Data units needed to cover `height` rows, partial units included.
    #[inline]
    pub fn units_down(&self, height: u32) -> usize {
        (height as usize).div_ceil(self.vertical as usize)
    }

    /// Bytes of a chunk of `width x height` pixels.
    pub fn chunk_len(&self, width: u32, height: u32) -> usize {
        self.units_across(width) * self.units_down(height) * self.unit_len()
    }
}

/// Lookup-table YCbCr to RGB converter.
///
/// Built once per directory and shared read-only across chunks. Not `Clone`.
#[derive(Debug)]
pub struct YCbCrConverter {
    cr_r: Box<[i32; 256]>,
    cb_b: Box<[i32; 256]>,
    cr_g: Box<[i32; 256]>,
    cb_g: Box<[i32; 256]>,
    y: Box<[i32; 256]>,
}

impl YCbCrConverter {
    /// ITU-R BT.601 luma coefficients.
    pub const DEFAULT_COEFFICIENTS: [f32; 3] = [0.299, 0.587, 0.114];

    /// Reference black/white for YCbCr data with full-range codes.
    pub const DEFAULT_REFERENCE_BLACK_WHITE: [f32; 6] = [0.0, 255.0, 128.0, 255.0, 128.0, 255.0];

    /// Builds the conversion tables.
    ///
    /// Fails when a coefficient or reference value is not finite, or when
    /// the green coefficient is zero.
    pub fn new(coefficients: [f32; 3], reference_black_white: [f32; 6]) -> ColorResult<Self> {
        let [luma_red, luma_green, luma_blue] = coefficients;
        if coefficients.iter().any(|c| !c.is_finite()) || luma_green == 0.0 {
            return Err(ColorError::InvalidCoefficients(coefficients));
        }
        if reference_black_white.iter().any(|c| !c.is_finite()) {
            return Err(ColorError::InvalidReferenceBlackWhite(reference_black_white));
        }
        let rbw = reference_black_white;

        let f1 = 2.0 - 2.0 * luma_red;
        let d1 = fix(f1.clamp(0.0, 2.0));
        let f2 = luma_red * f1 / luma_green;
        let d2 = -fix(f2.clamp(0.0, 2.0));
        let f3 = 2.0 - 2.0 * luma_blue;
        let d3 = fix(f3.clamp(0.0, 2.0));
        let f4 = luma_blue * f3 / luma_green;
        let d4 = -fix(f4.clamp(0.0, 2.0));

        let mut conv = Self {
            cr_r: Box::new([0; 256]),
            cb_b: Box::new([0; 256]),
            cr_g: Box::new([0; 256]),
            cb_g: Box::new([0; 256]),
            y: Box::new([0; 256]),
        };

        for i in 0..256usize {
            let x = i as i32 - 128;
            let cr = clamp_table(code_to_value(x, rbw[4] - 128.0, rbw[5] - 128.0, 127.0));
            let cb = clamp_table(code_to_value(x, rbw[2] - 128.0, rbw[3] - 128.0, 127.0));
            conv.cr_r[i] = (d1 * cr + ONE_HALF) >> SHIFT;
            conv.cb_b[i] = (d3 * cb + ONE_HALF) >> SHIFT;
            conv.cr_g[i] = d2 * cr;
            conv.cb_g[i] = d4 * cb + ONE_HALF;
            conv.y[i] = clamp_table(code_to_value(x + 128, rbw[0], rbw[1], 255.0));
        }

        Ok(conv)
    }

    /// Converts one YCbCr triplet to RGB.
    #[inline]
    pub fn convert(&self, y: u8, cb: u8, cr: u8) -> [u8; 3] {
        let (y, cb, cr) = (y as usize, cb as usize, cr as usize);
        let luma = self.y[y];
        let r = luma + self.cr_r[cr];
        let g = luma + ((self.cb_g[cb] + self.cr_g[cr]) >> SHIFT);
        let b = luma + self.cb_b[cb];
        [
            r.clamp(0, 255) as u8,
            g.clamp(0, 255) as u8,
            b.clamp(0, 255) as u8,
        ]
    }
}
