//! CIE L*a*b* to RGB conversion.
//!
//! Two stages: Lab to XYZ relative to a reference white derived from the
//! source white point, then XYZ to display RGB through the sRGB primaries
//! matrix and a gamma 2.4 lookup table.
//!
//! # Display Model
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Light output for reference white | 100 |
//! | Residual light for black | 1.0 |
//! | Gamma | 2.4 |
//! | Pixel value for reference white | 255 |
//! | Table steps | 1500 |
//!
//! # Example
//!
//! ```rust
//! use tiffnorm_color::LabConverter;
//!
//! let conv = LabConverter::new(LabConverter::D50_WHITE_POINT).unwrap();
//! assert_eq!(conv.convert(0, 0, 0), [0, 0, 0]);
//! let [r, g, _] = conv.convert(255, 0, 0);
//! assert!(r == 255 && g > 245);
//! ```

use glam::{Mat3, Vec3};

use crate::{ColorError, ColorResult};

/// XYZ to linear display RGB, row-major.
const DISPLAY_MATRIX: [[f32; 3]; 3] = [
    [3.2410, -1.5374, -0.4986],
    [-0.9692, 1.8760, 0.0416],
    [0.0556, -0.2040, 1.0570],
];

/// Light output for reference white.
const LIGHT_WHITE: f32 = 100.0;
/// Residual light output for a black pixel.
const LIGHT_BLACK: f32 = 1.0;
/// Display gamma.
const GAMMA: f64 = 2.4;
/// Pixel value for reference white.
const PIXEL_WHITE: f32 = 255.0;
/// Number of steps in the gamma table.
const TABLE_RANGE: usize = 1500;

/// Lab to RGB converter with precomputed gamma table.
///
/// Not `Clone`; build once per directory.
#[derive(Debug)]
pub struct LabConverter {
    ref_white: Vec3,
    display: Mat3,
    step: f32,
    gamma_table: Box<[f32]>,
}

impl LabConverter {
    /// D50 white point chromaticity (x, y).
    pub const D50_WHITE_POINT: [f32; 2] = [
        96.425 / (96.425 + 100.0 + 82.468),
        100.0 / (96.425 + 100.0 + 82.468),
    ];

    /// Builds a converter for the given white point chromaticity.
    ///
    /// The reference white is `Y0 = 100`, `X0 = x / y * 100` and
    /// `Z0 = (1 - x - y) / y * 100`. A zero or non-finite `y` is rejected.
    pub fn new(white_point: [f32; 2]) -> ColorResult<Self> {
        let [x, y] = white_point;
        if !x.is_finite() || !y.is_finite() || y == 0.0 {
            return Err(ColorError::InvalidWhitePoint { x, y });
        }
        let y0 = 100.0;
        let ref_white = Vec3::new(x / y * y0, y0, (1.0 - x - y) / y * y0);
        if !ref_white.is_finite() {
            return Err(ColorError::InvalidWhitePoint { x, y });
        }

        let exponent = 1.0 / GAMMA;
        let gamma_table = (0..=TABLE_RANGE)
            .map(|i| PIXEL_WHITE * ((i as f64 / TABLE_RANGE as f64).powf(exponent) as f32))
            .collect();

        Ok(Self {
            ref_white,
            display: Mat3::from_cols_array_2d(&DISPLAY_MATRIX).transpose(),
            step: (LIGHT_WHITE - LIGHT_BLACK) / TABLE_RANGE as f32,
            gamma_table,
        })
    }

    /// Reference white in XYZ.
    #[inline]
    pub fn reference_white(&self) -> Vec3 {
        self.ref_white
    }

    /// Converts an 8-bit Lab sample to XYZ.
    ///
    /// `l` spans 0..=255 for L* 0..100; `a` and `b` are signed.
    pub fn lab_to_xyz(&self, l: u8, a: i8, b: i8) -> Vec3 {
        let Vec3 {
            x: x0,
            y: y0,
            z: z0,
        } = self.ref_white;
        let l = l as f32 * 100.0 / 255.0;

        let (y, cby) = if l < 8.856 {
            let y = l * y0 / 903.292;
            (y, 7.787 * (y / y0) + 16.0 / 116.0)
        } else {
            let cby = (l + 16.0) / 116.0;
            (y0 * cby * cby * cby, cby)
        };

        let inverse_f = |t: f32, white: f32| {
            if t < 0.2069 {
                white * (t - 0.13793) / 7.787
            } else {
                white * t * t * t
            }
        };

        let x = inverse_f(a as f32 / 500.0 + cby, x0);
        let z = inverse_f(cby - b as f32 / 200.0, z0);
        Vec3::new(x, y, z)
    }

    /// Converts XYZ to display RGB.
    pub fn xyz_to_rgb(&self, xyz: Vec3) -> [u8; 3] {
        let linear = (self.display * xyz).clamp(Vec3::splat(LIGHT_BLACK), Vec3::splat(LIGHT_WHITE));
        let lookup = |v: f32| {
            let i = (((v - LIGHT_BLACK) / self.step) as usize).min(TABLE_RANGE);
            to_byte(self.gamma_table[i])
        };
        [lookup(linear.x), lookup(linear.y), lookup(linear.z)]
    }

    /// Converts one 8-bit Lab triplet to RGB.
    #[inline]
    pub fn convert(&self, l: u8, a: i8, b: i8) -> [u8; 3] {
        self.xyz_to_rgb(self.lab_to_xyz(l, a, b))
    }
}

/// Rounds half to even and saturates to a byte.
#[inline]
fn to_byte(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
