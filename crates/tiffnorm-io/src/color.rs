//! Container-supplied colour parameters.
//!
//! [`ColorInfo`] gathers the tags needed to build the colour converters.
//! [`YCbCrInfo`] is the YCbCr subset and validates it against the chunk
//! geometry. Validation only produces warnings: a file with odd
//! subsampling may still decode correctly.

use tiffnorm_color::{LabConverter, Subsampling, YCbCrConverter};
use tiffnorm_core::Diagnostics;

use crate::tags::Photometric;

/// Colour tags of one directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorInfo {
    /// Luma coefficients (red, green, blue).
    pub ycbcr_coefficients: [f32; 3],
    /// Reference black and white per channel.
    pub reference_black_white: [f32; 6],
    /// Chroma sample positioning (1 centered, 2 cosited).
    pub ycbcr_positioning: u16,
    /// Chroma subsampling factors.
    pub subsampling: Subsampling,
    /// White point chromaticity (x, y).
    pub white_point: [f32; 2],
}

impl Default for ColorInfo {
    fn default() -> Self {
        Self::for_photometric(Photometric::MinIsBlack)
    }
}

impl ColorInfo {
    /// Reference black and white used when the tag is absent on non-YCbCr data.
    pub const FULL_RANGE_BLACK_WHITE: [f32; 6] = [0.0, 255.0, 0.0, 255.0, 0.0, 255.0];

    /// Tag defaults for the given colour model.
    pub fn for_photometric(photometric: Photometric) -> Self {
        let reference_black_white = if photometric == Photometric::YCbCr {
            YCbCrConverter::DEFAULT_REFERENCE_BLACK_WHITE
        } else {
            Self::FULL_RANGE_BLACK_WHITE
        };
        Self {
            ycbcr_coefficients: YCbCrConverter::DEFAULT_COEFFICIENTS,
            reference_black_white,
            ycbcr_positioning: 1,
            subsampling: Subsampling::default(),
            white_point: LabConverter::D50_WHITE_POINT,
        }
    }

    /// YCbCr subset of these parameters.
    pub fn ycbcr(&self) -> YCbCrInfo {
        YCbCrInfo {
            coefficients: self.ycbcr_coefficients,
            positioning: self.ycbcr_positioning,
            subsampling: self.subsampling,
        }
    }
}

/// YCbCr parameters with geometry checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrInfo {
    /// Luma coefficients (red, green, blue).
    pub coefficients: [f32; 3],
    /// Chroma sample positioning.
    pub positioning: u16,
    /// Chroma subsampling factors.
    pub subsampling: Subsampling,
}

impl YCbCrInfo {
    /// Checks subsampling against a strip layout.
    ///
    /// Returns `false` after logging a warning when the factors are
    /// non-standard or do not divide the image or strip height.
    pub fn check_strip_size(
        &self,
        width: u32,
        height: u32,
        rows_per_strip: u32,
        log: &mut dyn Diagnostics,
    ) -> bool {
        if !self.check_subsampling(log) || !self.check_image_size(width, height, log) {
            return false;
        }
        if rows_per_strip % self.subsampling.vertical as u32 != 0 {
            log.warning("Invalid rows_per_strip for YCbCr y-subsampling parameter".into());
            return false;
        }
        true
    }

    /// Checks subsampling against a tile layout.
    pub fn check_tile_size(
        &self,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        log: &mut dyn Diagnostics,
    ) -> bool {
        if !self.check_subsampling(log) || !self.check_image_size(width, height, log) {
            return false;
        }
        if tile_width % self.subsampling.horizontal as u32 != 0
            || tile_height % self.subsampling.vertical as u32 != 0
        {
            log.warning("Invalid tile_width/tile_height for YCbCr subsampling parameters".into());
            return false;
        }
        true
    }

    fn check_subsampling(&self, log: &mut dyn Diagnostics) -> bool {
        if !self.subsampling.is_standard() {
            log.warning(format!(
                "Invalid YCbCr subsampling parameters [{}, {}]",
                self.subsampling.horizontal, self.subsampling.vertical
            ));
            return false;
        }
        true
    }

    // Only called after check_subsampling, so the factors are non-zero.
    fn check_image_size(&self, width: u32, height: u32, log: &mut dyn Diagnostics) -> bool {
        if width % self.subsampling.horizontal as u32 != 0
            || height % self.subsampling.vertical as u32 != 0
        {
            log.warning("Invalid width/height for YCbCr subsampling parameters".into());
            return false;
        }
        true
    }
}

impl std::fmt::Display for YCbCrInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.coefficients;
        write!(
            f,
            "coefficients = ({r}, {g}, {b}), positioning = {}, subsampling = [{}, {}]",
            self.positioning, self.subsampling.horizontal, self.subsampling.vertical
        )
    }
}
