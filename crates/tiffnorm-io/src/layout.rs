//! Source directory description.
//!
//! [`SourceLayout`] is the immutable record of how one TIFF directory stores
//! its pixels. It is produced by a [`ChunkReader`](crate::ChunkReader) and
//! consumed once per read. [`AuxiliaryInfo`] carries the descriptive tags
//! that do not affect pixel layout.

use tiffnorm_core::PixelFormat;

use crate::tags::{Compression, Orientation, Photometric, PlanarConfig, TiffSampleFormat};

/// Pixel storage parameters of one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLayout {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Image depth (1 for 2D images).
    pub depth: u32,
    /// Samples per pixel.
    pub samples_per_pixel: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Chunky or planar storage.
    pub planar_config: PlanarConfig,
    /// Colour model.
    pub photometric: Photometric,
    /// Numeric sample type.
    pub sample_format: TiffSampleFormat,
    /// Chunk compression.
    pub compression: Compression,
    /// Placement of the first row and column.
    pub orientation: Orientation,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            depth: 1,
            samples_per_pixel: 1,
            bits_per_sample: 1,
            planar_config: PlanarConfig::Contiguous,
            photometric: Photometric::MinIsBlack,
            sample_format: TiffSampleFormat::UnsignedInt,
            compression: Compression::None,
            orientation: Orientation::TopLeft,
        }
    }
}

impl SourceLayout {
    /// Single-channel min-is-white data that must be inverted.
    #[inline]
    pub fn inverted(&self) -> bool {
        self.samples_per_pixel == 1 && self.photometric == Photometric::MinIsWhite
    }

    /// Grayscale of either polarity.
    #[inline]
    pub fn is_grayscale(&self) -> bool {
        matches!(
            self.photometric,
            Photometric::MinIsWhite | Photometric::MinIsBlack
        )
    }

    /// Luma/chroma data.
    #[inline]
    pub fn is_ycbcr(&self) -> bool {
        self.photometric == Photometric::YCbCr
    }

    /// Any of the L*a*b* encodings.
    #[inline]
    pub fn is_lab(&self) -> bool {
        matches!(
            self.photometric,
            Photometric::CieLab | Photometric::IccLab | Photometric::ItuLab
        )
    }

    /// Colour-mapped indices.
    #[inline]
    pub fn is_palette(&self) -> bool {
        self.photometric == Photometric::Palette
    }

    /// One plane per channel.
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.planar_config == PlanarConfig::Separate
    }

    /// Number of planes chunks are grouped into.
    #[inline]
    pub fn planes(&self) -> u16 {
        if self.is_planar() {
            self.samples_per_pixel
        } else {
            1
        }
    }

    /// Samples stored per pixel inside one chunk.
    #[inline]
    pub fn samples_per_chunk_pixel(&self) -> u16 {
        if self.is_planar() {
            1
        } else {
            self.samples_per_pixel
        }
    }

    /// Bytes of one stored row of `width` pixels inside a chunk.
    ///
    /// Sub-byte rows are padded to a whole byte.
    pub fn chunk_row_bytes(&self, width: u32) -> usize {
        let bits = width as usize * self.samples_per_chunk_pixel() as usize * self.bits_per_sample as usize;
        bits.div_ceil(8)
    }

    /// Colour model of the stored samples.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.photometric.to_pixel_format(self.samples_per_pixel)
    }
}

impl std::fmt::Display for SourceLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} {}x{}-bit {} {}, {}, {}",
            self.width,
            self.height,
            self.samples_per_pixel,
            self.bits_per_sample,
            self.sample_format,
            self.photometric,
            self.planar_config,
            self.compression
        )
    }
}

/// Descriptive tags carried alongside the pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryInfo {
    /// MinSampleValue.
    pub min_sample_value: Option<u16>,
    /// MaxSampleValue.
    pub max_sample_value: Option<u16>,
    /// XResolution.
    pub x_resolution: Option<f64>,
    /// YResolution.
    pub y_resolution: Option<f64>,
    /// ResolutionUnit (1 none, 2 inch, 3 centimeter).
    pub resolution_unit: Option<u16>,
    /// Software.
    pub software: Option<String>,
    /// DateTime.
    pub date_time: Option<String>,
    /// ImageDescription.
    pub description: Option<String>,
    /// Artist.
    pub artist: Option<String>,
    /// HostComputer.
    pub host_computer: Option<String>,
    /// Make.
    pub make: Option<String>,
    /// Model.
    pub model: Option<String>,
}
