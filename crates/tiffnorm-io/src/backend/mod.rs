//! TIFF container backend built on the `tiff` crate.
//!
//! [`TiffReader`] wraps [`tiff::decoder::Decoder`] and [`TiffWriter`] wraps
//! [`tiff::encoder::TiffEncoder`]. They translate between the crate's tag
//! model and [`SourceLayout`](crate::SourceLayout) /
//! [`DirectoryLayout`](crate::DirectoryLayout), and implement
//! [`ChunkReader`](crate::ChunkReader) / [`ChunkWriter`](crate::ChunkWriter)
//! so the transfer routines run on real files.
//!
//! # Codecs
//!
//! | Compression | Read | Write |
//! |-------------|------|-------|
//! | None | yes | yes |
//! | LZW | yes | yes |
//! | Deflate / AdobeDeflate | yes | yes |
//! | PackBits | yes | yes |
//! | JPEG | YCbCr, gray, RGB | no |
//!
//! Classic TIFF and BigTIFF are both read. Output is classic TIFF in
//! native byte order.

pub mod reader;
pub mod writer;

use tiff::tags::Tag;

pub use reader::TiffReader;
pub use writer::{DirectoryWriter, TiffWriter};

/// Tags without a named variant in [`tiff::tags::Tag`].
pub mod tag {
    use super::Tag;

    /// WhitePoint (318).
    pub fn white_point() -> Tag {
        Tag::from_u16_exhaustive(318)
    }

    /// YCbCrCoefficients (529).
    pub fn ycbcr_coefficients() -> Tag {
        Tag::from_u16_exhaustive(529)
    }

    /// YCbCrSubSampling (530).
    pub fn ycbcr_subsampling() -> Tag {
        Tag::from_u16_exhaustive(530)
    }

    /// YCbCrPositioning (531).
    pub fn ycbcr_positioning() -> Tag {
        Tag::from_u16_exhaustive(531)
    }

    /// ReferenceBlackWhite (532).
    pub fn reference_black_white() -> Tag {
        Tag::from_u16_exhaustive(532)
    }

    /// ImageDepth (32997).
    pub fn image_depth() -> Tag {
        Tag::from_u16_exhaustive(32997)
    }

    /// TileDepth (32998).
    pub fn tile_depth() -> Tag {
        Tag::from_u16_exhaustive(32998)
    }
}
