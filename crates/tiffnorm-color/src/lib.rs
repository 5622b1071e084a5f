//! # tiffnorm-color
//!
//! Colour conversions needed to normalize TIFF pixel data to RGB.
//!
//! - [`YCbCrConverter`] - Fixed point YCbCr to RGB tables
//! - [`LabConverter`] - CIE L*a*b* to XYZ to display RGB
//! - [`Subsampling`] - Chroma subsampling factors and data unit geometry
//! - [`ycbcr_chunk_to_rgb`], [`lab_chunk_to_rgb`] - Whole-chunk conversion
//!
//! Converters are built once per directory, are `Send + Sync` and are not
//! `Clone`; construction either succeeds completely or returns a
//! [`ColorError`].
//!
//! ## Feature Flags
//!
//! - `parallel` - Convert chunk rows on the rayon pool

#![warn(missing_docs)]

pub mod chunk;
pub mod error;
pub mod lab;
pub mod ycbcr;

pub use chunk::{lab_chunk_to_rgb, ycbcr_chunk_to_rgb};
pub use error::{ColorError, ColorResult};
pub use lab::LabConverter;
pub use ycbcr::{Subsampling, YCbCrConverter};
