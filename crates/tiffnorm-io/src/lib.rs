//! # tiffnorm-io
//!
//! Normalizes TIFF pixel data to interleaved 8/16-bit buffers and back.
//!
//! A TIFF directory may store its pixels in strips or tiles, chunky or
//! planar, at 1, 4, 8 or 16 bits, as grayscale (either polarity), RGB(A),
//! YCbCr or L*a*b*. Reading turns all of these into the single layout of
//! [`tiffnorm_core::DynImage`]; writing produces strips or tiles from it.
//!
//! # Architecture
//!
//! - [`check_suitability`] - Rejects directories that cannot be normalized
//! - [`OutputLayout`] - Normalized layout derived from a [`SourceLayout`]
//! - [`geometry`] - Strip and tile arithmetic
//! - [`expand`] - 1/4-bit to 8-bit expansion and min-is-white inversion
//! - [`transfer`] - Per-chunk read/write loops
//! - [`read_directory`] / [`write_directory`] - Entry points over the chunk traits
//!
//! Chunk bytes come from a [`ChunkReader`] and go to a [`ChunkWriter`].
//! [`TiffReader`] and [`TiffWriter`] implement them on any [`Stream`]
//! using the `tiff` crate for the container and its codecs (see
//! [`backend`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tiffnorm_io::{WriteOptions, read, write};
//!
//! let image = read("scan.tif")?;
//! write("copy.tif", &image.view(), &WriteOptions::default())?;
//! # Ok::<(), tiffnorm_io::TiffError>(())
//! ```
//!
//! # Supported Sources
//!
//! | Photometric | Samples | Bits | Output |
//! |-------------|---------|------|--------|
//! | MinIsBlack / MinIsWhite | 1 | 1, 4, 8, 16 | Y |
//! | RGB | 3, 4 | 1, 4, 8, 16 | RGB, RGBA |
//! | YCbCr | 3 | 8 | RGB |
//! | CIELab | 3 | 8 | RGB |
//!
//! ICCLab and ITULab directories are normalized like CIELab when served by
//! a custom [`ChunkReader`]; [`TiffReader`] cannot open them.
//!
//! # Feature Flags
//!
//! - `parallel` - Convert YCbCr/Lab chunks on the rayon pool

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
mod chunk;
mod color;
mod driver;
mod error;
pub mod expand;
mod gate;
pub mod geometry;
mod layout;
mod options;
mod output;
mod stream;
pub mod tags;
pub mod transfer;

pub use chunk::{ChunkReader, ChunkWriter, DirectoryLayout};
pub use color::{ColorInfo, YCbCrInfo};
pub use backend::{DirectoryWriter, TiffReader, TiffWriter};
pub use driver::{
    DirectoryInfo, read, read_directory, read_tiff, read_tiff_layout, write, write_directory,
    write_tiff,
};
pub use error::{TiffError, TiffResult};
pub use gate::{SUPPORTED_BITS, check_suitability};
pub use geometry::{Chunking, StripLayout, TileLayout, TileOrigin};
pub use layout::{AuxiliaryInfo, SourceLayout};
pub use options::{ChunkLayout, WriteOptions};
pub use output::{OutputLayout, prepare_target};
pub use stream::{FileStream, MemoryStream, Stream};
pub use tags::{Compression, Orientation, Photometric, PlanarConfig, TiffSampleFormat};
