//! # tiffnorm-core
//!
//! Core types shared by the tiffnorm crates.
//!
//! - [`DynImage`], [`DynImageView`], [`DynImageViewMut`] - Normalized byte buffers
//! - [`UntypedLayout`], [`ImageSemantics`] - Buffer shape and meaning
//! - [`PixelFormat`], [`SampleFormat`] - Colour model and sample tags
//! - [`ImageTarget`] - Destination buffer layout negotiation
//! - [`Diagnostics`], [`MessageLog`] - Diagnostics sink
//!
//! ## Normalized Layout
//!
//! Every buffer handled here is interleaved and row-major, with 1 or 2 bytes
//! per channel sample. Readers convert whatever a container stores into this
//! shape; writers take it back out.
//!
//! ## Crate Structure
//!
//! ```text
//! tiffnorm-core (this crate)
//!    ^
//!    +-- tiffnorm-color (YCbCr / Lab conversion)
//!    +-- tiffnorm-io (chunk geometry, transfer, container)
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod image;
pub mod layout;
pub mod message;

pub use error::{Error, Result};
pub use format::{PixelFormat, SampleFormat};
pub use image::{DynImage, DynImageView, DynImageViewMut, ImageTarget};
pub use layout::{ImageSemantics, UntypedLayout};
pub use message::{Diagnostics, LogEntry, MessageLog, Severity};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{PixelFormat, SampleFormat};
    pub use crate::image::{DynImage, DynImageView, DynImageViewMut, ImageTarget};
    pub use crate::layout::{ImageSemantics, UntypedLayout};
    pub use crate::message::{Diagnostics, MessageLog, Severity};
}
