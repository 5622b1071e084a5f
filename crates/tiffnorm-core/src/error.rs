//! Error types for tiffnorm-core operations.
//!
//! Covers the failure modes of the normalized pixel buffer: invalid
//! dimensions, undersized backing storage and out-of-range row access.
//!
//! # Usage
//!
//! ```rust
//! use tiffnorm_core::{Error, Result};
//!
//! fn check_row(y: u32, height: u32) -> Result<()> {
//!     if y >= height {
//!         return Err(Error::RowOutOfBounds { y, height });
//!     }
//!     Ok(())
//! }
//! assert!(check_row(3, 2).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by buffer and layout operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Layout dimensions are unusable (zero channels, zero bytes per channel...).
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Layout width
        width: u32,
        /// Layout height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Backing storage is smaller than `stride * height`.
    #[error("buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required by the layout
        required: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Row stride is smaller than the packed row size.
    #[error("stride {stride} is smaller than row size {row_bytes}")]
    InvalidStride {
        /// Requested stride in bytes
        stride: usize,
        /// Packed row size in bytes
        row_bytes: usize,
    },

    /// Row index outside the image.
    #[error("row {y} out of bounds for image height {height}")]
    RowOutOfBounds {
        /// Requested row
        y: u32,
        /// Image height
        height: u32,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::invalid_dimensions(10, 20, "zero channels");
        assert!(err.to_string().contains("10x20"));
        assert!(err.to_string().contains("zero channels"));

        let err = Error::BufferTooSmall {
            required: 300,
            actual: 200,
        };
        assert!(err.to_string().contains("300"));
    }
}
