//! Error types for colour conversion.

use thiserror::Error;

/// Result type for colour operations.
pub type ColorResult<T> = Result<T, ColorError>;

/// Errors raised while building converters or converting chunks.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Luma coefficients cannot produce a conversion table.
    #[error("invalid YCbCr coefficients {0:?}")]
    InvalidCoefficients([f32; 3]),

    /// Reference black/white values are not finite.
    #[error("invalid reference black/white {0:?}")]
    InvalidReferenceBlackWhite([f32; 6]),

    /// White point chromaticity with zero or non-finite y.
    #[error("invalid white point chromaticity ({x}, {y})")]
    InvalidWhitePoint {
        /// Chromaticity x
        x: f32,
        /// Chromaticity y
        y: f32,
    },

    /// A subsampling factor of zero.
    #[error("invalid chroma subsampling {horizontal}x{vertical}")]
    InvalidSubsampling {
        /// Horizontal factor
        horizontal: u16,
        /// Vertical factor
        vertical: u16,
    },

    /// Chunk buffer shorter than its pixel extent requires.
    #[error("chunk buffer too small: need {required} bytes, got {actual}")]
    ChunkTooSmall {
        /// Bytes required
        required: usize,
        /// Bytes supplied
        actual: usize,
    },
}
