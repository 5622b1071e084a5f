//! Error types for TIFF normalization.
//!
//! Failures fall into four groups: the source cannot be normalized
//! ([`TiffError::UnsupportedSource`]), a chunk could not be moved
//! ([`TiffError::ChunkIo`]), the destination refused the derived layout
//! ([`TiffError::LayoutRejected`]), or the container itself is broken
//! ([`TiffError::InvalidFile`], [`TiffError::Io`]).
//!
//! Errors from the `tiff` crate are mapped onto these groups by the
//! `From<tiff::TiffError>` conversion.
//!
//! Chunk size mismatches are never errors; they are logged as warnings.

use std::io;

use thiserror::Error;

use crate::Compression;

/// Result type for TIFF operations.
pub type TiffResult<T> = Result<T, TiffError>;

/// Error type for TIFF operations.
#[derive(Debug, Error)]
pub enum TiffError {
    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed container structure.
    #[error("invalid TIFF file: {0}")]
    InvalidFile(String),

    /// Source configuration that cannot be normalized.
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// Reading or writing a chunk failed.
    #[error("chunk {index}: {reason}")]
    ChunkIo {
        /// Strip or tile index
        index: u32,
        /// What went wrong
        reason: String,
    },

    /// Destination buffer refused the derived layout.
    #[error(
        "destination rejected layout {width}x{height}, {channels} channels, {bytes_per_channel} bytes/channel"
    )]
    LayoutRejected {
        /// Output width
        width: u32,
        /// Output height
        height: u32,
        /// Output channels
        channels: u16,
        /// Output bytes per channel
        bytes_per_channel: u16,
    },

    /// Compression the TIFF writer cannot encode.
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(Compression),

    /// Converter construction or chunk conversion failed.
    #[error(transparent)]
    Color(#[from] tiffnorm_color::ColorError),

    /// Buffer or layout error.
    #[error(transparent)]
    Core(#[from] tiffnorm_core::Error),
}

impl TiffError {
    /// Wraps any failure of chunk `index` as [`TiffError::ChunkIo`].
    ///
    /// An error that already names a chunk is passed through unchanged.
    pub fn chunk(index: u32, err: TiffError) -> Self {
        match err {
            e @ TiffError::ChunkIo { .. } => e,
            other => TiffError::ChunkIo {
                index,
                reason: other.to_string(),
            },
        }
    }

    /// Creates a [`TiffError::InvalidFile`] error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }

    /// Creates a [`TiffError::UnsupportedSource`] error.
    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedSource(msg.into())
    }
}

impl From<tiff::TiffError> for TiffError {
    fn from(err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::IoError(e) => Self::Io(e),
            tiff::TiffError::UnsupportedError(e) => Self::UnsupportedSource(e.to_string()),
            other => Self::InvalidFile(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_wrapping() {
        let err = TiffError::chunk(3, TiffError::invalid("truncated"));
        assert!(matches!(err, TiffError::ChunkIo { index: 3, .. }));
        assert!(err.to_string().contains("truncated"));

        let inner = TiffError::ChunkIo {
            index: 7,
            reason: "short read".into(),
        };
        assert!(matches!(
            TiffError::chunk(1, inner),
            TiffError::ChunkIo { index: 7, .. }
        ));
    }

    #[test]
    fn test_display() {
        let err = TiffError::UnsupportedCompression(Compression::Lzw);
        assert_eq!(err.to_string(), "unsupported compression: LZW");
    }

    #[test]
    fn test_from_tiff_error() {
        let io = tiff::TiffError::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(matches!(TiffError::from(io), TiffError::Io(_)));

        let limits = tiff::TiffError::LimitsExceeded;
        assert!(matches!(TiffError::from(limits), TiffError::InvalidFile(_)));
    }
}
