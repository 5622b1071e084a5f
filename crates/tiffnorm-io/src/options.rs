//! Write configuration.

use crate::tags::Compression;

/// Chunking used when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkLayout {
    /// Horizontal strips.
    #[default]
    Strips,
    /// Rectangular tiles.
    Tiles,
}

/// Options for writing TIFF directories.
///
/// # Example
///
/// ```rust
/// use tiffnorm_io::{ChunkLayout, WriteOptions};
///
/// let options = WriteOptions {
///     layout: ChunkLayout::Tiles,
///     tile_width: 64,
///     tile_height: 64,
///     ..Default::default()
/// };
/// assert_eq!(options.max_bytes_per_strip, 64 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Chunk compression. Default: none.
    pub compression: Compression,
    /// JPEG quality, used only with JPEG compression. Default: 95.
    pub jpeg_quality: u8,
    /// Strips or tiles. Default: strips.
    pub layout: ChunkLayout,
    /// Upper bound on uncompressed strip size. Default: 64 KiB.
    pub max_bytes_per_strip: usize,
    /// Requested rows per strip before the byte bound applies. Default: 4096.
    pub rows_per_strip: u32,
    /// Tile width, rounded up to a multiple of 16. Default: 256.
    pub tile_width: u32,
    /// Tile height, rounded up to a multiple of 16. Default: 256.
    pub tile_height: u32,
    /// Software tag. Default: "tiffnorm".
    pub software: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            jpeg_quality: 95,
            layout: ChunkLayout::Strips,
            max_bytes_per_strip: 64 * 1024,
            rows_per_strip: 4096,
            tile_width: 256,
            tile_height: 256,
            software: Some("tiffnorm".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = WriteOptions::default();
        assert_eq!(options.layout, ChunkLayout::Strips);
        assert_eq!(options.compression, Compression::None);
        assert_eq!(options.rows_per_strip, 4096);
        assert_eq!((options.tile_width, options.tile_height), (256, 256));
        assert_eq!(options.software.as_deref(), Some("tiffnorm"));
    }
}
