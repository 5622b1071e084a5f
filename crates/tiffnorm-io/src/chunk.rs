//! Chunk I/O collaborator traits.
//!
//! The transfer routines never touch a file themselves. They talk to a
//! [`ChunkReader`] or [`ChunkWriter`], which own the container structure
//! and any entropy coding of individual chunks.
//! [`TiffReader`](crate::TiffReader) and
//! [`DirectoryWriter`](crate::DirectoryWriter) implement them over the
//! `tiff` crate; other sources can be served without changing the
//! transfer code.
//!
//! # Chunk Indices
//!
//! Chunks are numbered in container order: strips top to bottom, tiles in
//! row-major grid order, and for separate planes all chunks of plane 0,
//! then plane 1, and so on.

use crate::{Chunking, ColorInfo, SourceLayout, TiffResult};

/// Source of raw chunk bytes for one directory.
pub trait ChunkReader {
    /// Pixel storage parameters.
    fn source_layout(&self) -> &SourceLayout;

    /// Colour conversion parameters.
    fn color_info(&self) -> ColorInfo;

    /// Strip or tile geometry.
    fn chunking(&self) -> &Chunking;

    /// Reads decoded bytes of chunk `index` into `buf`.
    ///
    /// Returns the number of bytes produced, which may be less than
    /// `buf.len()` for a trailing chunk. A failure aborts the transfer.
    fn read_chunk(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize>;

    /// Asks the codec to deliver interleaved RGB instead of YCbCr.
    ///
    /// Returns `true` when subsequent chunks will be RGB. The default
    /// implementation has no such codec mode.
    fn request_rgb_output(&mut self) -> bool {
        false
    }
}

/// Everything a writer needs before the first chunk arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryLayout {
    /// Pixel storage parameters to record.
    pub source: SourceLayout,
    /// Strip or tile geometry.
    pub chunking: Chunking,
    /// ExtraSamples values (1 = associated alpha).
    pub extra_samples: Vec<u16>,
    /// Software tag.
    pub software: Option<String>,
    /// Quality for JPEG-compressed output.
    pub jpeg_quality: Option<u8>,
}

/// Sink of raw chunk bytes for one directory.
pub trait ChunkWriter {
    /// Records the directory layout.
    ///
    /// Fails when the writer cannot produce this layout, before any chunk
    /// is written.
    fn begin_directory(&mut self, layout: &DirectoryLayout) -> TiffResult<()>;

    /// Writes chunk `index`, returning the number of bytes accepted.
    fn write_chunk(&mut self, index: u32, data: &[u8]) -> TiffResult<usize>;

    /// Completes the directory.
    fn finish_directory(&mut self) -> TiffResult<()>;
}

impl<R: ChunkReader + ?Sized> ChunkReader for &mut R {
    fn source_layout(&self) -> &SourceLayout {
        (**self).source_layout()
    }

    fn color_info(&self) -> ColorInfo {
        (**self).color_info()
    }

    fn chunking(&self) -> &Chunking {
        (**self).chunking()
    }

    fn read_chunk(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
        (**self).read_chunk(index, buf)
    }

    fn request_rgb_output(&mut self) -> bool {
        (**self).request_rgb_output()
    }
}

impl<W: ChunkWriter + ?Sized> ChunkWriter for &mut W {
    fn begin_directory(&mut self, layout: &DirectoryLayout) -> TiffResult<()> {
        (**self).begin_directory(layout)
    }

    fn write_chunk(&mut self, index: u32, data: &[u8]) -> TiffResult<usize> {
        (**self).write_chunk(index, data)
    }

    fn finish_directory(&mut self) -> TiffResult<()> {
        (**self).finish_directory()
    }
}
