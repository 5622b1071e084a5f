//! Shared chunk-trait mocks and image builders.

#![allow(dead_code)]

use tiffnorm_core::{DynImage, ImageSemantics, PixelFormat, SampleFormat, UntypedLayout};
use tiffnorm_io::{
    ChunkReader, ChunkWriter, Chunking, ColorInfo, DirectoryLayout, SourceLayout, TiffError,
    TiffResult,
};

/// Serves pre-built chunks.
pub struct MockReader {
    pub source: SourceLayout,
    pub color: ColorInfo,
    pub chunking: Chunking,
    pub chunks: Vec<Vec<u8>>,
    /// Chunk index whose read fails.
    pub fail_at: Option<u32>,
    /// Answer to `request_rgb_output`.
    pub rgb_output: bool,
    /// Indices read so far.
    pub reads: Vec<u32>,
}

impl MockReader {
    pub fn new(source: SourceLayout, chunking: Chunking, chunks: Vec<Vec<u8>>) -> Self {
        Self {
            color: ColorInfo::for_photometric(source.photometric),
            source,
            chunking,
            chunks,
            fail_at: None,
            rgb_output: false,
            reads: Vec::new(),
        }
    }
}

impl ChunkReader for MockReader {
    fn source_layout(&self) -> &SourceLayout {
        &self.source
    }

    fn color_info(&self) -> ColorInfo {
        self.color
    }

    fn chunking(&self) -> &Chunking {
        &self.chunking
    }

    fn read_chunk(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
        self.reads.push(index);
        if self.fail_at == Some(index) {
            return Err(TiffError::invalid("simulated read failure"));
        }
        let chunk = self
            .chunks
            .get(index as usize)
            .ok_or_else(|| TiffError::invalid("no such chunk"))?;
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }

    fn request_rgb_output(&mut self) -> bool {
        self.rgb_output
    }
}

/// Collects written chunks.
#[derive(Default)]
pub struct MockWriter {
    pub layout: Option<DirectoryLayout>,
    pub chunks: Vec<(u32, Vec<u8>)>,
    pub finished: bool,
    /// Chunk index whose write fails.
    pub fail_at: Option<u32>,
}

impl ChunkWriter for MockWriter {
    fn begin_directory(&mut self, layout: &DirectoryLayout) -> TiffResult<()> {
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn write_chunk(&mut self, index: u32, data: &[u8]) -> TiffResult<usize> {
        if self.fail_at == Some(index) {
            return Err(TiffError::invalid("simulated write failure"));
        }
        self.chunks.push((index, data.to_vec()));
        Ok(data.len())
    }

    fn finish_directory(&mut self) -> TiffResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Image whose byte `i` is `(i * 7 + seed) % 251`.
pub fn pattern(
    width: u32,
    height: u32,
    channels: u16,
    bytes_per_channel: u16,
    format: PixelFormat,
    seed: usize,
) -> DynImage {
    let layout = UntypedLayout::new(width, height, channels, bytes_per_channel);
    let data = (0..layout.byte_size())
        .map(|i| ((i * 7 + seed) % 251) as u8)
        .collect();
    let semantics = ImageSemantics::new(format, SampleFormat::UnsignedInteger);
    DynImage::from_data(layout, semantics, data).unwrap()
}
