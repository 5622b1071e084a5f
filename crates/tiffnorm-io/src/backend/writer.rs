//! TIFF writer over the `tiff` encoder.
//!
//! [`TiffWriter`] owns the encoder and hands out one [`DirectoryWriter`]
//! per image directory. Chunks are compressed as they arrive and appended
//! with [`DirectoryEncoder::write_data`]; the tags, including chunk offsets
//! and byte counts, are written when the directory is finished.

use std::fmt;

use tiff::encoder::compression::{
    CompressionAlgorithm, Compressor, Deflate, Lzw, Packbits, Uncompressed,
};
use tiff::encoder::{DirectoryEncoder, Rational, TiffEncoder, TiffKindStandard};
use tiff::tags::Tag;
use tracing::debug;

use super::tag;
use crate::tags::{Compression, Photometric};
use crate::{ChunkWriter, Chunking, DirectoryLayout, Stream, TiffError, TiffResult};

/// Writes classic TIFF in native byte order.
///
/// # Example
///
/// ```rust
/// use tiffnorm_io::{MemoryStream, TiffWriter};
///
/// let mut file = MemoryStream::new();
/// TiffWriter::new(&mut file).unwrap();
/// assert_eq!(file.as_slice().len(), 8);
/// ```
pub struct TiffWriter<S: Stream> {
    encoder: TiffEncoder<S>,
}

impl<S: Stream> TiffWriter<S> {
    /// Writes the file header to `stream`.
    pub fn new(stream: S) -> TiffResult<Self> {
        Ok(Self {
            encoder: TiffEncoder::new(stream)?,
        })
    }

    /// Starts the next image directory.
    ///
    /// Directories are chained in the order their writers begin them.
    pub fn directory(&mut self) -> DirectoryWriter<'_, S> {
        DirectoryWriter {
            encoder: Some(&mut self.encoder),
            pending: None,
        }
    }
}

impl<S: Stream> fmt::Debug for TiffWriter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiffWriter").finish_non_exhaustive()
    }
}

/// Directory being written.
struct Pending<'a, S: Stream> {
    encoder: DirectoryEncoder<'a, S, TiffKindStandard>,
    layout: DirectoryLayout,
    compressor: Compressor,
    offsets: Vec<u32>,
    byte_counts: Vec<u32>,
    scratch: Vec<u8>,
}

/// [`ChunkWriter`] for a single directory of a [`TiffWriter`].
///
/// Supports uncompressed, LZW, Deflate and PackBits chunks. Any other
/// compression is refused by `begin_directory`.
pub struct DirectoryWriter<'a, S: Stream> {
    encoder: Option<&'a mut TiffEncoder<S>>,
    pending: Option<Pending<'a, S>>,
}

impl<S: Stream> fmt::Debug for DirectoryWriter<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryWriter")
            .field("begun", &self.encoder.is_none())
            .field("layout", &self.pending.as_ref().map(|p| &p.layout))
            .finish()
    }
}

/// Chunk compressor for `compression`, `None` when it cannot be encoded.
fn compressor(compression: Compression) -> Option<Compressor> {
    Some(match compression {
        Compression::None => Compressor::Uncompressed(Uncompressed),
        Compression::Lzw => Compressor::Lzw(Lzw),
        Compression::Deflate | Compression::AdobeDeflate => {
            Compressor::Deflate(Deflate::default())
        }
        Compression::PackBits => Compressor::Packbits(Packbits),
        _ => return None,
    })
}

fn to_u32(value: u64, what: &str) -> TiffResult<u32> {
    u32::try_from(value)
        .map_err(|_| TiffError::invalid(format!("{what} {value} exceeds classic TIFF limits")))
}

impl<S: Stream> Pending<'_, S> {
    fn write_tags(&mut self) -> TiffResult<()> {
        let src = &self.layout.source;
        let spp = src.samples_per_pixel as usize;
        let dir = &mut self.encoder;

        dir.write_tag(Tag::ImageWidth, src.width)?;
        dir.write_tag(Tag::ImageLength, src.height)?;
        dir.write_tag(Tag::BitsPerSample, &vec![src.bits_per_sample; spp][..])?;
        dir.write_tag(Tag::Compression, src.compression.to_u16())?;
        dir.write_tag(Tag::PhotometricInterpretation, src.photometric.to_u16())?;
        dir.write_tag(Tag::Orientation, src.orientation.to_u16())?;
        dir.write_tag(Tag::SamplesPerPixel, src.samples_per_pixel)?;
        dir.write_tag(Tag::XResolution, Rational { n: 72, d: 1 })?;
        dir.write_tag(Tag::YResolution, Rational { n: 72, d: 1 })?;
        dir.write_tag(Tag::PlanarConfiguration, src.planar_config.to_u16())?;
        dir.write_tag(Tag::ResolutionUnit, 2u16)?;
        dir.write_tag(Tag::SampleFormat, &vec![src.sample_format.to_u16(); spp][..])?;
        if src.depth > 1 {
            dir.write_tag(tag::image_depth(), src.depth)?;
        }

        match &self.layout.chunking {
            Chunking::Strips(strips) => {
                dir.write_tag(Tag::RowsPerStrip, strips.rows_per_strip)?;
                dir.write_tag(Tag::StripOffsets, &self.offsets[..])?;
                dir.write_tag(Tag::StripByteCounts, &self.byte_counts[..])?;
            }
            Chunking::Tiles(tiles) => {
                dir.write_tag(Tag::TileWidth, tiles.width)?;
                dir.write_tag(Tag::TileLength, tiles.height)?;
                if tiles.depth > 1 {
                    dir.write_tag(tag::tile_depth(), tiles.depth)?;
                }
                dir.write_tag(Tag::TileOffsets, &self.offsets[..])?;
                dir.write_tag(Tag::TileByteCounts, &self.byte_counts[..])?;
            }
        }
        if !self.layout.extra_samples.is_empty() {
            dir.write_tag(Tag::ExtraSamples, &self.layout.extra_samples[..])?;
        }
        if src.photometric == Photometric::YCbCr {
            dir.write_tag(tag::ycbcr_subsampling(), &[1u16, 1][..])?;
        }
        if let Some(software) = &self.layout.software {
            dir.write_tag(Tag::Software, software.as_str())?;
        }
        Ok(())
    }
}

impl<'a, S: Stream> ChunkWriter for DirectoryWriter<'a, S> {
    fn begin_directory(&mut self, layout: &DirectoryLayout) -> TiffResult<()> {
        let compressor = compressor(layout.source.compression)
            .ok_or(TiffError::UnsupportedCompression(layout.source.compression))?;
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| TiffError::invalid("directory already begun"))?;

        let src = &layout.source;
        let count = match &layout.chunking {
            Chunking::Strips(strips) => strips.count as usize,
            Chunking::Tiles(tiles) => {
                tiles.tiles_per_plane(src.width, src.height) as usize * src.planes() as usize
            }
        };
        debug!(
            width = src.width,
            height = src.height,
            chunks = count,
            compression = %src.compression,
            "Begin TIFF directory"
        );
        self.pending = Some(Pending {
            encoder: encoder.image_directory()?,
            layout: layout.clone(),
            compressor,
            offsets: vec![0; count],
            byte_counts: vec![0; count],
            scratch: Vec::new(),
        });
        Ok(())
    }

    fn write_chunk(&mut self, index: u32, data: &[u8]) -> TiffResult<usize> {
        let Some(p) = self.pending.as_mut() else {
            return Err(TiffError::invalid("no directory begun"));
        };
        let i = index as usize;
        if i >= p.offsets.len() {
            return Err(TiffError::ChunkIo {
                index,
                reason: format!("directory has {} chunks", p.offsets.len()),
            });
        }

        p.scratch.clear();
        p.compressor.write_to(&mut p.scratch, data)?;
        let offset = p.encoder.write_data(p.scratch.as_slice())?;
        to_u32(offset + p.scratch.len() as u64, "file size")?;
        p.offsets[i] = to_u32(offset, "chunk offset")?;
        p.byte_counts[i] = p.scratch.len() as u32;
        Ok(data.len())
    }

    fn finish_directory(&mut self) -> TiffResult<()> {
        let mut p = self
            .pending
            .take()
            .ok_or_else(|| TiffError::invalid("no directory begun"))?;
        p.write_tags()?;
        let chunks = p.offsets.len();
        p.encoder.finish()?;
        debug!(chunks, "Finished TIFF directory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::PlanarConfig;
    use crate::{ChunkReader, MemoryStream, SourceLayout, StripLayout, TiffReader};
    use std::io::Cursor;
    use tiff::decoder::Decoder;

    fn layout(compression: Compression) -> DirectoryLayout {
        DirectoryLayout {
            source: SourceLayout {
                width: 2,
                height: 3,
                samples_per_pixel: 1,
                bits_per_sample: 8,
                planar_config: PlanarConfig::Contiguous,
                compression,
                ..Default::default()
            },
            chunking: Chunking::Strips(StripLayout::new(3, 2, 4, 1)),
            extra_samples: Vec::new(),
            software: Some("test".into()),
            jpeg_quality: None,
        }
    }

    fn write_one(compression: Compression) -> Vec<u8> {
        let mut file = MemoryStream::new();
        let mut writer = TiffWriter::new(&mut file).unwrap();
        let mut dir = writer.directory();
        dir.begin_directory(&layout(compression)).unwrap();
        assert_eq!(dir.write_chunk(0, &[1, 2, 3, 4]).unwrap(), 4);
        assert_eq!(dir.write_chunk(1, &[5, 6]).unwrap(), 2);
        dir.finish_directory().unwrap();
        drop(dir);
        drop(writer);
        file.into_inner()
    }

    #[test]
    fn test_write_then_parse() {
        let bytes = write_one(Compression::None);
        let marker: &[u8] = if cfg!(target_endian = "big") { b"MM" } else { b"II" };
        assert_eq!(&bytes[..2], marker);

        let mut reader = TiffReader::new(MemoryStream::from_vec(bytes)).unwrap();
        assert_eq!(reader.source_layout().width, 2);
        assert_eq!(reader.auxiliary_info().software.as_deref(), Some("test"));
        assert_eq!(reader.auxiliary_info().x_resolution, Some(72.0));
        let mut buf = [0u8; 4];
        assert_eq!(reader.read_chunk(1, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[5, 6]);
    }

    #[test]
    fn test_compressed_chunks() {
        for compression in [
            Compression::Lzw,
            Compression::Deflate,
            Compression::AdobeDeflate,
            Compression::PackBits,
        ] {
            let mut reader = TiffReader::new(MemoryStream::from_vec(write_one(compression))).unwrap();
            assert_eq!(reader.source_layout().compression, compression);
            let mut buf = [0u8; 4];
            assert_eq!(reader.read_chunk(0, &mut buf).unwrap(), 4);
            assert_eq!(buf, [1, 2, 3, 4], "{compression}");
            assert_eq!(reader.read_chunk(1, &mut buf).unwrap(), 2);
            assert_eq!(&buf[..2], &[5, 6], "{compression}");
        }
    }

    #[test]
    fn test_unencodable_compression_rejected_before_chunks() {
        let mut file = MemoryStream::new();
        let mut writer = TiffWriter::new(&mut file).unwrap();
        let mut dir = writer.directory();
        let err = dir.begin_directory(&layout(Compression::Jpeg)).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedCompression(Compression::Jpeg)));
        assert!(dir.write_chunk(0, &[0]).is_err());
        drop(dir);
        drop(writer);
        // Header only.
        assert_eq!(file.as_slice().len(), 8);
    }

    #[test]
    fn test_protocol_errors() {
        let mut file = MemoryStream::new();
        let mut writer = TiffWriter::new(&mut file).unwrap();
        let mut dir = writer.directory();
        assert!(dir.write_chunk(0, &[0]).is_err());
        assert!(dir.finish_directory().is_err());
        dir.begin_directory(&layout(Compression::None)).unwrap();
        assert!(matches!(
            dir.write_chunk(7, &[0]),
            Err(TiffError::ChunkIo { index: 7, .. })
        ));
        assert!(dir.begin_directory(&layout(Compression::None)).is_err());
    }

    #[test]
    fn test_directories_are_chained() {
        let mut file = MemoryStream::new();
        let mut writer = TiffWriter::new(&mut file).unwrap();
        for _ in 0..2 {
            let mut dir = writer.directory();
            dir.begin_directory(&layout(Compression::None)).unwrap();
            dir.write_chunk(0, &[0; 4]).unwrap();
            dir.write_chunk(1, &[0; 2]).unwrap();
            dir.finish_directory().unwrap();
        }
        drop(writer);

        let mut decoder = Decoder::new(Cursor::new(file.into_inner())).unwrap();
        assert!(decoder.more_images());
        decoder.next_image().unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (2, 3));
        assert!(!decoder.more_images());
    }
}
