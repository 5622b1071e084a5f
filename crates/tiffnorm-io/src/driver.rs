//! Directory-level read and write entry points.
//!
//! # Read
//!
//! ```text
//! ChunkReader -> SourceLayout -> check_suitability -> OutputLayout
//!             -> prepare_target -> read_strips | read_tiles
//! ```
//!
//! # Write
//!
//! ```text
//! DynImageView -> DirectoryLayout -> begin_directory
//!              -> write_strips | write_tiles -> finish_directory
//! ```
//!
//! Every failure is appended to the caller's log before it is returned.
//!
//! # Example
//!
//! ```rust
//! use tiffnorm_core::{DynImage, ImageSemantics, MessageLog, PixelFormat, SampleFormat, UntypedLayout};
//! use tiffnorm_io::{MemoryStream, WriteOptions, read_tiff, write_tiff};
//!
//! let semantics = ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger);
//! let src = DynImage::from_data(UntypedLayout::new(2, 2, 3, 1), semantics, (0..12).collect()).unwrap();
//!
//! let mut log = MessageLog::new();
//! let mut file = MemoryStream::new();
//! write_tiff(&mut file, &src.view(), &WriteOptions::default(), &mut log).unwrap();
//!
//! let mut dst = DynImage::default();
//! read_tiff(MemoryStream::from_vec(file.into_inner()), &mut dst, &mut log).unwrap();
//! assert_eq!(dst.data(), src.data());
//! ```

use std::path::Path;

use tiffnorm_core::{Diagnostics, DynImage, DynImageView, ImageTarget, MessageLog};
use tracing::debug;

use crate::gate::check_suitability;
use crate::geometry::{adjust_tile_size, rows_per_strip_for_write};
use crate::output::prepare_target;
use crate::tags::{Compression, Orientation, Photometric, PlanarConfig, TiffSampleFormat};
use crate::transfer::{ChunkDecoder, read_strips, read_tiles, write_strips, write_tiles};
use crate::{
    AuxiliaryInfo, ChunkLayout, ChunkReader, ChunkWriter, Chunking, DirectoryLayout, FileStream,
    OutputLayout, SourceLayout, Stream, StripLayout, TileLayout, TiffError, TiffReader,
    TiffResult, TiffWriter, WriteOptions,
};

/// ExtraSamples value for associated (premultiplied) alpha.
const ASSOCIATED_ALPHA: u16 = 1;

fn logged(log: &mut dyn Diagnostics, context: &str, err: TiffError) -> TiffError {
    log.error(format!("{context}: {err}"));
    err
}

// === Read ===

/// Reads the directory served by `reader` into `target`.
///
/// The target is prepared for the derived [`OutputLayout`] before any
/// chunk is read. On a suitability failure it is left untouched.
pub fn read_directory<R, T>(
    reader: &mut R,
    target: &mut T,
    log: &mut dyn Diagnostics,
) -> TiffResult<OutputLayout>
where
    R: ChunkReader + ?Sized,
    T: ImageTarget + ?Sized,
{
    let mut src = *reader.source_layout();
    let color = reader.color_info();
    let chunking = *reader.chunking();

    check_suitability(&src, log)?;

    if src.is_ycbcr()
        && !src.is_planar()
        && src.compression == Compression::Jpeg
        && reader.request_rgb_output()
    {
        debug!("JPEG codec converts YCbCr to RGB");
        src.photometric = Photometric::Rgb;
    }

    if src.is_ycbcr() {
        let ycbcr = color.ycbcr();
        match &chunking {
            Chunking::Strips(s) => {
                ycbcr.check_strip_size(src.width, src.height, s.rows_per_strip, log);
            }
            Chunking::Tiles(t) => {
                ycbcr.check_tile_size(src.width, src.height, t.width, t.height, log);
            }
        }
    }

    let decoder = ChunkDecoder::new(&src, &color).map_err(|e| logged(log, "TIFF reader", e))?;
    let out = OutputLayout::derive(&src);
    prepare_target(target, &out, log)?;

    debug!(
        source = %src,
        channels = out.channels,
        bytes_per_channel = out.bytes_per_channel,
        tiled = chunking.is_tiled(),
        "Reading TIFF directory"
    );
    let mut dst = target.view_mut();
    match &chunking {
        Chunking::Strips(strips) => read_strips(reader, &decoder, strips, &mut dst, log)?,
        Chunking::Tiles(tiles) => read_tiles(reader, &decoder, tiles, &mut dst, log)?,
    }
    Ok(out)
}

/// Parses the first directory of `stream` and reads it into `target`.
pub fn read_tiff<S, T>(stream: S, target: &mut T, log: &mut dyn Diagnostics) -> TiffResult<OutputLayout>
where
    S: Stream,
    T: ImageTarget + ?Sized,
{
    let mut reader = TiffReader::new(stream).map_err(|e| logged(log, "TIFF reader", e))?;
    read_directory(&mut reader, target, log)
}

/// Layout summary of a directory, without its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryInfo {
    /// Storage parameters.
    pub source: SourceLayout,
    /// Normalized layout a read would produce.
    pub output: OutputLayout,
    /// Strip or tile geometry.
    pub chunking: Chunking,
    /// Descriptive tags.
    pub auxiliary: AuxiliaryInfo,
}

/// Parses the first directory of `stream` without reading any chunk.
pub fn read_tiff_layout<S: Stream>(stream: S) -> TiffResult<DirectoryInfo> {
    let reader = TiffReader::new(stream)?;
    let source = *reader.source_layout();
    Ok(DirectoryInfo {
        source,
        output: OutputLayout::derive(&source),
        chunking: *reader.chunking(),
        auxiliary: reader.auxiliary_info(),
    })
}

/// Reads a TIFF file into a new image.
///
/// Diagnostics are mirrored to `tracing` and otherwise discarded.
pub fn read<P: AsRef<Path>>(path: P) -> TiffResult<DynImage> {
    let stream = FileStream::open(path.as_ref())?;
    let mut image = DynImage::default();
    let mut log = MessageLog::new();
    read_tiff(stream, &mut image, &mut log)?;
    Ok(image)
}

// === Write ===

/// Container layout recorded for `view`.
fn directory_layout(
    view: &DynImageView<'_>,
    options: &WriteOptions,
    log: &mut dyn Diagnostics,
) -> TiffResult<DirectoryLayout> {
    let layout = *view.layout();
    let semantics = view.semantics();
    let format = semantics.pixel_format;

    let photometric = Photometric::from_pixel_format(format)
        .filter(|_| format.channels() == Some(layout.channels))
        .ok_or_else(|| {
            TiffError::unsupported(format!(
                "cannot write {} pixels with {} channels",
                format, layout.channels
            ))
        })
        .map_err(|e| logged(log, "TIFF writer", e))?;
    if layout.width == 0 || layout.height == 0 {
        let err = TiffError::unsupported("cannot write an empty image");
        return Err(logged(log, "TIFF writer", err));
    }
    if !matches!(layout.bytes_per_channel, 1 | 2) {
        let err = TiffError::unsupported(format!(
            "cannot write {} bytes per channel",
            layout.bytes_per_channel
        ));
        return Err(logged(log, "TIFF writer", err));
    }

    let source = SourceLayout {
        width: layout.width,
        height: layout.height,
        depth: 1,
        samples_per_pixel: layout.channels,
        bits_per_sample: layout.bytes_per_channel * 8,
        planar_config: PlanarConfig::Contiguous,
        photometric,
        sample_format: TiffSampleFormat::from_sample_format(semantics.sample_format),
        compression: options.compression,
        orientation: Orientation::TopLeft,
    };

    let row_bytes = layout.row_bytes();
    let chunking = match options.layout {
        ChunkLayout::Strips => {
            let rows = rows_per_strip_for_write(
                layout.height,
                row_bytes,
                options.rows_per_strip,
                options.max_bytes_per_strip,
                options.compression,
            );
            Chunking::Strips(StripLayout::new(layout.height, rows, row_bytes * rows as usize, 1))
        }
        ChunkLayout::Tiles => {
            let (width, height) = adjust_tile_size(options.tile_width, options.tile_height, log);
            Chunking::Tiles(TileLayout {
                width,
                height,
                depth: 1,
                size_bytes: width as usize * height as usize * layout.pixel_bytes(),
            })
        }
    };

    let extra_samples = if format.has_alpha() {
        vec![ASSOCIATED_ALPHA]
    } else {
        Vec::new()
    };
    let jpeg_quality = options
        .compression
        .requires_block_alignment()
        .then_some(options.jpeg_quality);

    Ok(DirectoryLayout {
        source,
        chunking,
        extra_samples,
        software: options.software.clone(),
        jpeg_quality,
    })
}

/// Writes `view` as one directory through `writer`.
pub fn write_directory<W: ChunkWriter + ?Sized>(
    writer: &mut W,
    view: &DynImageView<'_>,
    options: &WriteOptions,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    let dir = directory_layout(view, options, log)?;
    debug!(
        source = %dir.source,
        tiled = dir.chunking.is_tiled(),
        "Writing TIFF directory"
    );

    writer
        .begin_directory(&dir)
        .map_err(|e| logged(log, "TIFF writer", e))?;
    match &dir.chunking {
        Chunking::Strips(strips) => write_strips(writer, view, strips, log)?,
        Chunking::Tiles(tiles) => write_tiles(writer, view, tiles, log)?,
    }
    writer
        .finish_directory()
        .map_err(|e| logged(log, "TIFF writer", e))
}

/// Writes `view` as a single-directory TIFF to `stream`.
pub fn write_tiff<S: Stream>(
    stream: S,
    view: &DynImageView<'_>,
    options: &WriteOptions,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    let mut writer = TiffWriter::new(stream).map_err(|e| logged(log, "TIFF writer", e))?;
    write_directory(&mut writer.directory(), view, options, log)
}

/// Writes `view` to a TIFF file.
pub fn write<P: AsRef<Path>>(path: P, view: &DynImageView<'_>, options: &WriteOptions) -> TiffResult<()> {
    let mut stream = FileStream::create(path.as_ref())?;
    let mut log = MessageLog::new();
    write_tiff(&mut stream, view, options, &mut log)?;
    stream.sync()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorInfo, MemoryStream};
    use tiffnorm_core::{DynImageViewMut, ImageSemantics, PixelFormat, SampleFormat, UntypedLayout};

    fn rgb8() -> ImageSemantics {
        ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger)
    }

    /// Reader that must never be asked for a chunk.
    struct NoChunks(SourceLayout, Chunking);

    impl ChunkReader for NoChunks {
        fn source_layout(&self) -> &SourceLayout {
            &self.0
        }

        fn color_info(&self) -> ColorInfo {
            ColorInfo::for_photometric(self.0.photometric)
        }

        fn chunking(&self) -> &Chunking {
            &self.1
        }

        fn read_chunk(&mut self, index: u32, _: &mut [u8]) -> TiffResult<usize> {
            Err(TiffError::ChunkIo {
                index,
                reason: "unexpected read".into(),
            })
        }
    }

    #[test]
    fn test_rejected_source_leaves_target_untouched() {
        let src = SourceLayout {
            width: 2,
            height: 2,
            bits_per_sample: 8,
            photometric: Photometric::Palette,
            ..Default::default()
        };
        let mut reader = NoChunks(src, Chunking::Strips(StripLayout::new(2, 2, 4, 1)));
        let mut storage = vec![0xAB; 12];
        let mut view = DynImageViewMut::new(&mut storage, UntypedLayout::new(2, 2, 3, 1), rgb8()).unwrap();
        let mut log = MessageLog::new();

        let err = read_directory(&mut reader, &mut view, &mut log).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedSource(_)));
        assert_eq!(log.errors().count(), 1);
        assert!(storage.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn test_write_layout_for_rgba16() {
        let data = vec![0u8; 3 * 2 * 8];
        let semantics = ImageSemantics::new(PixelFormat::Rgba, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&data, UntypedLayout::new(3, 2, 4, 2), semantics).unwrap();
        let options = WriteOptions {
            rows_per_strip: 1,
            ..Default::default()
        };
        let mut log = MessageLog::new();
        let dir = directory_layout(&view, &options, &mut log).unwrap();
        assert_eq!(dir.source.photometric, Photometric::Rgb);
        assert_eq!(dir.source.bits_per_sample, 16);
        assert_eq!(dir.extra_samples, vec![1]);
        assert_eq!(dir.jpeg_quality, None);
        let Chunking::Strips(strips) = dir.chunking else {
            panic!("expected strips");
        };
        assert_eq!((strips.count, strips.size_bytes), (2, 24));
    }

    #[test]
    fn test_write_rejects_unknown_format() {
        let data = vec![0u8; 8];
        let semantics = ImageSemantics::new(PixelFormat::Unknown, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&data, UntypedLayout::new(2, 2, 2, 1), semantics).unwrap();
        let mut log = MessageLog::new();
        let err = write_tiff(MemoryStream::new(), &view, &WriteOptions::default(), &mut log).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedSource(_)));
        assert!(log.has_errors());
    }

    #[test]
    fn test_tile_size_adjusted_on_write() {
        let data: Vec<u8> = (0..20 * 18).map(|i| i as u8).collect();
        let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&data, UntypedLayout::new(20, 18, 1, 1), semantics).unwrap();
        let options = WriteOptions {
            layout: ChunkLayout::Tiles,
            tile_width: 10,
            tile_height: 0,
            ..Default::default()
        };
        let mut log = MessageLog::new();
        let mut file = MemoryStream::new();
        write_tiff(&mut file, &view, &options, &mut log).unwrap();
        assert_eq!(log.warnings().count(), 1);

        let info = read_tiff_layout(MemoryStream::from_vec(file.into_inner())).unwrap();
        let Chunking::Tiles(tiles) = info.chunking else {
            panic!("expected tiles");
        };
        assert_eq!((tiles.width, tiles.height), (16, 256));
        assert_eq!(info.output.untyped(), UntypedLayout::new(20, 18, 1, 1));
    }

    #[test]
    fn test_jpeg_write_rejected() {
        let data = vec![0u8; 4];
        let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&data, UntypedLayout::new(2, 2, 1, 1), semantics).unwrap();
        let options = WriteOptions {
            compression: Compression::Jpeg,
            ..Default::default()
        };
        let mut log = MessageLog::new();
        let err = write_tiff(MemoryStream::new(), &view, &options, &mut log).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedCompression(Compression::Jpeg)));
        assert_eq!(log.errors().count(), 1);
    }

    #[test]
    fn test_lzw_write_read() {
        let data: Vec<u8> = (0..48).map(|i| (i / 4) as u8).collect();
        let semantics = ImageSemantics::new(PixelFormat::Rgb, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&data, UntypedLayout::new(4, 4, 3, 1), semantics).unwrap();
        let options = WriteOptions {
            compression: Compression::Lzw,
            rows_per_strip: 3,
            ..Default::default()
        };
        let mut log = MessageLog::new();
        let mut file = MemoryStream::new();
        write_tiff(&mut file, &view, &options, &mut log).unwrap();

        let bytes = file.into_inner();
        let info = read_tiff_layout(MemoryStream::from_vec(bytes.clone())).unwrap();
        assert_eq!(info.source.compression, Compression::Lzw);

        let mut dst = DynImage::default();
        read_tiff(MemoryStream::from_vec(bytes), &mut dst, &mut log).unwrap();
        assert_eq!(dst.data(), &data[..]);
        assert_eq!(log.errors().count(), 0);
    }

    #[test]
    fn test_empty_write_rejected() {
        let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
        let view = DynImageView::new(&[], UntypedLayout::new(0, 3, 1, 1), semantics).unwrap();
        let mut log = MessageLog::new();
        let mut file = MemoryStream::new();
        let err = write_tiff(&mut file, &view, &WriteOptions::default(), &mut log).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedSource(_)));
        assert_eq!(log.errors().count(), 1);
    }
}
