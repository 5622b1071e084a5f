//! Strip transfer.
//!
//! # Read
//!
//! Contiguous data: each strip covers `rows_in_strip(i)` full image rows.
//! Separate planes: the strips of plane `p` fill channel `p`.
//!
//! # Write
//!
//! A packed view hands its rows to the writer directly; a strided view is
//! staged into a packed buffer sized to the strip.

use tiffnorm_core::{Diagnostics, DynImageView, DynImageViewMut};
use tracing::{debug, trace};

use super::{ChunkDecoder, Region, copy_interleaved, copy_plane, fail, read_raw};
use crate::{ChunkReader, ChunkWriter, StripLayout, TiffError, TiffResult};

/// Reads all strips of a directory into `dst`.
///
/// `dst` must already have the normalized layout of the source.
pub fn read_strips<R: ChunkReader + ?Sized>(
    reader: &mut R,
    decoder: &ChunkDecoder,
    strips: &StripLayout,
    dst: &mut DynImageViewMut<'_>,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    let src = *decoder.source();
    debug!(
        width = src.width,
        height = src.height,
        strips = strips.count,
        rows_per_strip = strips.rows_per_strip,
        planar = src.is_planar(),
        "Reading strips"
    );

    let width = src.width;
    let capacity = strips
        .size_bytes
        .max(decoder.raw_len(width, strips.rows_per_strip));
    let mut raw = vec![0u8; capacity];
    let src_row_bytes = decoder.decoded_row_bytes(width);
    let channels = dst.layout().channels;

    for index in 0..strips.count {
        let rows = strips.rows_in_strip(index);
        let expected = decoder.raw_len(width, rows);
        read_raw(reader, index, &mut raw, expected, strips.is_last_in_plane(index), log)?;
        let decoded = decoder
            .decode(&mut raw, width, rows)
            .map_err(|e| fail(index, e, log))?;

        let region = Region {
            x: 0,
            y: strips.first_row(index),
            width,
            height: rows,
        };
        if src.is_planar() {
            let plane = strips.plane_of(index);
            if plane < channels {
                copy_plane(dst, &decoded, src_row_bytes, region, plane);
            }
        } else {
            copy_interleaved(dst, &decoded, src_row_bytes, region);
        }
    }
    Ok(())
}

/// Writes `view` as contiguous strips.
///
/// Strip `i` holds rows `first_row(i)..first_row(i) + rows_in_strip(i)`.
pub fn write_strips<W: ChunkWriter + ?Sized>(
    writer: &mut W,
    view: &DynImageView<'_>,
    strips: &StripLayout,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    debug!(
        width = view.width(),
        height = view.height(),
        strips = strips.count,
        rows_per_strip = strips.rows_per_strip,
        packed = view.is_packed(),
        "Writing strips"
    );

    let mut staging = Vec::new();
    for index in 0..strips.count {
        let y = strips.first_row(index);
        let rows = strips.rows_in_strip(index);
        let data = match view.packed_rows(y, rows) {
            Some(data) => data,
            None => {
                staging.clear();
                for r in y..y + rows {
                    staging.extend_from_slice(view.row(r));
                }
                &staging[..]
            }
        };

        let written = writer
            .write_chunk(index, data)
            .map_err(|e| fail(index, e, log))?;
        if written != data.len() {
            let short = TiffError::ChunkIo {
                index,
                reason: format!("wrote {written} of {} bytes", data.len()),
            };
            return Err(fail(index, short, log));
        }
        trace!(index, rows, bytes = written, "write_chunk");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Chunking, ColorInfo, DirectoryLayout, SourceLayout};
    use tiffnorm_core::{
        DynImage, ImageSemantics, ImageTarget, MessageLog, PixelFormat, SampleFormat,
        UntypedLayout,
    };

    /// Serves strips cut from a packed byte image.
    struct Strips {
        src: SourceLayout,
        chunking: Chunking,
        chunks: Vec<Vec<u8>>,
    }

    impl ChunkReader for Strips {
        fn source_layout(&self) -> &SourceLayout {
            &self.src
        }

        fn color_info(&self) -> ColorInfo {
            ColorInfo::default()
        }

        fn chunking(&self) -> &Chunking {
            &self.chunking
        }

        fn read_chunk(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
            let chunk = &self.chunks[index as usize];
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[derive(Default)]
    struct Collect {
        chunks: Vec<(u32, Vec<u8>)>,
    }

    impl ChunkWriter for Collect {
        fn begin_directory(&mut self, _: &DirectoryLayout) -> TiffResult<()> {
            Ok(())
        }

        fn write_chunk(&mut self, index: u32, data: &[u8]) -> TiffResult<usize> {
            self.chunks.push((index, data.to_vec()));
            Ok(data.len())
        }

        fn finish_directory(&mut self) -> TiffResult<()> {
            Ok(())
        }
    }

    fn gray(width: u32, height: u32) -> SourceLayout {
        SourceLayout {
            width,
            height,
            bits_per_sample: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_read_gray_strips() {
        let src = gray(3, 5);
        let strips = StripLayout::new(5, 2, 6, 1);
        let mut reader = Strips {
            src,
            chunking: Chunking::Strips(strips),
            chunks: vec![(0..6).collect(), (6..12).collect(), (12..15).collect()],
        };
        let decoder = ChunkDecoder::new(&src, &ColorInfo::default()).unwrap();
        let mut img = DynImage::default();
        img.prepare(&UntypedLayout::new(3, 5, 1, 1), ImageSemantics::default());
        let mut log = MessageLog::new();
        read_strips(&mut reader, &decoder, &strips, &mut img.view_mut(), &mut log).unwrap();
        assert_eq!(img.data(), &(0..15).collect::<Vec<u8>>()[..]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_short_middle_strip_warns() {
        let src = gray(2, 4);
        let strips = StripLayout::new(4, 2, 4, 1);
        let mut reader = Strips {
            src,
            chunking: Chunking::Strips(strips),
            chunks: vec![vec![1, 2, 3], vec![5, 6, 7, 8]],
        };
        let decoder = ChunkDecoder::new(&src, &ColorInfo::default()).unwrap();
        let mut img = DynImage::default();
        img.prepare(&UntypedLayout::new(2, 4, 1, 1), ImageSemantics::default());
        let mut log = MessageLog::new();
        read_strips(&mut reader, &decoder, &strips, &mut img.view_mut(), &mut log).unwrap();
        assert_eq!(img.data(), &[1, 2, 3, 0, 5, 6, 7, 8]);
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_write_strided_view_is_staged() {
        let semantics = ImageSemantics::new(PixelFormat::Y, SampleFormat::UnsignedInteger);
        // 2x3 image with 4-byte stride
        let storage = [1, 2, 0xee, 0xee, 3, 4, 0xee, 0xee, 5, 6];
        let view = DynImageView::with_stride(&storage, UntypedLayout::new(2, 3, 1, 1), 4, semantics).unwrap();
        let strips = StripLayout::new(3, 2, 4, 1);
        let mut writer = Collect::default();
        let mut log = MessageLog::new();
        write_strips(&mut writer, &view, &strips, &mut log).unwrap();
        assert_eq!(writer.chunks, vec![(0, vec![1, 2, 3, 4]), (1, vec![5, 6])]);
    }
}
