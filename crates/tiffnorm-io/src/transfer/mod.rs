//! Chunk-level pixel transfer between a container and a normalized buffer.
//!
//! Reading runs every chunk through the same pipeline:
//!
//! ```text
//! read_chunk -> YCbCr/Lab to RGB | 1/4-bit expansion -> inversion -> row copy
//! ```
//!
//! The row copy places the decoded chunk at its image origin one row at a
//! time, so destination strides larger than the packed row are honoured
//! and chunk padding beyond the image is discarded.
//!
//! Writing goes the other way: rows of the normalized buffer are gathered
//! into packed strips or zero-padded tiles and handed to a
//! [`ChunkWriter`](crate::ChunkWriter).
//!
//! - [`strips`] - Strip read/write
//! - [`tiles`] - Tile read/write

pub mod strips;
pub mod tiles;

use std::borrow::Cow;

use tiffnorm_color::{
    LabConverter, Subsampling, YCbCrConverter, lab_chunk_to_rgb, ycbcr_chunk_to_rgb,
};
use tiffnorm_core::{Diagnostics, DynImageViewMut};
use tracing::trace;

use crate::expand::{expand_1bit, expand_4bit, invert};
use crate::{ChunkReader, ColorInfo, SourceLayout, TiffError, TiffResult};

pub use strips::{read_strips, write_strips};
pub use tiles::{read_tiles, write_tiles};

/// Turns raw chunk bytes into normalized interleaved bytes.
///
/// Holds the colour converters for one directory. Converters are built
/// only for the colour model that needs them.
#[derive(Debug)]
pub struct ChunkDecoder {
    src: SourceLayout,
    ycbcr: Option<(YCbCrConverter, Subsampling)>,
    lab: Option<LabConverter>,
}

impl ChunkDecoder {
    /// Builds the decoder for `src`.
    ///
    /// Fails when the colour parameters cannot produce a converter.
    pub fn new(src: &SourceLayout, color: &ColorInfo) -> TiffResult<Self> {
        let ycbcr = if src.is_ycbcr() {
            let conv = YCbCrConverter::new(color.ycbcr_coefficients, color.reference_black_white)?;
            Some((conv, color.subsampling))
        } else {
            None
        };
        let lab = if src.is_lab() {
            Some(LabConverter::new(color.white_point)?)
        } else {
            None
        };
        Ok(Self {
            src: *src,
            ycbcr,
            lab,
        })
    }

    /// Source layout this decoder was built for.
    #[inline]
    pub fn source(&self) -> &SourceLayout {
        &self.src
    }

    /// Whether chunks go through a colour converter.
    #[inline]
    pub fn converts_color(&self) -> bool {
        self.ycbcr.is_some() || self.lab.is_some()
    }

    /// Raw bytes of a chunk holding `rows` rows of `width` pixels.
    pub fn raw_len(&self, width: u32, rows: u32) -> usize {
        match &self.ycbcr {
            Some((_, sub)) => sub.chunk_len(width, rows),
            None => self.src.chunk_row_bytes(width) * rows as usize,
        }
    }

    /// Samples per decoded pixel.
    #[inline]
    pub fn decoded_samples(&self) -> usize {
        if self.converts_color() {
            3
        } else {
            self.src.samples_per_chunk_pixel() as usize
        }
    }

    /// Bytes of one decoded row of `width` pixels.
    #[inline]
    pub fn decoded_row_bytes(&self, width: u32) -> usize {
        let bytes_per_sample = (self.src.bits_per_sample as usize / 8).max(1);
        width as usize * self.decoded_samples() * bytes_per_sample
    }

    /// Decodes a chunk of `width x rows` pixels held in `raw`.
    ///
    /// Plain 8- and 16-bit data is processed in place and borrowed back.
    pub fn decode<'b>(&self, raw: &'b mut [u8], width: u32, rows: u32) -> TiffResult<Cow<'b, [u8]>> {
        if let Some((conv, sub)) = &self.ycbcr {
            return Ok(Cow::Owned(ycbcr_chunk_to_rgb(conv, *sub, raw, width, rows)?));
        }
        if let Some(conv) = &self.lab {
            return Ok(Cow::Owned(lab_chunk_to_rgb(conv, raw, width, rows)?));
        }

        let samples_per_row = width as usize * self.src.samples_per_chunk_pixel() as usize;
        let expanded = match self.src.bits_per_sample {
            1 => Some(expand_1bit(raw, samples_per_row, rows as usize)),
            4 => Some(expand_4bit(raw, samples_per_row, rows as usize)),
            _ => None,
        };
        let inverted = self.src.inverted();
        match expanded {
            Some(mut data) => {
                if inverted {
                    invert(&mut data);
                }
                Ok(Cow::Owned(data))
            }
            None => {
                let len = self.raw_len(width, rows).min(raw.len());
                let data = &mut raw[..len];
                if inverted {
                    invert(data);
                }
                Ok(Cow::Borrowed(data))
            }
        }
    }
}

/// Reads chunk `index` into `buf`, zero-filling whatever it did not produce.
///
/// A byte count different from `expected` is a warning unless the chunk
/// is the last of its sequence. Failures are logged and named by index.
pub(crate) fn read_raw<R: ChunkReader + ?Sized>(
    reader: &mut R,
    index: u32,
    buf: &mut [u8],
    expected: usize,
    is_last: bool,
    log: &mut dyn Diagnostics,
) -> TiffResult<usize> {
    let n = match reader.read_chunk(index, buf) {
        Ok(n) => n.min(buf.len()),
        Err(e) => return Err(fail(index, e, log)),
    };
    buf[n..].fill(0);
    trace!(index, bytes = n, expected, "read_chunk");
    if n != expected && !is_last {
        log.warning(format!(
            "Chunk {index}: read {n} bytes, expected {expected}"
        ));
    }
    Ok(n)
}

/// Logs a chunk failure and returns it as [`TiffError::ChunkIo`].
pub(crate) fn fail(index: u32, err: TiffError, log: &mut dyn Diagnostics) -> TiffError {
    let err = TiffError::chunk(index, err);
    log.error(err.to_string());
    err
}

/// Image rectangle covered by a chunk after clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Clips to the destination extent.
    pub fn clip(self, width: u32, height: u32) -> Self {
        Self {
            width: self.width.min(width.saturating_sub(self.x)),
            height: self.height.min(height.saturating_sub(self.y)),
            ..self
        }
    }
}

/// Copies interleaved decoded rows into the destination at `region`.
///
/// `src_row_bytes` is the decoded chunk row length, which may exceed the
/// region width for padded tiles.
pub(crate) fn copy_interleaved(
    dst: &mut DynImageViewMut<'_>,
    decoded: &[u8],
    src_row_bytes: usize,
    region: Region,
) {
    let pb = dst.layout().pixel_bytes();
    let region = region.clip(dst.width(), dst.height());
    let (start, len) = (region.x as usize * pb, region.width as usize * pb);
    for r in 0..region.height {
        let src = &decoded[r as usize * src_row_bytes..][..len];
        dst.row_mut(region.y + r)[start..start + len].copy_from_slice(src);
    }
}

/// Scatters one decoded plane into `channel` of the destination.
pub(crate) fn copy_plane(
    dst: &mut DynImageViewMut<'_>,
    decoded: &[u8],
    src_row_bytes: usize,
    region: Region,
    channel: u16,
) {
    let layout = *dst.layout();
    let (pb, bpc) = (layout.pixel_bytes(), layout.bytes_per_channel as usize);
    let offset = channel as usize * bpc;
    let region = region.clip(dst.width(), dst.height());
    let (start, end) = (region.x as usize * pb, (region.x + region.width) as usize * pb);
    for r in 0..region.height {
        let src = &decoded[r as usize * src_row_bytes..];
        let row = &mut dst.row_mut(region.y + r)[start..end];
        for (px, sample) in row.chunks_exact_mut(pb).zip(src.chunks_exact(bpc)) {
            px[offset..offset + bpc].copy_from_slice(sample);
        }
    }
}
