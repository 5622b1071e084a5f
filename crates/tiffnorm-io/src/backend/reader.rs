//! TIFF reader over the `tiff` decoder.
//!
//! The decoder parses the first directory and decompresses chunks. This
//! reader turns its tags into a [`SourceLayout`], [`ColorInfo`] and
//! [`Chunking`], and serves every chunk in stored sample order:
//!
//! - min-is-white samples arrive uninverted
//! - 16-bit samples arrive in native byte order
//! - JPEG-compressed YCbCr arrives at full chroma resolution
//!
//! Sample models the decoder does not expand (L*a*b*, sub-byte RGB and
//! subsampled YCbCr) are copied from the file as stored. That path only
//! serves uncompressed chunks.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use tiff::decoder::ifd::Value;
use tiff::decoder::{ChunkType, Decoder, DecodingBuffer};
use tiff::tags::Tag;
use tiffnorm_color::{Subsampling, YCbCrConverter, ycbcr_chunk_to_rgb};
use tracing::debug;

use super::tag;
use crate::tags::{Compression, Orientation, Photometric, PlanarConfig, TiffSampleFormat};
use crate::{
    AuxiliaryInfo, ChunkReader, Chunking, ColorInfo, SourceLayout, Stream, StripLayout,
    TileLayout, TiffError, TiffResult,
};

/// How chunk bytes are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Decompressed by the decoder.
    Decoded,
    /// Copied from the file as stored.
    Stored,
}

/// Reads the first directory of a TIFF or BigTIFF stream.
///
/// # Example
///
/// ```rust
/// use tiffnorm_io::{MemoryStream, TiffReader};
///
/// // Little-endian header with no directory.
/// let bytes = b"II*\0\0\0\0\0".to_vec();
/// assert!(TiffReader::new(MemoryStream::from_vec(bytes)).is_err());
/// ```
pub struct TiffReader<S: Stream> {
    decoder: Decoder<S>,
    layout: SourceLayout,
    color: ColorInfo,
    chunking: Chunking,
    auxiliary: AuxiliaryInfo,
    access: Access,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
    /// Set once JPEG YCbCr is delivered as RGB.
    jpeg_rgb: Option<YCbCrConverter>,
}

impl<S: Stream> TiffReader<S> {
    /// Parses the header and first directory of `stream`.
    pub fn new(stream: S) -> TiffResult<Self> {
        let mut decoder = Decoder::new(stream)?;
        let layout = source_layout(&mut decoder)?;
        let mut color = color_info(&mut decoder, &layout)?;
        if layout.is_ycbcr() && !color.subsampling.is_nonzero() {
            return Err(TiffError::invalid("zero YCbCr subsampling factor"));
        }
        if layout.is_ycbcr() && layout.compression == Compression::Jpeg {
            // The JPEG codec restores full chroma resolution.
            color.subsampling = Subsampling::NONE;
        }

        let chunk_bytes = |width: u32, rows: u32| chunk_capacity(&layout, &color, width, rows);
        let (chunking, offsets_tag, counts_tag, count) = match decoder.get_chunk_type() {
            ChunkType::Tile => {
                let (width, height) = decoder.chunk_dimensions();
                let tiles = TileLayout {
                    width,
                    height,
                    depth: first(&mut decoder, tag::tile_depth())?.unwrap_or(1) as u32,
                    size_bytes: chunk_bytes(width, height),
                };
                let count = tiles.tiles_per_plane(layout.width, layout.height) as usize
                    * layout.planes() as usize;
                (Chunking::Tiles(tiles), Tag::TileOffsets, Tag::TileByteCounts, count)
            }
            ChunkType::Strip => {
                let rps = first(&mut decoder, Tag::RowsPerStrip)?
                    .map_or(u32::MAX, |v| v.min(u32::MAX as u64) as u32);
                let rows = rps.clamp(1, layout.height.max(1));
                let strips = StripLayout::new(
                    layout.height,
                    rps,
                    chunk_bytes(layout.width, rows),
                    layout.planes(),
                );
                let count = strips.count as usize;
                (Chunking::Strips(strips), Tag::StripOffsets, Tag::StripByteCounts, count)
            }
        };

        let offsets = decoder
            .find_tag_unsigned_vec::<u64>(offsets_tag)?
            .unwrap_or_default();
        let byte_counts = decoder
            .find_tag_unsigned_vec::<u64>(counts_tag)?
            .unwrap_or_default();
        if offsets.len() < count || byte_counts.len() < count {
            return Err(TiffError::invalid(format!(
                "expected {count} chunks, found {} offsets and {} byte counts",
                offsets.len(),
                byte_counts.len()
            )));
        }

        let auxiliary = auxiliary_info(&mut decoder);
        let access = access(&layout, &color);
        debug!(
            width = layout.width,
            height = layout.height,
            chunks = count,
            tiled = chunking.is_tiled(),
            stored = access == Access::Stored,
            "Opened TIFF directory"
        );
        Ok(Self {
            decoder,
            layout,
            color,
            chunking,
            auxiliary,
            access,
            offsets,
            byte_counts,
            jpeg_rgb: None,
        })
    }

    /// Number of chunks in the directory.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.offsets.len()
    }

    /// Descriptive tags.
    pub fn auxiliary_info(&self) -> AuxiliaryInfo {
        self.auxiliary.clone()
    }

    /// Underlying decoder, for tags this reader does not interpret.
    pub fn decoder(&mut self) -> &mut Decoder<S> {
        &mut self.decoder
    }

    fn read_stored(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
        if self.layout.compression != Compression::None {
            return Err(TiffError::ChunkIo {
                index,
                reason: format!(
                    "{} compressed {} chunks cannot be decoded",
                    self.layout.compression, self.layout.photometric
                ),
            });
        }
        let i = index as usize;
        let count = usize::try_from(self.byte_counts[i]).unwrap_or(usize::MAX);
        let n = count.min(buf.len());
        let stream = self.decoder.inner();
        stream.seek(SeekFrom::Start(self.offsets[i]))?;
        stream.read_exact(&mut buf[..n])?;
        Ok(n)
    }

    fn read_decoded(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
        let (width, rows) = match &self.chunking {
            Chunking::Strips(strips) => (self.layout.width, strips.rows_in_strip(index)),
            Chunking::Tiles(tiles) => (tiles.width, tiles.height),
        };
        let len = self.layout.chunk_row_bytes(width) * rows as usize;
        if buf.len() < len {
            return Err(TiffError::ChunkIo {
                index,
                reason: format!("buffer of {} bytes cannot hold {len}", buf.len()),
            });
        }

        let out = &mut buf[..len];
        out.fill(0);
        self.decoder
            .read_chunk_to_buffer(DecodingBuffer::U8(&mut *out), index, width as usize)?;
        if self.layout.inverted() {
            // The decoder flips min-is-white samples.
            out.iter_mut().for_each(|b| *b = !*b);
        }
        if let Some(conv) = &self.jpeg_rgb {
            let rgb = ycbcr_chunk_to_rgb(conv, Subsampling::NONE, out, width, rows)?;
            out.copy_from_slice(&rgb);
        }
        Ok(len)
    }
}

impl<S: Stream> fmt::Debug for TiffReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiffReader")
            .field("layout", &self.layout)
            .field("chunking", &self.chunking)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl<S: Stream> ChunkReader for TiffReader<S> {
    fn source_layout(&self) -> &SourceLayout {
        &self.layout
    }

    fn color_info(&self) -> ColorInfo {
        self.color
    }

    fn chunking(&self) -> &Chunking {
        &self.chunking
    }

    fn read_chunk(&mut self, index: u32, buf: &mut [u8]) -> TiffResult<usize> {
        if index as usize >= self.offsets.len() {
            return Err(TiffError::ChunkIo {
                index,
                reason: "no such chunk".into(),
            });
        }
        match self.access {
            Access::Decoded => self.read_decoded(index, buf),
            Access::Stored => self.read_stored(index, buf),
        }
    }

    /// JPEG YCbCr is converted with the JFIF full-range matrix, as a JPEG
    /// codec does, regardless of the directory's colour tags.
    fn request_rgb_output(&mut self) -> bool {
        let jpeg_ycbcr = self.layout.is_ycbcr()
            && !self.layout.is_planar()
            && self.layout.compression == Compression::Jpeg;
        if jpeg_ycbcr && self.jpeg_rgb.is_none() {
            self.jpeg_rgb = YCbCrConverter::new(
                YCbCrConverter::DEFAULT_COEFFICIENTS,
                YCbCrConverter::DEFAULT_REFERENCE_BLACK_WHITE,
            )
            .ok();
        }
        self.jpeg_rgb.is_some()
    }
}

/// First value of an unsigned tag.
fn first<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> TiffResult<Option<u64>> {
    Ok(decoder
        .find_tag_unsigned_vec::<u64>(tag)?
        .and_then(|v| v.first().copied()))
}

/// Numeric tag values with rationals evaluated.
fn numbers(value: Value) -> Vec<f64> {
    let ratio = |n: f64, d: f64| if d == 0.0 { 0.0 } else { n / d };
    match value {
        Value::List(items) => items.into_iter().flat_map(numbers).collect(),
        Value::Rational(n, d) => vec![ratio(n as f64, d as f64)],
        Value::RationalBig(n, d) => vec![ratio(n as f64, d as f64)],
        Value::SRational(n, d) => vec![ratio(n as f64, d as f64)],
        Value::Float(v) => vec![v as f64],
        Value::Double(v) => vec![v],
        other => other.into_u64().map(|v| vec![v as f64]).unwrap_or_default(),
    }
}

fn floats<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> TiffResult<Vec<f32>> {
    Ok(decoder
        .find_tag(tag)?
        .map(|v| numbers(v).into_iter().map(|x| x as f32).collect())
        .unwrap_or_default())
}

/// Builds the source layout from directory tags.
fn source_layout<R: Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<SourceLayout> {
    let (width, height) = decoder.dimensions()?;
    let samples_per_pixel = first(decoder, Tag::SamplesPerPixel)?.unwrap_or(1) as u16;
    if samples_per_pixel == 0 {
        return Err(TiffError::invalid("SamplesPerPixel is 0"));
    }

    let mut short = |tag, default: u16| -> TiffResult<u16> {
        Ok(first(decoder, tag)?.map_or(default, |v| v as u16))
    };
    Ok(SourceLayout {
        width,
        height,
        depth: short(tag::image_depth(), 1)? as u32,
        samples_per_pixel,
        bits_per_sample: short(Tag::BitsPerSample, 1)?,
        planar_config: PlanarConfig::from_u16(short(Tag::PlanarConfiguration, 1)?),
        photometric: Photometric::from_u16(short(Tag::PhotometricInterpretation, 1)?),
        sample_format: TiffSampleFormat::from_u16(short(Tag::SampleFormat, 1)?),
        compression: Compression::from_u16(short(Tag::Compression, 1)?),
        orientation: Orientation::from_u16(short(Tag::Orientation, 1)?),
    })
}

/// Colour tags with defaults for missing entries.
fn color_info<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    layout: &SourceLayout,
) -> TiffResult<ColorInfo> {
    let mut color = ColorInfo::for_photometric(layout.photometric);
    if let Ok(c) = <[f32; 3]>::try_from(floats(decoder, tag::ycbcr_coefficients())?.as_slice()) {
        color.ycbcr_coefficients = c;
    }
    if let Ok(c) = <[f32; 6]>::try_from(floats(decoder, tag::reference_black_white())?.as_slice())
    {
        color.reference_black_white = c;
    }
    if let Ok(c) = <[f32; 2]>::try_from(floats(decoder, tag::white_point())?.as_slice()) {
        color.white_point = c;
    }
    if let Some([h, v]) = decoder
        .find_tag_unsigned_vec::<u16>(tag::ycbcr_subsampling())?
        .as_deref()
    {
        color.subsampling = Subsampling::new(*h, *v);
    }
    if let Some(p) = first(decoder, tag::ycbcr_positioning())? {
        color.ycbcr_positioning = p as u16;
    }
    Ok(color)
}

/// Descriptive tags. Malformed entries read as absent.
fn auxiliary_info<R: Read + Seek>(decoder: &mut Decoder<R>) -> AuxiliaryInfo {
    let mut short = |tag| first(decoder, tag).ok().flatten().map(|v| v as u16);
    let min_sample_value = short(Tag::MinSampleValue);
    let max_sample_value = short(Tag::MaxSampleValue);
    let resolution_unit = short(Tag::ResolutionUnit);

    let mut number = |tag| {
        decoder
            .find_tag(tag)
            .ok()
            .flatten()
            .and_then(|v| numbers(v).first().copied())
    };
    let x_resolution = number(Tag::XResolution);
    let y_resolution = number(Tag::YResolution);

    let mut text = |tag| {
        decoder
            .find_tag(tag)
            .ok()
            .flatten()
            .and_then(|v| v.into_string().ok())
    };
    AuxiliaryInfo {
        min_sample_value,
        max_sample_value,
        x_resolution,
        y_resolution,
        resolution_unit,
        software: text(Tag::Software),
        date_time: text(Tag::DateTime),
        description: text(Tag::ImageDescription),
        artist: text(Tag::Artist),
        host_computer: text(Tag::HostComputer),
        make: text(Tag::Make),
        model: text(Tag::Model),
    }
}

/// Whether the decoder can expand chunks of this layout.
fn access(layout: &SourceLayout, color: &ColorInfo) -> Access {
    let bits = layout.bits_per_sample;
    let decoded = match layout.photometric {
        Photometric::MinIsBlack | Photometric::MinIsWhite => matches!(bits, 1 | 2 | 4 | 8 | 16),
        Photometric::Rgb => matches!(bits, 8 | 16) && matches!(layout.samples_per_pixel, 3 | 4),
        Photometric::YCbCr => bits == 8 && color.subsampling == Subsampling::NONE,
        _ => false,
    };
    if decoded {
        Access::Decoded
    } else {
        Access::Stored
    }
}

/// Decoded byte capacity of a chunk of `rows` rows of `width` pixels.
fn chunk_capacity(layout: &SourceLayout, color: &ColorInfo, width: u32, rows: u32) -> usize {
    let subsampled = layout.is_ycbcr()
        && !layout.is_planar()
        && layout.bits_per_sample == 8
        && color.subsampling.is_nonzero();
    if subsampled {
        color.subsampling.chunk_len(width, rows)
    } else {
        layout.chunk_row_bytes(width) * rows as usize
    }
}
