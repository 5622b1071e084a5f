//! Whole-chunk conversion to interleaved RGB.
//!
//! A chunk (strip or tile) arrives as raw container bytes. These routines
//! turn it into `width * height * 3` interleaved RGB bytes of the same
//! pixel extent.
//!
//! # YCbCr Data Units
//!
//! Subsampled YCbCr is stored as data units of `h * v` luma samples followed
//! by one Cb and one Cr sample:
//!
//! ```text
//! h = 2, v = 2:  [Y00 Y01 Y10 Y11 Cb Cr] [Y02 Y03 Y12 Y13 Cb Cr] ...
//! ```
//!
//! Units at the right and bottom edges may cover pixels outside the chunk;
//! they are consumed but those pixels are not emitted.
//!
//! With the `parallel` feature, rows of data units (YCbCr) or rows of
//! pixels (Lab) are converted on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{ColorError, ColorResult, LabConverter, Subsampling, YCbCrConverter};

fn check_len(required: usize, actual: usize) -> ColorResult<()> {
    if actual < required {
        return Err(ColorError::ChunkTooSmall { required, actual });
    }
    Ok(())
}

/// Converts one row of data units into `v` output pixel rows.
fn convert_unit_row(
    conv: &YCbCrConverter,
    sub: Subsampling,
    units: &[u8],
    out: &mut [u8],
    width: usize,
) {
    let (sh, sv) = (sub.horizontal as usize, sub.vertical as usize);
    let luma_len = sh * sv;
    let out_rows = out.len() / (width * 3);

    for (ux, unit) in units.chunks_exact(sub.unit_len()).enumerate() {
        let (cb, cr) = (unit[luma_len], unit[luma_len + 1]);
        for dy in 0..sv.min(out_rows) {
            for dx in 0..sh {
                let x = ux * sh + dx;
                if x >= width {
                    break;
                }
                let o = (dy * width + x) * 3;
                out[o..o + 3].copy_from_slice(&conv.convert(unit[dy * sh + dx], cb, cr));
            }
        }
    }
}

/// Converts a subsampled YCbCr chunk to interleaved RGB.
///
/// Pixel `(x, y)` takes luma from offset `(y % v) * h + (x % h)` of data
/// unit `(y / v) * units_across + x / h`, and chroma from the same unit.
pub fn ycbcr_chunk_to_rgb(
    conv: &YCbCrConverter,
    subsampling: Subsampling,
    src: &[u8],
    width: u32,
    height: u32,
) -> ColorResult<Vec<u8>> {
    if !subsampling.is_nonzero() {
        return Err(ColorError::InvalidSubsampling {
            horizontal: subsampling.horizontal,
            vertical: subsampling.vertical,
        });
    }
    check_len(subsampling.chunk_len(width, height), src.len())?;

    let w = width as usize;
    let mut out = vec![0u8; w * height as usize * 3];
    if out.is_empty() {
        return Ok(out);
    }

    let unit_row_len = subsampling.units_across(width) * subsampling.unit_len();
    let out_band_len = subsampling.vertical as usize * w * 3;

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(out_band_len)
        .zip(src.par_chunks(unit_row_len))
        .for_each(|(band, units)| convert_unit_row(conv, subsampling, units, band, w));

    #[cfg(not(feature = "parallel"))]
    for (band, units) in out.chunks_mut(out_band_len).zip(src.chunks(unit_row_len)) {
        convert_unit_row(conv, subsampling, units, band, w);
    }

    Ok(out)
}

/// Converts an interleaved 8-bit CIE Lab chunk to interleaved RGB.
///
/// The a* and b* bytes are read as signed values.
pub fn lab_chunk_to_rgb(
    conv: &LabConverter,
    src: &[u8],
    width: u32,
    height: u32,
) -> ColorResult<Vec<u8>> {
    let len = width as usize * height as usize * 3;
    check_len(len, src.len())?;
    let mut out = vec![0u8; len];
    let src = &src[..len];

    let convert = |(dst, lab): (&mut [u8], &[u8])| {
        dst.copy_from_slice(&conv.convert(lab[0], lab[1] as i8, lab[2] as i8));
    };

    #[cfg(feature = "parallel")]
    out.par_chunks_exact_mut(3)
        .zip(src.par_chunks_exact(3))
        .for_each(convert);

    #[cfg(not(feature = "parallel"))]
    out.chunks_exact_mut(3).zip(src.chunks_exact(3)).for_each(convert);

    Ok(out)
}
