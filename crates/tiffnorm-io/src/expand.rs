//! Sub-byte sample expansion and inversion.
//!
//! Packed 1- and 4-bit samples are widened to one byte each, most
//! significant bits first. Every stored row starts on a byte boundary, so
//! trailing pad bits of a row are skipped.
//!
//! | Depth | Mapping |
//! |-------|---------|
//! | 1 | 0 -> 0, 1 -> 255 |
//! | 4 | n -> n * 17 |
//!
//! Missing source bytes (a short chunk) expand as zero.

/// Expands 1-bit samples to 8-bit.
///
/// `samples_per_row` is the number of samples in one stored row; the output
/// holds `samples_per_row * rows` bytes.
pub fn expand_1bit(src: &[u8], samples_per_row: usize, rows: usize) -> Vec<u8> {
    let row_stride = samples_per_row.div_ceil(8);
    let mut out = Vec::with_capacity(samples_per_row * rows);
    for r in 0..rows {
        let row = r * row_stride;
        out.extend((0..samples_per_row).map(|i| {
            let byte = src.get(row + i / 8).copied().unwrap_or(0);
            if byte & (0x80 >> (i % 8)) != 0 { 255 } else { 0 }
        }));
    }
    out
}

/// Expands 4-bit samples to 8-bit, high nibble first.
pub fn expand_4bit(src: &[u8], samples_per_row: usize, rows: usize) -> Vec<u8> {
    let row_stride = samples_per_row.div_ceil(2);
    let mut out = Vec::with_capacity(samples_per_row * rows);
    for r in 0..rows {
        let row = r * row_stride;
        out.extend((0..samples_per_row).map(|i| {
            let byte = src.get(row + i / 2).copied().unwrap_or(0);
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            nibble * 17
        }));
    }
    out
}

/// Replaces every byte `b` with `255 - b`.
///
/// Also exact for 16-bit samples in either byte order.
#[inline]
pub fn invert(data: &mut [u8]) {
    data.iter_mut().for_each(|b| *b = !*b);
}
