//! Tile transfer.
//!
//! Every tile buffer holds a full `tile_width x tile_height` rectangle.
//! Edge tiles are clipped to the image when read and zero-padded when
//! written.

use tiffnorm_core::{Diagnostics, DynImageView, DynImageViewMut};
use tracing::{debug, trace};

use super::{ChunkDecoder, Region, copy_interleaved, copy_plane, fail, read_raw};
use crate::{ChunkReader, ChunkWriter, TileLayout, TiffError, TiffResult};

fn check_tile_dims(tiles: &TileLayout, log: &mut dyn Diagnostics) -> TiffResult<()> {
    if tiles.width == 0 || tiles.height == 0 {
        let err = TiffError::invalid(format!(
            "tile size {}x{} is empty",
            tiles.width, tiles.height
        ));
        log.error(err.to_string());
        return Err(err);
    }
    Ok(())
}

/// Reads all tiles of a directory into `dst`.
///
/// Tile dimensions are taken as the container reports them.
pub fn read_tiles<R: ChunkReader + ?Sized>(
    reader: &mut R,
    decoder: &ChunkDecoder,
    tiles: &TileLayout,
    dst: &mut DynImageViewMut<'_>,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    let src = *decoder.source();
    check_tile_dims(tiles, log)?;

    let (tw, th) = (tiles.width, tiles.height);
    let per_plane = tiles.tiles_per_plane(src.width, src.height);
    debug!(
        width = src.width,
        height = src.height,
        tile_width = tw,
        tile_height = th,
        tiles = per_plane * src.planes() as u32,
        planar = src.is_planar(),
        "Reading tiles"
    );

    let expected = decoder.raw_len(tw, th);
    let mut raw = vec![0u8; tiles.size_bytes.max(expected)];
    let src_row_bytes = decoder.decoded_row_bytes(tw);
    let channels = dst.layout().channels;

    for plane in 0..src.planes() {
        for origin in tiles.origins(src.width, src.height) {
            let index = plane as u32 * per_plane + origin.index;
            let is_last = origin.index + 1 == per_plane;
            read_raw(reader, index, &mut raw, expected, is_last, log)?;
            let decoded = decoder
                .decode(&mut raw, tw, th)
                .map_err(|e| fail(index, e, log))?;

            let region = Region {
                x: origin.x,
                y: origin.y,
                width: origin.width,
                height: origin.height,
            };
            if src.is_planar() {
                if plane < channels {
                    copy_plane(dst, &decoded, src_row_bytes, region, plane);
                }
            } else {
                copy_interleaved(dst, &decoded, src_row_bytes, region);
            }
        }
    }
    Ok(())
}

/// Writes `view` as contiguous tiles.
///
/// Tile dimensions should already be multiples of 16; see
/// [`adjust_tile_size`](crate::geometry::adjust_tile_size).
pub fn write_tiles<W: ChunkWriter + ?Sized>(
    writer: &mut W,
    view: &DynImageView<'_>,
    tiles: &TileLayout,
    log: &mut dyn Diagnostics,
) -> TiffResult<()> {
    check_tile_dims(tiles, log)?;
    let (tw, th) = (tiles.width as usize, tiles.height as usize);
    let pb = view.layout().pixel_bytes();
    let tile_row = tw * pb;
    debug!(
        width = view.width(),
        height = view.height(),
        tile_width = tw,
        tile_height = th,
        tiles = tiles.tiles_per_plane(view.width(), view.height()),
        "Writing tiles"
    );

    let mut staging = vec![0u8; tile_row * th];
    for origin in tiles.origins(view.width(), view.height()) {
        if origin.width as usize != tw || origin.height as usize != th {
            staging.fill(0);
        }
        let (start, len) = (origin.x as usize * pb, origin.width as usize * pb);
        for r in 0..origin.height {
            let row = view.row(origin.y + r);
            staging[r as usize * tile_row..][..len].copy_from_slice(&row[start..start + len]);
        }

        let index = origin.index;
        let written = writer
            .write_chunk(index, &staging)
            .map_err(|e| fail(index, e, log))?;
        if written != staging.len() {
            let short = TiffError::ChunkIo {
                index,
                reason: format!("wrote {written} of {} bytes", staging.len()),
            };
            return Err(fail(index, short, log));
        }
        trace!(index, x = origin.x, y = origin.y, "write_chunk");
    }
    Ok(())
}
