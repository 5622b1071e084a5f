//! Strip and tile geometry.
//!
//! Pure arithmetic mapping image rows to strips and image rectangles to
//! tiles, trailing partial chunks included.
//!
//! # Strips
//!
//! ```text
//! H = 10, R = 4:   strip 0: rows 0..4
//!                  strip 1: rows 4..8
//!                  strip 2: rows 8..10  (partial)
//! ```
//!
//! # Tiles
//!
//! Tiles are visited in row-major grid order. A tile on the right or bottom
//! edge covers `min(Tw, W - tx) x min(Th, H - ty)` image pixels; the rest of
//! its buffer is padding.
//!
//! With separate planes, chunk indices of plane `p` are offset by
//! `p * chunks_per_plane`.

use tiffnorm_core::Diagnostics;

use crate::tags::Compression;

/// Tile dimensions must be multiples of this on write.
pub const TILE_ALIGNMENT: u32 = 16;
/// Tile dimension substituted for zero on write.
pub const DEFAULT_TILE_SIZE: u32 = 256;
/// Row multiple for block-aligned compression.
pub const BLOCK_ROWS: u32 = 8;

// === Strips ===

/// Strip chunking of one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    /// Total number of strips over all planes.
    pub count: u32,
    /// Byte capacity of a full strip.
    pub size_bytes: usize,
    /// Rows in every strip but the last of each plane.
    pub rows_per_strip: u32,
    height: u32,
    planes: u16,
}

impl StripLayout {
    /// Builds the layout for an image of `height` rows.
    ///
    /// A `rows_per_strip` of 0 or larger than the image means one strip per
    /// plane. An empty image has no strips.
    pub fn new(height: u32, rows_per_strip: u32, size_bytes: usize, planes: u16) -> Self {
        let rows_per_strip = if rows_per_strip == 0 || rows_per_strip > height {
            height
        } else {
            rows_per_strip
        };
        let per_plane = if height == 0 {
            0
        } else {
            height.div_ceil(rows_per_strip)
        };
        let planes = planes.max(1);
        Self {
            count: per_plane * planes as u32,
            size_bytes,
            rows_per_strip,
            height,
            planes,
        }
    }

    /// Image height covered by each plane.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of planes.
    #[inline]
    pub fn planes(&self) -> u16 {
        self.planes
    }

    /// Strips covering one plane.
    #[inline]
    pub fn strips_per_plane(&self) -> u32 {
        self.count / self.planes as u32
    }

    /// Plane holding strip `index`.
    #[inline]
    pub fn plane_of(&self, index: u32) -> u16 {
        match self.strips_per_plane() {
            0 => 0,
            n => (index / n) as u16,
        }
    }

    /// First image row of strip `index`.
    pub fn first_row(&self, index: u32) -> u32 {
        match self.strips_per_plane() {
            0 => 0,
            n => (index % n) * self.rows_per_strip,
        }
    }

    /// Image rows held by strip `index`.
    pub fn rows_in_strip(&self, index: u32) -> u32 {
        if index >= self.count {
            return 0;
        }
        let first = self.first_row(index);
        self.rows_per_strip.min(self.height - first)
    }

    /// Whether strip `index` is the last of its plane.
    #[inline]
    pub fn is_last_in_plane(&self, index: u32) -> bool {
        let n = self.strips_per_plane();
        n != 0 && index % n == n - 1
    }
}

/// Rows per strip used when writing.
///
/// `requested` is capped by `max_bytes / row_bytes` (at least one row). For
/// block-aligned compression the result is rounded down to a multiple of 8
/// rows, 8 at minimum. The result never exceeds the image height and is at
/// least 1.
pub fn rows_per_strip_for_write(
    height: u32,
    row_bytes: usize,
    requested: u32,
    max_bytes: usize,
    compression: Compression,
) -> u32 {
    let mut rows = requested.max(1);
    if row_bytes > 0 {
        let budget = (max_bytes / row_bytes).clamp(1, u32::MAX as usize) as u32;
        rows = rows.min(budget);
    }
    if compression.requires_block_alignment() {
        rows = (rows / BLOCK_ROWS * BLOCK_ROWS).max(BLOCK_ROWS);
    }
    rows.min(height.max(1))
}

// === Tiles ===

/// Tile chunking of one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayout {
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// Tile depth (1 for 2D images).
    pub depth: u32,
    /// Byte capacity of one tile.
    pub size_bytes: usize,
}

impl TileLayout {
    /// Tiles per grid row for an image `image_width` wide.
    #[inline]
    pub fn across(&self, image_width: u32) -> u32 {
        match self.width {
            0 => 0,
            tw => image_width.div_ceil(tw),
        }
    }

    /// Tiles per grid column for an image `image_height` high.
    #[inline]
    pub fn down(&self, image_height: u32) -> u32 {
        match self.height {
            0 => 0,
            th => image_height.div_ceil(th),
        }
    }

    /// Tiles covering one plane.
    #[inline]
    pub fn tiles_per_plane(&self, image_width: u32, image_height: u32) -> u32 {
        self.across(image_width) * self.down(image_height)
    }

    /// Chunk index of the tile containing pixel `(x, y)` in `plane`.
    pub fn index(&self, x: u32, y: u32, plane: u16, image_width: u32, image_height: u32) -> u32 {
        let across = self.across(image_width);
        plane as u32 * self.tiles_per_plane(image_width, image_height)
            + (y / self.height.max(1)) * across
            + x / self.width.max(1)
    }

    /// Tile origins covering an image, in chunk order.
    pub fn origins(&self, image_width: u32, image_height: u32) -> TileOrigins {
        tile_origins(image_width, image_height, self.width, self.height)
    }
}

/// Placement of one tile in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOrigin {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Covered image columns.
    pub width: u32,
    /// Covered image rows.
    pub height: u32,
    /// Row-major index within the plane.
    pub index: u32,
}

/// Iterator over the tiles covering an image.
#[derive(Debug, Clone)]
pub struct TileOrigins {
    image_width: u32,
    image_height: u32,
    tile_width: u32,
    tile_height: u32,
    x: u32,
    y: u32,
    index: u32,
}

impl Iterator for TileOrigins {
    type Item = TileOrigin;

    fn next(&mut self) -> Option<TileOrigin> {
        if self.tile_width == 0 || self.tile_height == 0 || self.image_width == 0 {
            return None;
        }
        if self.y >= self.image_height {
            return None;
        }
        let origin = TileOrigin {
            x: self.x,
            y: self.y,
            width: self.tile_width.min(self.image_width - self.x),
            height: self.tile_height.min(self.image_height - self.y),
            index: self.index,
        };
        self.index += 1;
        self.x = self.x.saturating_add(self.tile_width);
        if self.x >= self.image_width {
            self.x = 0;
            self.y = self.y.saturating_add(self.tile_height);
        }
        Some(origin)
    }
}

/// Tiles of `tile_width x tile_height` covering a `width x height` image.
pub fn tile_origins(width: u32, height: u32, tile_width: u32, tile_height: u32) -> TileOrigins {
    TileOrigins {
        image_width: width,
        image_height: height,
        tile_width,
        tile_height,
        x: 0,
        y: 0,
        index: 0,
    }
}

/// Rounds tile dimensions up to a multiple of 16 for writing.
///
/// Zero becomes 256. Logs a warning when either dimension changes.
pub fn adjust_tile_size(width: u32, height: u32, log: &mut dyn Diagnostics) -> (u32, u32) {
    let fix = |v: u32| match v {
        0 => DEFAULT_TILE_SIZE,
        v => v.div_ceil(TILE_ALIGNMENT).saturating_mul(TILE_ALIGNMENT),
    };
    let adjusted = (fix(width), fix(height));
    if adjusted != (width, height) {
        log.warning(format!(
            "Tile size {width}x{height} is not a multiple of {TILE_ALIGNMENT}; using {}x{}",
            adjusted.0, adjusted.1
        ));
    }
    adjusted
}

// === Chunking ===

/// How a directory is split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunking {
    /// Horizontal bands of rows.
    Strips(StripLayout),
    /// Rectangular tiles.
    Tiles(TileLayout),
}

impl Chunking {
    /// Byte capacity of one full chunk.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Strips(s) => s.size_bytes,
            Self::Tiles(t) => t.size_bytes,
        }
    }

    /// Whether the directory is tiled.
    #[inline]
    pub fn is_tiled(&self) -> bool {
        matches!(self, Self::Tiles(_))
    }
}
