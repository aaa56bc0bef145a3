//! Tile grid arithmetic for watermark placement.
//!
//! The grid always over-covers the base: two extra rows and columns beyond
//! what integer division says is needed. Anchors walk from the bottom-right
//! corner of the base towards (and past) the top-left, so the last copy in
//! each direction starts at or before the origin.

use crate::geometry::Point;

/// How many watermark copies to draw in each direction, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub repeat_x: u64,
    pub repeat_y: u64,
    base_width: u32,
    base_height: u32,
    tile_width: u32,
    tile_height: u32,
}

/// Compute the tile grid for a `base_width` x `base_height` image covered by
/// a `tile_width` x `tile_height` watermark.
///
/// A zero watermark dimension yields a single repetition along that axis.
/// Counts are 64-bit: a 1-pixel tile over a `u32::MAX`-wide base needs
/// `u32::MAX + 2` columns.
pub fn tile_grid(base_width: u32, base_height: u32, tile_width: u32, tile_height: u32) -> TileGrid {
    TileGrid {
        repeat_x: repeat_count(base_width, tile_width),
        repeat_y: repeat_count(base_height, tile_height),
        base_width,
        base_height,
        tile_width,
        tile_height,
    }
}

fn repeat_count(base: u32, tile: u32) -> u64 {
    if tile == 0 {
        1
    } else {
        2 + u64::from(base / tile)
    }
}

impl TileGrid {
    /// Total number of copies drawn.
    pub fn tile_count(&self) -> u128 {
        u128::from(self.repeat_x) * u128::from(self.repeat_y)
    }

    /// Top-left anchor of the copy at grid cell (`x`, `y`).
    ///
    /// For cells inside the grid `x * tile_width` is at most
    /// `base_width + 2 * tile_width`, so the anchor fits in an `i64`.
    pub fn anchor(&self, x: u64, y: u64) -> Point {
        Point::new(
            i64::from(self.base_width) - x as i64 * i64::from(self.tile_width),
            i64::from(self.base_height) - y as i64 * i64::from(self.tile_height),
        )
    }

    /// All anchors in drawing order: columns outer, rows inner.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.repeat_x).flat_map(move |x| (0..self.repeat_y).map(move |y| self.anchor(x, y)))
    }
}

impl std::fmt::Display for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} tiles of {}x{} over {}x{}",
            self.repeat_x,
            self.repeat_y,
            self.tile_width,
            self.tile_height,
            self.base_width,
            self.base_height
        )
    }
}
