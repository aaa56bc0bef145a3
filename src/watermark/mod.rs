//! Tiled image watermarks.
//!
//! Given a base raster and a watermark raster, the watermark is repeated in
//! a grid that fully covers the base (with a margin of two extra copies per
//! axis) and the composite is re-encoded:
//!
//! ```text
//! repeat_x = 2 + base.width / watermark.width     (1 if watermark.width == 0)
//! repeat_y = 2 + base.height / watermark.height   (1 if watermark.height == 0)
//! anchor(x, y) = (base.width - x * watermark.width, base.height - y * watermark.height)
//! ```

pub mod compositor;
pub mod tiling;

pub use compositor::{
    apply_watermark, apply_watermark_files, apply_watermark_from_path,
    apply_watermark_to_surface, apply_watermark_with_quality,
};
pub use tiling::{tile_grid, TileGrid};
