//! Tiled watermark compositing.
//!
//! The watermark is repeated across the whole base image using the grid from
//! [`tile_grid`], drawn through a [`DrawingSurface`] with high-quality
//! smoothing, and the result is re-encoded.
//!
//! # Example
//!
//! ```ignore
//! use viewmark::raster::{load_image, OutputFormat};
//! use viewmark::watermark::apply_watermark;
//!
//! let base = load_image("photo.jpg")?;
//! let mark = load_image("mark.png")?;
//! let png = apply_watermark(base, &mark, OutputFormat::Png)?;
//! ```

use image::RgbaImage;
use std::path::Path;

use super::tiling::{tile_grid, TileGrid};
use crate::error::Result;
use crate::raster::{
    encode_image_with_quality, load_image, DrawingSurface, EncoderFactory, OutputFormat,
    RasterSurface, SmoothingMode, SurfaceError, DEFAULT_JPEG_QUALITY,
};

/// Tile `watermark` across `base` and encode the result as `format`.
///
/// `base` is consumed and dropped once encoded; `watermark` is only borrowed.
pub fn apply_watermark(
    base: RgbaImage,
    watermark: &RgbaImage,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    apply_watermark_with_quality(base, watermark, format, DEFAULT_JPEG_QUALITY)
}

/// Like [`apply_watermark`], with an explicit JPEG quality (ignored by
/// lossless formats).
pub fn apply_watermark_with_quality(
    mut base: RgbaImage,
    watermark: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>> {
    // Reject the format before touching any pixels.
    EncoderFactory::create_with_quality(format, quality)?;

    {
        let mut surface = RasterSurface::new(&mut base);
        apply_watermark_to_surface(&mut surface, watermark)?;
    }

    encode_image_with_quality(base, format, quality)
}

/// Tile `watermark` over an arbitrary drawing surface and flush it.
///
/// Returns the grid that was drawn.
pub fn apply_watermark_to_surface(
    surface: &mut dyn DrawingSurface,
    watermark: &RgbaImage,
) -> std::result::Result<TileGrid, SurfaceError> {
    let grid = tile_grid(
        surface.width(),
        surface.height(),
        watermark.width(),
        watermark.height(),
    );

    tracing::debug!(
        base_width = surface.width(),
        base_height = surface.height(),
        watermark_width = watermark.width(),
        watermark_height = watermark.height(),
        repeat_x = grid.repeat_x,
        repeat_y = grid.repeat_y,
        "Tiling watermark"
    );

    surface.set_smoothing_mode(SmoothingMode::HighQuality);
    for at in grid.positions() {
        surface.draw_image(watermark, at)?;
    }
    surface.flush()?;

    Ok(grid)
}

/// Tile the watermark stored at `watermark_path` across `base`.
pub fn apply_watermark_from_path(
    base: RgbaImage,
    watermark_path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let watermark = load_image(watermark_path)?;
    apply_watermark(base, &watermark, format)
}

/// Load both images from disk and tile the watermark across the base.
pub fn apply_watermark_files(
    image_path: impl AsRef<Path>,
    watermark_path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let base = load_image(image_path)?;
    apply_watermark_from_path(base, watermark_path, format)
}
