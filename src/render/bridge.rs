//! Rendering embedded objects into rasters.

use image::RgbaImage;

use super::view_object::{EmbeddedObject, DVASPECT_CONTENT, LINDEX_WHOLE};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::raster::{
    encode_image, Color, DeviceContext, DrawingSurface, OutputFormat, RasterSurface,
};

/// Render `object` into `destination`, replacing its contents.
///
/// The destination is first cleared to `background`, so after a failed draw
/// it holds the background and nothing else.
pub fn render_into(
    object: &dyn EmbeddedObject,
    destination: &mut RgbaImage,
    background: Color,
) -> Result<()> {
    let mut surface = RasterSurface::new(destination);
    render_into_surface(object, &mut surface, background)
}

/// Render `object` through an arbitrary drawing surface.
///
/// Order of operations:
/// 1. clear the surface to `background`
/// 2. take the full-surface bounds
/// 3. acquire a device context
/// 4. ask the object for its view capability and draw the content aspect
/// 5. release the device context, whatever the outcome
pub fn render_into_surface(
    object: &dyn EmbeddedObject,
    surface: &mut dyn DrawingSurface,
    background: Color,
) -> Result<()> {
    let span = tracing::debug_span!(
        "render_into",
        object = object.name(),
        width = surface.width(),
        height = surface.height(),
        background = %background,
    );
    let _enter = span.enter();

    surface.clear(background)?;
    let bounds = Rect::from_size(surface.width(), surface.height());

    let mut dc = DeviceContext::acquire(surface)?;

    let view = object.as_view_object().ok_or_else(|| {
        tracing::warn!(object = object.name(), "Object has no view capability");
        Error::CapabilityMismatch {
            object: object.name().to_string(),
        }
    })?;

    view.draw(
        DVASPECT_CONTENT,
        LINDEX_WHOLE,
        None,
        None,
        None,
        &mut dc,
        &bounds,
        None,
        None,
        0,
    )
    .map_err(|e| {
        tracing::warn!(
            object = object.name(),
            hresult = format_args!("{:#010x}", e.code()),
            error = %e,
            "Object failed to draw"
        );
        Error::from(e)
    })?;

    drop(dc);
    tracing::debug!("Rendered object");
    Ok(())
}

/// Render `object` into a freshly allocated `width` x `height` raster.
pub fn render_to_image(
    object: &dyn EmbeddedObject,
    width: u32,
    height: u32,
    background: Color,
) -> Result<RgbaImage> {
    let mut image = RgbaImage::new(width, height);
    render_into(object, &mut image, background)?;
    Ok(image)
}

/// Render `object` and encode the result as `format`.
pub fn render_to_bytes(
    object: &dyn EmbeddedObject,
    width: u32,
    height: u32,
    background: Color,
    format: OutputFormat,
) -> Result<Vec<u8>> {
    // Reject the format before drawing anything.
    crate::raster::EncoderFactory::create(format)?;
    let image = render_to_image(object, width, height, background)?;
    encode_image(image, format)
}
