//! Native device-context handles and their scoped guard.
//!
//! A handle is only valid while the surface that issued it is alive, and must
//! be released exactly once before that surface goes away. [`DeviceContext`]
//! encodes both rules: it mutably borrows the surface for as long as it lives
//! and releases the handle in `Drop`, so the release happens on every exit
//! path and always before the surface's own scope ends.

use image::RgbaImage;
use std::num::NonZeroUsize;

use super::blend::blend_image;
use super::color::Color;
use super::surface::{DrawingSurface, SurfaceError};
use crate::geometry::{Point, Rect};

/// Opaque native device-context handle. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hdc(NonZeroUsize);

impl Hdc {
    /// Wrap a raw handle value; `None` for a null handle.
    pub fn from_raw(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Hdc)
    }

    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

/// A device context acquired from a [`DrawingSurface`].
///
/// Drawing helpers on the guard go through the handle (not through the
/// surface's own drawing calls, which are blocked while the handle is out).
pub struct DeviceContext<'s> {
    surface: &'s mut dyn DrawingSurface,
    hdc: Hdc,
}

impl<'s> DeviceContext<'s> {
    /// Acquire a handle from `surface`, to be released when the guard drops.
    pub fn acquire(surface: &'s mut dyn DrawingSurface) -> Result<Self, SurfaceError> {
        let hdc = surface.get_hdc()?;
        tracing::trace!(hdc = hdc.as_raw(), "Acquired device context");
        Ok(Self { surface, hdc })
    }

    pub fn handle(&self) -> Hdc {
        self.hdc
    }

    /// Bounds of the underlying surface.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.surface.width(), self.surface.height())
    }

    /// Direct pixel access to the bitmap selected into this context.
    pub fn bits_mut(&mut self) -> Result<&mut RgbaImage, SurfaceError> {
        self.surface.bits_mut(self.hdc)
    }

    /// Fill `rect` with `color`, replacing the covered pixels. Clipped to the
    /// surface; an empty or inverted rectangle fills nothing.
    pub fn fill_rect(&mut self, rect: &Rect, color: Color) -> Result<(), SurfaceError> {
        let Some(area) = rect.intersect(&self.bounds()) else {
            return Ok(());
        };
        let pixel = color.to_rgba();
        let bits = self.bits_mut()?;
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                bits.put_pixel(x as u32, y as u32, pixel);
            }
        }
        Ok(())
    }

    /// Set a single pixel. Coordinates outside the surface are ignored.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), SurfaceError> {
        if !self.bounds().contains(x, y) {
            return Ok(());
        }
        self.bits_mut()?.put_pixel(x as u32, y as u32, color.to_rgba());
        Ok(())
    }

    /// Alpha-blend `image` onto the context with its top-left corner at `at`.
    pub fn alpha_blend(&mut self, image: &RgbaImage, at: Point) -> Result<(), SurfaceError> {
        blend_image(self.bits_mut()?, image, at);
        Ok(())
    }
}

impl Drop for DeviceContext<'_> {
    fn drop(&mut self) {
        self.surface.release_hdc(self.hdc);
        tracing::trace!(hdc = self.hdc.as_raw(), "Released device context");
    }
}

impl std::fmt::Debug for DeviceContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("hdc", &self.hdc)
            .field("bounds", &self.bounds())
            .finish()
    }
}
