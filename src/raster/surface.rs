//! Drawing surfaces over rasters.
//!
//! A [`DrawingSurface`] is what the renderer and the compositor draw through.
//! It mirrors the shape of a retained-mode graphics object bound to a bitmap:
//! it can be cleared, have images drawn onto it, be flushed, and hand out a
//! native device-context handle for foreign drawing code.
//!
//! While a device context is outstanding the surface is busy: its own drawing
//! calls fail with [`SurfaceError::Busy`] until the handle is released.
//! [`DeviceContext`](super::DeviceContext) is the scoped way to hold a handle.

use image::RgbaImage;
use thiserror::Error;

use super::blend::blend_image;
use super::color::Color;
use super::device_context::Hdc;
use crate::geometry::Point;

/// Errors raised by a drawing surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A device context is outstanding and must be released first
    #[error("Surface is busy: device context {0:#x} has not been released")]
    Busy(usize),

    /// The handle was not issued by this surface, or was already released
    #[error("Device context {0:#x} is not valid for this surface")]
    InvalidHandle(usize),

    /// Drawing onto the surface failed
    #[error("Draw failed: {0}")]
    Draw(String),

    /// Pending operations could not be flushed
    #[error("Flush failed: {0}")]
    Flush(String),
}

/// Edge smoothing applied to drawing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingMode {
    #[default]
    Default,
    None,
    HighSpeed,
    AntiAlias,
    HighQuality,
}

/// A drawable surface bound to a destination raster
pub trait DrawingSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill the whole surface with `color`, erasing prior contents.
    fn clear(&mut self, color: Color) -> Result<(), SurfaceError>;

    fn smoothing_mode(&self) -> SmoothingMode;

    fn set_smoothing_mode(&mut self, mode: SmoothingMode);

    /// Composite `image` with its top-left corner at `at`, clipping to the
    /// surface.
    fn draw_image(&mut self, image: &RgbaImage, at: Point) -> Result<(), SurfaceError>;

    /// Complete all pending drawing operations.
    fn flush(&mut self) -> Result<(), SurfaceError>;

    /// Issue a native device-context handle. At most one may be outstanding.
    fn get_hdc(&mut self) -> Result<Hdc, SurfaceError>;

    /// Release a handle issued by [`DrawingSurface::get_hdc`].
    fn release_hdc(&mut self, hdc: Hdc);

    /// Pixel access through an outstanding handle.
    fn bits_mut(&mut self, hdc: Hdc) -> Result<&mut RgbaImage, SurfaceError>;
}

/// Drawing surface over an in-memory RGBA raster.
///
/// Drawing is immediate, so [`DrawingSurface::flush`] has nothing to wait for.
pub struct RasterSurface<'a> {
    image: &'a mut RgbaImage,
    smoothing: SmoothingMode,
    outstanding: Option<Hdc>,
    issued: usize,
}

impl<'a> RasterSurface<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        tracing::trace!(
            width = image.width(),
            height = image.height(),
            "Acquired raster surface"
        );
        Self {
            image,
            smoothing: SmoothingMode::Default,
            outstanding: None,
            issued: 0,
        }
    }

    /// Number of device contexts issued over the surface's lifetime.
    pub fn handles_issued(&self) -> usize {
        self.issued
    }

    pub fn has_outstanding_hdc(&self) -> bool {
        self.outstanding.is_some()
    }

    fn ensure_idle(&self) -> Result<(), SurfaceError> {
        match self.outstanding {
            Some(hdc) => Err(SurfaceError::Busy(hdc.as_raw())),
            None => Ok(()),
        }
    }
}

impl DrawingSurface for RasterSurface<'_> {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.ensure_idle()?;
        let pixel = color.to_rgba();
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
        Ok(())
    }

    fn smoothing_mode(&self) -> SmoothingMode {
        self.smoothing
    }

    fn set_smoothing_mode(&mut self, mode: SmoothingMode) {
        self.smoothing = mode;
    }

    fn draw_image(&mut self, image: &RgbaImage, at: Point) -> Result<(), SurfaceError> {
        self.ensure_idle()?;
        blend_image(&mut *self.image, image, at);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        self.ensure_idle()
    }

    fn get_hdc(&mut self) -> Result<Hdc, SurfaceError> {
        self.ensure_idle()?;
        self.issued += 1;
        let hdc = Hdc::from_raw(self.issued)
            .ok_or_else(|| SurfaceError::Draw("device context counter overflow".to_string()))?;
        self.outstanding = Some(hdc);
        Ok(hdc)
    }

    fn release_hdc(&mut self, hdc: Hdc) {
        if self.outstanding == Some(hdc) {
            self.outstanding = None;
        } else {
            tracing::warn!(
                hdc = hdc.as_raw(),
                "Ignoring release of a device context this surface does not own"
            );
        }
    }

    fn bits_mut(&mut self, hdc: Hdc) -> Result<&mut RgbaImage, SurfaceError> {
        if self.outstanding != Some(hdc) {
            return Err(SurfaceError::InvalidHandle(hdc.as_raw()));
        }
        Ok(&mut *self.image)
    }
}

impl Drop for RasterSurface<'_> {
    fn drop(&mut self) {
        if let Some(hdc) = self.outstanding.take() {
            tracing::warn!(
                hdc = hdc.as_raw(),
                "Raster surface dropped with an unreleased device context"
            );
        }
        tracing::trace!("Released raster surface");
    }
}
