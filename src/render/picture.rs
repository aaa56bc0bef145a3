//! A static picture object: an embedded raster that draws itself stretched
//! to whatever bounds it is given.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::ffi::c_void;
use std::ptr::NonNull;

use super::view_object::{
    ContinueFn, DrawError, EmbeddedObject, TargetDevice, ViewObject, DV_E_DVASPECT, DV_E_LINDEX,
    DVASPECT_CONTENT, DVASPECT_DOCPRINT, DVASPECT_THUMBNAIL, E_ABORT, LINDEX_WHOLE, OLE_E_BLANK,
    VIEW_E_DRAW,
};
use crate::geometry::{Point, Rect};
use crate::raster::{DeviceContext, Hdc};

/// Embedded picture object
pub struct StaticPicture {
    picture: RgbaImage,
    name: String,
}

impl StaticPicture {
    pub fn new(picture: RgbaImage) -> Self {
        Self {
            picture,
            name: "StaticPicture".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl EmbeddedObject for StaticPicture {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_view_object(&self) -> Option<&dyn ViewObject> {
        Some(self)
    }
}

impl ViewObject for StaticPicture {
    fn draw(
        &self,
        aspect: u32,
        index: i32,
        _aspect_info: Option<NonNull<c_void>>,
        _target_device: Option<&TargetDevice>,
        _target_dc: Option<Hdc>,
        dc: &mut DeviceContext<'_>,
        bounds: &Rect,
        _window_bounds: Option<&Rect>,
        continue_fn: Option<ContinueFn>,
        continue_arg: u32,
    ) -> Result<(), DrawError> {
        if !matches!(
            aspect,
            DVASPECT_CONTENT | DVASPECT_THUMBNAIL | DVASPECT_DOCPRINT
        ) {
            return Err(DrawError::new(
                DV_E_DVASPECT,
                format!("aspect {} is not supported", aspect),
            ));
        }
        if index != LINDEX_WHOLE {
            return Err(DrawError::new(
                DV_E_LINDEX,
                format!("part index {} is not supported", index),
            ));
        }
        if self.picture.width() == 0 || self.picture.height() == 0 {
            return Err(DrawError::new(OLE_E_BLANK, "picture is empty"));
        }
        if bounds.is_empty() {
            return Ok(());
        }
        if let Some(keep_going) = continue_fn {
            if !keep_going(continue_arg) {
                return Err(DrawError::new(E_ABORT, "draw aborted"));
            }
        }

        let width = u32::try_from(bounds.width())
            .map_err(|_| DrawError::new(VIEW_E_DRAW, "bounds too wide"))?;
        let height = u32::try_from(bounds.height())
            .map_err(|_| DrawError::new(VIEW_E_DRAW, "bounds too tall"))?;

        let scaled;
        let source = if self.picture.dimensions() == (width, height) {
            &self.picture
        } else {
            scaled = imageops::resize(&self.picture, width, height, FilterType::Triangle);
            &scaled
        };

        dc.alpha_blend(source, Point::new(bounds.left as i64, bounds.top as i64))
            .map_err(|e| DrawError::new(VIEW_E_DRAW, e.to_string()))
    }
}

impl std::fmt::Debug for StaticPicture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPicture")
            .field("name", &self.name)
            .field("dimensions", &self.picture.dimensions())
            .finish()
    }
}
