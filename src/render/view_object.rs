//! The draw-yourself capability of embedded objects.
//!
//! Embedded objects are handed to the renderer as [`EmbeddedObject`]s and
//! queried for the [`ViewObject`] capability, the way a container asks an
//! OLE object for its view interface. An object that cannot draw itself
//! answers `None` and the renderer reports a capability mismatch.

use std::ffi::c_void;
use std::ptr::NonNull;
use thiserror::Error;

use crate::geometry::Rect;
use crate::raster::{DeviceContext, Hdc};

/// Draw the object's content as it would appear embedded in a document.
pub const DVASPECT_CONTENT: u32 = 1;
/// Draw a thumbnail-sized representation.
pub const DVASPECT_THUMBNAIL: u32 = 2;
/// Draw the object as an icon.
pub const DVASPECT_ICON: u32 = 4;
/// Draw the object as if printed.
pub const DVASPECT_DOCPRINT: u32 = 8;

/// Part index meaning "the whole object".
pub const LINDEX_WHOLE: i32 = -1;

/// Unspecified failure
pub const E_FAIL: u32 = 0x8000_4005;
/// The operation was aborted by the continuation callback
pub const E_ABORT: u32 = 0x8000_4004;
/// The object has nothing to draw
pub const OLE_E_BLANK: u32 = 0x8004_0007;
/// Invalid part index
pub const DV_E_LINDEX: u32 = 0x8004_0068;
/// Unsupported aspect
pub const DV_E_DVASPECT: u32 = 0x8004_006B;
/// Error in the drawing function
pub const VIEW_E_DRAW: u32 = 0x8004_0140;

/// Callback polled during long draws; returning `false` aborts the draw.
pub type ContinueFn = fn(u32) -> bool;

/// Header of a target-device descriptor, laid out like `DVTARGETDEVICE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetDevice {
    pub size: u32,
    pub driver_name_offset: u16,
    pub device_name_offset: u16,
    pub port_name_offset: u16,
    pub ext_dev_mode_offset: u16,
}

/// Failure reported by a foreign draw call, with its HRESULT-style code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DrawError {
    code: u32,
    message: String,
}

impl DrawError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An object that can render a representation of itself onto a device
/// context.
pub trait ViewObject {
    /// Draw the object.
    ///
    /// * `aspect` - what to draw (`DVASPECT_*`)
    /// * `index` - part of the object; [`LINDEX_WHOLE`] for all of it
    /// * `aspect_info` - extra aspect data, usually `None`
    /// * `target_device` - device the drawing is intended for, `None` for screen
    /// * `target_dc` - information context for `target_device`, usually `None`
    /// * `dc` - the device context to draw on
    /// * `bounds` - rectangle within `dc` to draw into
    /// * `window_bounds` - only meaningful for metafile contexts
    /// * `continue_fn` / `continue_arg` - optional abort polling
    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        aspect: u32,
        index: i32,
        aspect_info: Option<NonNull<c_void>>,
        target_device: Option<&TargetDevice>,
        target_dc: Option<Hdc>,
        dc: &mut DeviceContext<'_>,
        bounds: &Rect,
        window_bounds: Option<&Rect>,
        continue_fn: Option<ContinueFn>,
        continue_arg: u32,
    ) -> Result<(), DrawError>;
}

/// An embedded object as seen by the container.
pub trait EmbeddedObject {
    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Query for the draw capability.
    fn as_view_object(&self) -> Option<&dyn ViewObject> {
        None
    }
}
