//! Rendering of embedded objects into raster images
//!
//! An embedded object is asked for its view capability and told to draw its
//! content aspect across the whole destination, through a device context
//! acquired from a drawing surface over that destination.

pub mod bridge;
pub mod picture;
pub mod view_object;

pub use bridge::{render_into, render_into_surface, render_to_bytes, render_to_image};
pub use picture::StaticPicture;
pub use view_object::{
    ContinueFn, DrawError, EmbeddedObject, TargetDevice, ViewObject, DVASPECT_CONTENT,
    DVASPECT_DOCPRINT, DVASPECT_ICON, DVASPECT_THUMBNAIL, DV_E_DVASPECT, DV_E_LINDEX, E_ABORT,
    E_FAIL, LINDEX_WHOLE, OLE_E_BLANK, VIEW_E_DRAW,
};
