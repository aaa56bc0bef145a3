//! Raster images and the drawing primitives over them
//!
//! Everything the renderer and the compositor need from a 2-D graphics
//! library lives here:
//! - [`Color`] and [`OutputFormat`]
//! - Loading, decoding and encoding (on top of the `image` crate)
//! - [`DrawingSurface`], with [`RasterSurface`] as the in-memory implementation
//! - [`DeviceContext`], the scoped native handle issued by a surface

pub mod blend;
pub mod codec;
pub mod color;
pub mod device_context;
pub mod encoder;
pub mod format;
pub mod surface;

pub use codec::{
    convert_to_format, decode_image, detect_format, encode_image, encode_image_with_quality,
    has_transparency, load_image,
};
pub use color::Color;
pub use device_context::{DeviceContext, Hdc};
pub use encoder::{EncoderFactory, ImageEncoder, DEFAULT_JPEG_QUALITY};
pub use format::OutputFormat;
pub use surface::{DrawingSurface, RasterSurface, SmoothingMode, SurfaceError};

pub use image::RgbaImage;
