// Viewmark: render embedded objects and tile watermarks onto raster images

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod raster;
pub mod render;
pub mod watermark;

pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use raster::{Color, OutputFormat};
pub use render::{render_into, EmbeddedObject, ViewObject};
pub use watermark::{apply_watermark, apply_watermark_files, apply_watermark_from_path};
