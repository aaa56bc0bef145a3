//! Image encoder abstraction
//!
//! Each supported [`OutputFormat`] has an encoder backed by the `image` crate.
//! Formats without an encoder in this build are rejected up front by
//! [`EncoderFactory::create`] with [`Error::InvalidFormat`], before any pixel
//! data is touched.

use image::{ColorType, ImageEncoder as _, RgbaImage};
use std::io::Cursor;

use super::format::OutputFormat;
use crate::error::Error;

/// Default JPEG quality (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Trait for image encoders
///
/// The trait is object-safe so the factory can hand out boxed encoders.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode an RGBA raster into the encoder's format
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error>;

    /// Check if this encoder keeps the alpha channel
    fn supports_transparency(&self) -> bool;
}

/// PNG encoder
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;

        let mut output = Cursor::new(Vec::new());
        ImagePngEncoder::new(&mut output)
            .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
            .map_err(|e| Error::encode_failed("png", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// JPEG encoder with a fixed quality
pub struct JpegEncoder {
    pub quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl JpegEncoder {
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(image.as_raw());

        let mut output = Cursor::new(Vec::new());
        ImageJpegEncoder::new_with_quality(&mut output, self.quality)
            .write_image(&rgb_data, image.width(), image.height(), ColorType::Rgb8)
            .map_err(|e| Error::encode_failed("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        false
    }
}

/// GIF encoder (single frame)
pub struct GifEncoder;

impl ImageEncoder for GifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Gif
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error> {
        use image::codecs::gif::GifEncoder as ImageGifEncoder;

        let mut output = Vec::new();
        {
            let mut encoder = ImageGifEncoder::new(&mut output);
            encoder
                .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
                .map_err(|e| Error::encode_failed("gif", e.to_string()))?;
        }

        Ok(output)
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// BMP encoder
pub struct BmpEncoder;

impl ImageEncoder for BmpEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Bmp
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error> {
        use image::codecs::bmp::BmpEncoder as ImageBmpEncoder;

        let mut output = Cursor::new(Vec::new());
        ImageBmpEncoder::new(&mut output)
            .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
            .map_err(|e| Error::encode_failed("bmp", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// WebP encoder
///
/// Note: the `image` crate only supports lossless WebP encoding.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, Error> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;

        let mut output = Cursor::new(Vec::new());
        ImageWebPEncoder::new_lossless(&mut output)
            .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
            .map_err(|e| Error::encode_failed("webp", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    /// Create an encoder for the specified output format
    ///
    /// Returns [`Error::InvalidFormat`] for formats without an encoder
    /// (AVIF, TIFF).
    pub fn create(format: OutputFormat) -> Result<Box<dyn ImageEncoder>, Error> {
        Self::create_with_quality(format, DEFAULT_JPEG_QUALITY)
    }

    /// Like [`EncoderFactory::create`], with an explicit quality for lossy
    /// formats.
    pub fn create_with_quality(
        format: OutputFormat,
        quality: u8,
    ) -> Result<Box<dyn ImageEncoder>, Error> {
        match format {
            OutputFormat::Png => Ok(Box::new(PngEncoder)),
            OutputFormat::Jpeg => Ok(Box::new(JpegEncoder::with_quality(quality))),
            OutputFormat::Gif => Ok(Box::new(GifEncoder)),
            OutputFormat::Bmp => Ok(Box::new(BmpEncoder)),
            OutputFormat::WebP => Ok(Box::new(WebPEncoder)),
            OutputFormat::Avif | OutputFormat::Tiff => Err(Error::invalid_format(format.as_str())),
        }
    }

    pub fn is_supported(format: OutputFormat) -> bool {
        Self::create(format).is_ok()
    }
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}
