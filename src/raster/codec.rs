//! Loading, decoding and encoding rasters.

use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::io::Cursor;
use std::path::Path;

use super::encoder::EncoderFactory;
use super::format::OutputFormat;
use crate::error::{Error, Result};

/// Load and decode an image file into an RGBA raster.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;

    let image = decode_image(&data)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );
    Ok(image)
}

/// Decode image bytes of any supported format into an RGBA raster.
pub fn decode_image(data: &[u8]) -> Result<RgbaImage> {
    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| Error::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| Error::decode_failed(e.to_string()))?;
    Ok(image.to_rgba8())
}

/// Detect the format of encoded image bytes.
pub fn detect_format(data: &[u8]) -> Option<OutputFormat> {
    image::guess_format(data)
        .ok()
        .and_then(OutputFormat::from_image_format)
}

/// Encode a raster to `format`, consuming it.
///
/// The raster is dropped once its bytes have been produced.
pub fn encode_image(image: RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    encode_image_with_quality(image, format, super::encoder::DEFAULT_JPEG_QUALITY)
}

pub fn encode_image_with_quality(
    image: RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>> {
    let encoder = EncoderFactory::create_with_quality(format, quality)?;
    if !encoder.supports_transparency() && has_transparency(&image) {
        tracing::warn!(
            format = %format,
            "Discarding transparency: format has no alpha channel"
        );
    }
    let bytes = encoder.encode(&image)?;
    tracing::debug!(
        format = %format,
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Encoded image"
    );
    Ok(bytes)
}

/// Whether any pixel of `image` is not fully opaque.
pub fn has_transparency(image: &RgbaImage) -> bool {
    image.pixels().any(|p| p[3] != 255)
}

/// Load the image at `path` and re-encode it as `format`.
pub fn convert_to_format(path: impl AsRef<Path>, format: OutputFormat) -> Result<Vec<u8>> {
    // Reject the format before paying for the decode.
    EncoderFactory::create(format)?;
    let image = load_image(path)?;
    encode_image(image, format)
}
