//! Error types for rendering and watermarking
//!
//! Every public operation returns [`Result`], whose error side is one of the
//! categories below. Nothing is retried; by the time an error reaches the
//! caller every handle and surface acquired during the attempt is released.

use std::path::PathBuf;
use thiserror::Error;

use crate::raster::SurfaceError;
use crate::render::DrawError;

/// Result type alias for viewmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or watermarking an image
#[derive(Error, Debug)]
pub enum Error {
    /// The object handed to the renderer does not expose the draw capability
    #[error("Object '{object}' does not implement the view object draw capability")]
    CapabilityMismatch { object: String },

    /// The foreign draw call reported failure
    #[error("Render failed (hresult {code:#010x}): {message}")]
    RenderFailure { code: u32, message: String },

    /// No encoder is available for the requested format
    #[error("Unsupported output format: {format}")]
    InvalidFormat { format: String },

    /// The drawing surface failed while compositing
    #[error("Failed to composite image: {0}")]
    CompositeFailure(String),

    /// An image file could not be read
    #[error("Failed to load image '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The encoder accepted the format but failed to produce output
    #[error("Failed to encode to {format}: {message}")]
    Encode { format: String, message: String },

    /// A color string is not `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    #[error("Invalid color '{color}': {reason}")]
    InvalidColor { color: String, reason: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_format(format: impl Into<String>) -> Self {
        Error::InvalidFormat {
            format: format.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        Error::Decode(message.into())
    }

    pub fn invalid_color(color: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidColor {
            color: color.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than by a
    /// failure inside a surface or the foreign object.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::CapabilityMismatch { .. }
                | Error::InvalidFormat { .. }
                | Error::Load { .. }
                | Error::Decode(_)
                | Error::InvalidColor { .. }
                | Error::Config(_)
        )
    }
}

impl From<SurfaceError> for Error {
    fn from(err: SurfaceError) -> Self {
        Error::CompositeFailure(err.to_string())
    }
}

impl From<DrawError> for Error {
    fn from(err: DrawError) -> Self {
        Error::RenderFailure {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
