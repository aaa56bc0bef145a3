// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::raster::{Color, OutputFormat, DEFAULT_JPEG_QUALITY};

/// Top-level configuration, loaded from YAML.
///
/// Every section and field is optional; an empty document yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_render_width() -> u32 {
    256
}

fn default_render_height() -> u32 {
    256
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

/// Defaults for rendering embedded objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Destination width in pixels (default: 256)
    #[serde(default = "default_render_width")]
    pub width: u32,

    /// Destination height in pixels (default: 256)
    #[serde(default = "default_render_height")]
    pub height: u32,

    /// Background color as hex (default: #FFFFFF)
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_render_width(),
            height: default_render_height(),
            background: default_background(),
        }
    }
}

impl RenderConfig {
    /// Parsed background color.
    pub fn background_color(&self) -> Result<Color> {
        Color::from_hex(&self.background)
    }
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

/// Defaults for watermarking and conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Output format when none is given (default: png)
    #[serde(default)]
    pub format: OutputFormat,

    /// JPEG quality, 1-100 (default: 90)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable multi-line output
    #[default]
    Pretty,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| Error::Config(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(Error::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        // An empty document parses as null, not as an empty mapping
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.width == 0 || self.render.height == 0 {
            return Err(Error::Config(format!(
                "Render size {}x{} must be non-zero",
                self.render.width, self.render.height
            )));
        }

        self.render
            .background_color()
            .map_err(|e| Error::Config(format!("Invalid render background: {}", e)))?;

        if !(1..=100).contains(&self.watermark.jpeg_quality) {
            return Err(Error::Config(format!(
                "JPEG quality {} is out of range 1-100",
                self.watermark.jpeg_quality
            )));
        }

        if !crate::raster::EncoderFactory::is_supported(self.watermark.format) {
            return Err(Error::Config(format!(
                "No encoder available for default format '{}'",
                self.watermark.format
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(Error::Config("Log level cannot be empty".to_string()));
        }

        Ok(())
    }
}
