// Logging module for structured logging using the tracing crate

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while installing the global subscriber
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Build the level filter: `RUST_LOG` when set, otherwise `config.level`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        message: e.to_string(),
    })
}

/// Initialize the tracing subscriber for structured logging
///
/// Installs a global fmt subscriber writing to stderr, in JSON or pretty
/// form. Fails if a global subscriber is already installed; library code
/// never calls this, only binaries and tests.
///
/// # Examples
///
/// ```
/// use viewmark::config::LoggingConfig;
/// use viewmark::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).ok();
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}
