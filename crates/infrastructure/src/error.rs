//! Infrastructure errors

use thiserror::Error;

/// Errors raised during configuration and startup loading
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured timezone name is not in the tz database
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    /// Manifest or cache file I/O failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being read or written
        path: String,
        /// The underlying error
        source: std::io::Error,
    },

    /// Manifest or cache content could not be (de)serialized
    #[error("Serialization error on {path}: {source}")]
    Serialization {
        /// The file being parsed or written
        path: String,
        /// The underlying error
        source: serde_json::Error,
    },
}
