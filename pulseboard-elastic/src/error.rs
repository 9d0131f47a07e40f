//! Error types for Elastic operations.

use thiserror::Error;

/// Result type alias for Elastic operations.
pub type Result<T> = std::result::Result<T, ElasticError>;

/// Elastic error type.
#[derive(Debug, Error)]
pub enum ElasticError {
    /// The configured base URL is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A flat record cannot be reconstructed into a nested document
    /// because two keys imply incompatible structure at the same path.
    #[error("Conflicting structure at path: {path}")]
    StructuralConflict {
        /// Dotted path prefix where the conflict was detected.
        path: String,
    },

    /// I/O error (config file loading).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
