//! Error types for Corsano API operations.

use thiserror::Error;

/// Result type alias for Corsano operations.
pub type Result<T> = std::result::Result<T, CorsanoError>;

/// Corsano error type.
#[derive(Debug, Error)]
pub enum CorsanoError {
    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A chained login was attempted before the source client obtained
    /// a token.
    #[error("No session token available; log in first")]
    MissingToken,
}
