//! Error types for the offline cache.

use thiserror::Error;

/// Errors that can occur while filling or serving the offline cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Network unreachable or request timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// URL could not be resolved against the worker scope
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Static precache failed; nothing was stored
    #[error("Precache failed: {0}")]
    Precache(String),

    /// Unrecognized worker message
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl From<url::ParseError> for CacheError {
    fn from(err: url::ParseError) -> Self {
        CacheError::InvalidUrl(err.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
