/// Core error types for Audiotour
use thiserror::Error;

/// Result type alias using `TourError`
pub type Result<T> = std::result::Result<T, TourError>;

/// Core error type for Audiotour
#[derive(Error, Debug)]
pub enum TourError {
    /// No tour with this id in the catalog
    #[error("Tour not found: {0}")]
    TourNotFound(String),

    /// Catalog data violates an invariant
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Page location could not be parsed
    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// TOML parse errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TourError {
    /// Create an invalid catalog error
    pub fn invalid_catalog(msg: impl Into<String>) -> Self {
        Self::InvalidCatalog(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<config::ConfigError> for TourError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
