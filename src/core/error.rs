//! Error types and error handling for the site-search service.
//!
//! Only index resolution failures surface out of a search call. Missing
//! scope targets, unknown languages, stale index entries and malformed
//! context ids degrade to narrower results instead of errors, so they
//! have no variant here.

use thiserror::Error;

/// Result type alias for site-search operations
pub type Result<T> = std::result::Result<T, SiteSearchError>;

/// Main error type for the site-search service
#[derive(Error, Debug)]
pub enum SiteSearchError {
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SiteSearchError {
    /// Check if the search could not run because no index resolved
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SiteSearchError::IndexUnavailable(_))
    }

    /// Check if this is a bad input error (configuration or fixture content)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SiteSearchError::ConfigError(_)
                | SiteSearchError::InvalidContent(_)
                | SiteSearchError::TomlError(_)
        )
    }
}
