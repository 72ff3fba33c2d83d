//! Error types and error handling for cvrag.
//!
//! This module defines the error types used throughout the
//! application. The chunker has its own narrow error type,
//! [`ChunkConfigError`], which is the only failure it can produce;
//! everything else funnels into [`CvragError`].

use thiserror::Error;

/// Result type alias for cvrag operations
pub type Result<T> = std::result::Result<T, CvragError>;

/// Invalid chunking configuration.
///
/// Raised before any chunk is produced. Always caller-correctable,
/// never transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkConfigError {
    #[error("chunk size must be greater than zero")]
    ZeroSize,

    #[error("overlap ({overlap}) must be less than chunk size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },
}

/// Main error type for cvrag
#[derive(Error, Debug)]
pub enum CvragError {
    #[error("Invalid chunk configuration: {0}")]
    Chunking(#[from] ChunkConfigError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index '{name}' not ready after {waited_secs}s")]
    IndexNotReady { name: String, waited_secs: u64 },

    #[error("Loading failed: {0}")]
    LoadFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Authentication rejected by {service}")]
    Auth { service: String },

    #[error("Rate limited by {service}")]
    RateLimited { service: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl CvragError {
    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CvragError::IndexNotFound(_) | CvragError::InvalidPath(_)
        )
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            CvragError::Chunking(_) | CvragError::InvalidQuery(_) | CvragError::ConfigError(_)
        )
    }

    /// Check if retrying the same call later could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CvragError::RateLimited { .. } | CvragError::IndexNotReady { .. } => true,
            CvragError::Api { status, .. } => *status >= 500,
            CvragError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
