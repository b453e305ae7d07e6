//! Error types for the provider client

use thiserror::Error;

/// Provider client error types
#[derive(Error, Debug)]
pub enum AiError {
    #[error("provider API key is missing or empty")]
    MissingApiKey,

    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, AiError>;
