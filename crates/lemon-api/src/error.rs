//! API error types.

use thiserror::Error;

/// Errors that can occur when talking to the LemonLens API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The account has too few credits for the requested report.
    #[error("insufficient credits: {message}")]
    InsufficientCredits {
        required: Option<u32>,
        current: Option<u32>,
        message: String,
    },

    /// Credentials or bearer token rejected (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the request body (422).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Too many requests (429).
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The client could not be built from configuration.
    #[error(transparent)]
    Config(#[from] lemon_config::ConfigError),

    /// Response body could not be mapped.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// True for errors worth retrying the same call for.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<lemon_core::CoreError> for ApiError {
    fn from(error: lemon_core::CoreError) -> Self {
        Self::Parse(error.to_string())
    }
}
