//! # Error Types
//!
//! Typed error handling for the storefront backend.
//! Every service operation returns `Result<T, ShopError>`; the HTTP layer
//! maps each variant to a status code and a JSON envelope.

use std::fmt;
use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Bad or missing caller input
    #[error("{0}")]
    Validation(String),

    /// Duplicate resource (e.g. email already registered)
    #[error("{0}")]
    Conflict(String),

    /// Missing token or bad credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// Token failed verification (bad signature, malformed, expired)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Catalog upstream call failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Payment provider call failed
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Required integration not configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Validation(_) => 400,
            ShopError::Conflict(_) => 409,
            ShopError::Unauthenticated(_) | ShopError::InvalidToken(_) => 401,
            ShopError::Upstream(_) => 502,
            ShopError::Provider { .. } => 500,
            ShopError::Configuration(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Message that is safe to show to the caller.
    ///
    /// Token failures collapse to a generic "Unauthorized" and provider or
    /// internal failures never echo their underlying detail.
    pub fn client_message(&self) -> String {
        match self {
            ShopError::Validation(msg)
            | ShopError::Conflict(msg)
            | ShopError::Unauthenticated(msg)
            | ShopError::Configuration(msg) => msg.clone(),
            ShopError::InvalidToken(_) => "Unauthorized".to_string(),
            ShopError::Upstream(err) => err.message.clone(),
            ShopError::Provider { .. } => "Failed to create checkout session".to_string(),
            ShopError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ShopError::Validation(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        ShopError::Unauthenticated(msg.into())
    }
}

/// A failed call to the catalog upstream.
///
/// Carries enough context to tell which upstream request failed and why:
/// the URL attempted, the HTTP status if one was received (absent on
/// network errors and timeouts) and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub url: String,
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (url={}, status={})", self.message, self.url, status),
            None => write!(f, "{} (url={})", self.message, self.url),
        }
    }
}

impl std::error::Error for UpstreamError {}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
