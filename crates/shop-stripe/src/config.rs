//! # Stripe Configuration
//!
//! Stripe is optional: with no `STRIPE_SECRET_KEY` the backend runs without
//! payments. A key that is present but malformed is a configuration error.

use shop_core::{ShopError, ShopResult};
use std::time::Duration;

pub const STRIPE_API_BASE_URL: &str = "https://api.stripe.com";
pub const STRIPE_API_VERSION: &str = "2024-12-18.acacia";
pub const STRIPE_TIMEOUT_SECS: u64 = 20;

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl StripeConfig {
    /// Validate an optional `STRIPE_SECRET_KEY`.
    ///
    /// Returns `Ok(None)` when the key is unset or blank.
    pub fn resolve(secret_key: Option<String>) -> ShopResult<Option<Self>> {
        let Some(secret_key) = secret_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
        else {
            return Ok(None);
        };

        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(ShopError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        Ok(Some(Self::new(secret_key)))
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: STRIPE_API_BASE_URL.to_string(),
            api_version: STRIPE_API_VERSION.to_string(),
            timeout: Duration::from_secs(STRIPE_TIMEOUT_SECS),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_disables_payments() {
        assert!(StripeConfig::resolve(None).unwrap().is_none());
        assert!(StripeConfig::resolve(Some("   ".into())).unwrap().is_none());
    }

    #[test]
    fn test_valid_keys() {
        let config = StripeConfig::resolve(Some("sk_test_abc123".into()))
            .unwrap()
            .unwrap();
        assert!(config.is_test_mode());
        assert_eq!(config.api_base_url, STRIPE_API_BASE_URL);

        let config = StripeConfig::resolve(Some("sk_live_abc123".into()))
            .unwrap()
            .unwrap();
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_malformed_key_rejected() {
        let result = StripeConfig::resolve(Some("pk_test_abc123".into()));
        assert!(matches!(result, Err(ShopError::Configuration(_))));
    }

    #[test]
    fn test_auth_header() {
        let config = StripeConfig::new("sk_test_abc123");
        assert_eq!(config.auth_header(), "Bearer sk_test_abc123");
    }
}
