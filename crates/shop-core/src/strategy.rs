//! # Payment Strategy Trait
//!
//! Strategy pattern trait for payment providers. The checkout service only
//! talks to this trait, so the processor can be swapped (or mocked in tests)
//! without touching the HTTP layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           PaymentStrategy (trait)           │
//! │  ├── create_checkout()                      │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!              ┌────────┴────────┐
//!              │ StripeCheckout  │
//!              │    Strategy     │
//!              └─────────────────┘
//! ```

use crate::error::ShopResult;
use crate::order::{CheckoutOrder, CheckoutSession};
use async_trait::async_trait;
use std::sync::Arc;

/// Placeholder the processor substitutes with the real session id on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout session for a one-time payment.
    ///
    /// # Arguments
    /// * `order` - The order to check out
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to redirect if the customer cancels
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Redirect URLs used in checkout, built from the frontend base URL
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the frontend (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel page path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            success_path: "/checkout/success".to_string(),
            cancel_path: "/checkout/cancel".to_string(),
        }
    }

    /// Success URL with the session-id placeholder appended
    pub fn success_url(&self) -> String {
        format!(
            "{}{}?session_id={}",
            self.base_url, self.success_path, SESSION_ID_PLACEHOLDER
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_urls() {
        let urls = CheckoutUrls::new("https://shop.example.com/");

        assert_eq!(
            urls.success_url(),
            "https://shop.example.com/checkout/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url(), "https://shop.example.com/checkout/cancel");
    }
}
