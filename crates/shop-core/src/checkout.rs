//! # Checkout Service
//!
//! Turns a frontend cart into a hosted checkout session.
//!
//! The payment processor is optional: when no strategy is configured the
//! service still exists and every call fails with a configuration error,
//! leaving the rest of the backend usable.

use crate::cart::parse_cart;
use crate::error::{ShopError, ShopResult};
use crate::identity::PublicUser;
use crate::order::{CheckoutOrder, Currency};
use crate::strategy::{BoxedPaymentStrategy, CheckoutUrls};
use serde_json::Value;
use tracing::{error, info, instrument};

/// Creates checkout sessions through an optional payment strategy
#[derive(Clone)]
pub struct CheckoutService {
    strategy: Option<BoxedPaymentStrategy>,
    urls: CheckoutUrls,
    currency: Currency,
}

impl CheckoutService {
    pub fn new(
        strategy: Option<BoxedPaymentStrategy>,
        urls: CheckoutUrls,
        currency: Currency,
    ) -> Self {
        Self {
            strategy,
            urls,
            currency,
        }
    }

    /// A service with no payment processor
    pub fn unconfigured(urls: CheckoutUrls) -> Self {
        Self::new(None, urls, Currency::default())
    }

    pub fn is_configured(&self) -> bool {
        self.strategy.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|s| s.provider_name())
    }

    /// Create a checkout session for `customer` from a raw request body
    /// (`{"cartItems": [...]}`) and return the redirect URL.
    #[instrument(skip(self, customer, body), fields(user_id = %customer.id))]
    pub async fn create_session(&self, customer: &PublicUser, body: &Value) -> ShopResult<String> {
        let strategy = self.strategy.as_ref().ok_or_else(|| {
            ShopError::Configuration("Payments are not configured".to_string())
        })?;

        let items = parse_cart(body)?;

        let mut order = CheckoutOrder::new(self.currency)
            .with_email(customer.email.clone())
            .with_metadata("user_id", customer.id.clone());
        for item in &items {
            order.add_item(item.to_line_item(self.currency)?);
        }
        let total = order
            .total()
            .ok_or_else(|| ShopError::validation("Cart total out of range"))?;

        let success_url = self.urls.success_url();
        let cancel_url = self.urls.cancel_url();

        info!(
            "Creating checkout: {} items, total={} {}, success_url={}",
            order.item_count(),
            total,
            order.currency,
            success_url
        );

        let session = strategy
            .create_checkout(&order, &success_url, &cancel_url)
            .await
            .map_err(|e| {
                error!("Failed to create checkout: {}", e);
                match e {
                    provider @ ShopError::Provider { .. } => provider,
                    other => ShopError::Provider {
                        provider: strategy.provider_name().to_string(),
                        message: other.to_string(),
                    },
                }
            })?;

        info!("Created checkout session: {}", session.session_id);

        Ok(session.checkout_url)
    }
}
