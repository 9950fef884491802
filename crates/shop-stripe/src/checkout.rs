//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API for one-time payments.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use shop_core::{CheckoutOrder, CheckoutSession, PaymentStrategy, ShopError, ShopResult};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page; card details never touch this server.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShopError::Internal(format!("failed to build Stripe client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    fn provider_error(message: impl Into<String>) -> ShopError {
        ShopError::Provider {
            provider: PROVIDER.to_string(),
            message: message.into(),
        }
    }
}

/// Form body for `POST /v1/checkout/sessions`
fn build_form_params(
    order: &CheckoutOrder,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    let mut form_params: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
    ];

    for (i, item) in order.line_items.iter().enumerate() {
        form_params.push((
            format!("line_items[{}][price_data][currency]", i),
            order.currency.as_str().to_string(),
        ));
        form_params.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        form_params.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.name.clone(),
        ));
        if let Some(ref image) = item.image_url {
            form_params.push((
                format!("line_items[{}][price_data][product_data][images][0]", i),
                image.clone(),
            ));
        }
        form_params.push((
            format!("line_items[{}][quantity]", i),
            item.quantity.to_string(),
        ));
    }

    if let Some(ref email) = order.customer_email {
        form_params.push(("customer_email".to_string(), email.clone()));
    }

    form_params.push(("metadata[order_id]".to_string(), order.id.clone()));
    for (key, value) in &order.metadata {
        form_params.push((format!("metadata[{}]", key), value.clone()));
    }

    form_params
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create_checkout(
        &self,
        order: &CheckoutOrder,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutSession> {
        if order.is_empty() {
            return Err(ShopError::validation("Order has no items"));
        }

        let form_params = build_form_params(order, success_url, cancel_url);
        debug!(
            "Creating Stripe checkout session: {} line items",
            order.line_items.len()
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &order.idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::provider_error(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(Self::provider_error(error_response.error.message));
            }
            return Err(Self::provider_error(format!("HTTP {}: {}", status, body)));
        }

        let session_response: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| Self::provider_error(format!("Failed to parse Stripe response: {e}")))?;

        let checkout_url = session_response
            .url
            .ok_or_else(|| Self::provider_error("Stripe session has no redirect URL"))?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, checkout_url
        );

        let mut session =
            CheckoutSession::new(session_response.id, &order.id, PROVIDER, checkout_url);
        session.expires_at = session_response
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        Ok(session)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
