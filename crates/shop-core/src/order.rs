//! # Order Types
//!
//! Checkout orders handed to a payment strategy, and the sessions it returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Supported checkout currencies (ISO 4217, two decimal places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
        }
    }

    /// Parse a currency code, case-insensitively
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "usd" => Some(Currency::USD),
            "eur" => Some(Currency::EUR),
            "gbp" => Some(Currency::GBP),
            "cad" => Some(Currency::CAD),
            "aud" => Some(Currency::AUD),
            _ => None,
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents).
    ///
    /// `None` when the amount is not finite or does not fit in an `i64`.
    pub fn to_smallest_unit(&self, amount: f64) -> Option<i64> {
        let cents = (amount * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range
        (cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64)
            .then_some(cents as i64)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// A line item in an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Display name
    pub name: String,

    /// Unit price in the smallest currency unit
    pub unit_amount: i64,

    /// Quantity (>= 1)
    pub quantity: u32,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl LineItem {
    /// Total for this line in the smallest currency unit; `None` on overflow
    pub fn total(&self) -> Option<i64> {
        self.unit_amount.checked_mul(i64::from(self.quantity))
    }
}

/// A one-time payment order to be checked out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOrder {
    /// Unique order ID (generated)
    pub id: String,

    pub line_items: Vec<LineItem>,

    pub currency: Currency,

    /// Customer email (optional, for prefill)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Idempotency key (prevents duplicate sessions on resubmission)
    pub idempotency_key: String,

    /// Custom metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,

    pub created_at: DateTime<Utc>,
}

impl CheckoutOrder {
    /// Create a new empty order with generated ID
    pub fn new(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            currency,
            customer_email: None,
            idempotency_key: Uuid::new_v4().to_string(),
            metadata: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Set customer email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Order total in the smallest currency unit; `None` on overflow
    pub fn total(&self) -> Option<i64> {
        self.line_items
            .iter()
            .try_fold(0i64, |sum, item| sum.checked_add(item.total()?))
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Sum of quantities
    pub fn item_count(&self) -> u64 {
        self.line_items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A hosted checkout session created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// Our internal order ID
    pub order_id: String,

    /// Provider name (e.g., "stripe")
    pub provider: String,

    /// URL to redirect the customer to
    pub checkout_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(
        session_id: impl Into<String>,
        order_id: impl Into<String>,
        provider: impl Into<String>,
        checkout_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            order_id: order_id.into(),
            provider: provider.into(),
            checkout_url: checkout_url.into(),
            expires_at: None,
            created_at: Utc::now(),
        }
    }
}
