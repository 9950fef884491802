//! # shop-stripe
//!
//! Stripe payment strategy for storefront-bff.
//!
//! **StripeCheckoutStrategy** creates Checkout Sessions for one-time
//! payments with dynamic line items, customer email prefill and metadata.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::{StripeCheckoutStrategy, StripeConfig};
//! use shop_core::PaymentStrategy;
//!
//! // None when STRIPE_SECRET_KEY is not set
//! if let Some(config) = StripeConfig::resolve(std::env::var("STRIPE_SECRET_KEY").ok())? {
//!     let strategy = StripeCheckoutStrategy::new(config)?;
//!     let session = strategy.create_checkout(
//!         &order,
//!         "https://example.com/checkout/success?session_id={CHECKOUT_SESSION_ID}",
//!         "https://example.com/checkout/cancel",
//!     ).await?;
//!     // Redirect user to session.checkout_url
//! }
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
