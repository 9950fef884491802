//! # shop-core
//!
//! Core types and services for the storefront backend-for-frontend.
//!
//! This crate provides:
//! - `ShopError` / `UpstreamError` for typed error handling
//! - `Identity` and `PublicUser` for registered users
//! - `CartItem` coercion and `CheckoutOrder` / `LineItem` for checkout
//! - `PaymentStrategy` trait for payment providers
//! - `CheckoutService`, which holds an optional payment strategy
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CheckoutService, CheckoutUrls, Currency};
//!
//! let service = CheckoutService::new(Some(stripe), CheckoutUrls::new(frontend_url), Currency::USD);
//! let redirect = service.create_session(&user, &json!({"cartItems": [...]})).await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod identity;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use cart::{parse_cart, CartItem};
pub use checkout::CheckoutService;
pub use error::{ShopError, ShopResult, UpstreamError};
pub use identity::{normalize_email, Identity, PublicUser};
pub use order::{CheckoutOrder, CheckoutSession, Currency, LineItem};
pub use strategy::{BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy, SESSION_ID_PLACEHOLDER};
