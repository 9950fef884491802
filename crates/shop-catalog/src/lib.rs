//! # shop-catalog
//!
//! Product catalog proxy for storefront-bff.
//!
//! Two public upstreams are supported out of the box:
//!
//! | Upstream | `GET /products` shape |
//! |----------|-----------------------|
//! | FakeStore API (`fakestoreapi.com`) | `[ {...}, ... ]` |
//! | DummyJSON (`dummyjson.com`) | `{"products": [ ... ], "total": n, ...}` |
//!
//! Callers always receive a bare list and never need to know which one is
//! configured.
//!
//! ```rust,ignore
//! use shop_catalog::{CatalogConfig, CatalogProxy};
//!
//! let proxy = CatalogProxy::new(CatalogConfig::resolve(|key| std::env::var(key).ok()))?;
//! let products = proxy.list_products().await?;
//! ```

pub mod config;
pub mod envelope;
pub mod proxy;

// Re-exports
pub use config::{CatalogConfig, UpstreamSource, DUMMYJSON_BASE_URL, FAKESTORE_BASE_URL};
pub use envelope::CatalogEnvelope;
pub use proxy::CatalogProxy;
