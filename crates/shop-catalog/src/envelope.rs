//! # Response Envelopes
//!
//! Supported catalog upstreams disagree on the shape of a product list:
//! some return a bare array, others wrap it as `{"products": [...]}`.
//! Callers always get the bare list.

use serde::Deserialize;
use serde_json::Value;

/// Top-level shape of a product-list response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CatalogEnvelope {
    /// `[{...}, {...}]`
    List(Vec<Value>),
    /// `{"products": [{...}], ...}`
    Wrapped { products: Vec<Value> },
}

impl CatalogEnvelope {
    /// Inspect a JSON document; `None` if it is neither shape
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    pub fn into_products(self) -> Vec<Value> {
        match self {
            CatalogEnvelope::List(products) | CatalogEnvelope::Wrapped { products } => products,
        }
    }
}
