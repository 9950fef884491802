//! # shop-api
//!
//! HTTP API layer for storefront-bff.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Auth endpoints with a bearer-token auth gate
//! - Catalog proxy and checkout endpoints
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/auth/register` | Register |
//! | POST | `/api/auth/login` | Log in |
//! | GET | `/api/auth/me` | Current user |
//! | GET | `/api/products` | List products |
//! | GET | `/api/products/{id}` | Get product |
//! | POST | `/api/checkout/create-session` | Create checkout session |

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
