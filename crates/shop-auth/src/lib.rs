//! # shop-auth
//!
//! Demo authentication for storefront-bff.
//!
//! - **CredentialStore** / **InMemoryCredentialStore** - identities for the
//!   lifetime of the process
//! - **SessionTokenCodec** - signs and verifies two-hour HS256 tokens
//! - **AuthService** - register / login, returning `{token, user}`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_auth::{AuthService, InMemoryCredentialStore, SessionTokenCodec};
//!
//! let auth = AuthService::new(
//!     Arc::new(InMemoryCredentialStore::new()),
//!     Arc::new(SessionTokenCodec::new(&secret)),
//! );
//! let session = auth.register("Ada", "ada@example.com", "hunter22").await?;
//! let claims = auth.tokens().verify(&session.token)?;
//! ```

pub mod service;
pub mod store;
pub mod token;

// Re-exports
pub use service::{AuthService, AuthSession, INVALID_CREDENTIALS};
pub use store::{CredentialStore, InMemoryCredentialStore};
pub use token::{IssuedToken, SessionClaims, SessionTokenCodec, DEFAULT_TOKEN_SECRET};
