//! # Session Tokens
//!
//! Compact HS256 JWTs carrying the public user fields. Tokens are stateless:
//! nothing is stored server-side, so a token stays valid until it expires.
//!
//! The signing secret is process-wide. When none is configured a public
//! development default is used, which makes every token forgeable; any
//! non-demo deployment must set its own secret.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shop_core::{PublicUser, ShopError, ShopResult};

/// Fallback signing secret for local development only
pub const DEFAULT_TOKEN_SECRET: &str = "dev-insecure-signing-key-change-me";

/// Fixed token lifetime
pub const TOKEN_LIFETIME_HOURS: i64 = 2;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn user(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl SessionTokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    /// Issue a token for `user`, valid for two hours from now
    pub fn issue(&self, user: &PublicUser) -> ShopResult<IssuedToken> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn issue_at(&self, user: &PublicUser, issued_at: DateTime<Utc>) -> ShopResult<IssuedToken> {
        let expires_at = issued_at + self.lifetime;
        let claims = SessionClaims {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ShopError::Internal(format!("failed to sign token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> ShopResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ShopError::InvalidToken(e.to_string()))
    }
}
