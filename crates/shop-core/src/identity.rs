//! # Identity Types
//!
//! Registered users. Identities are created once on registration and never
//! change afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalize an email for storage and lookup (trimmed, lower-cased).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A registered user, including the password hash.
///
/// Never serialized to a caller; use [`PublicUser`] for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    /// Normalized email
    pub email: String,
    pub password_hash: String,
}

impl Identity {
    /// Create a new identity with a freshly generated id
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
        }
    }

    /// Public fields only
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The user fields returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
