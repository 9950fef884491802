//! # Auth Service
//!
//! Demo email/password registration and login on top of a credential store
//! and the session token codec.

use crate::store::CredentialStore;
use crate::token::SessionTokenCodec;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Serialize;
use shop_core::{Identity, PublicUser, ShopError, ShopResult};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

/// Same message for unknown email and wrong password
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified against when the email is unknown, so both failures cost one Argon2 run
const DUMMY_PASSWORD: &str = "storefront-bff-dummy-password";

/// Token plus public user fields, returned by register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// Registration and login
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<SessionTokenCodec>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<SessionTokenCodec>) -> Self {
        Self {
            store,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn tokens(&self) -> &Arc<SessionTokenCodec> {
        &self.tokens
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Register a new identity and issue a session token.
    ///
    /// # Errors
    ///
    /// `Validation` if any field is blank, `Conflict` if the email is taken.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ShopResult<AuthSession> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ShopError::validation("name, email and password are required"));
        }

        // fail fast before paying for the hash
        if self.store.find_by_email(email).await?.is_some() {
            return Err(ShopError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(password.to_string()).await?;
        let identity = self
            .store
            .insert(Identity::new(name, email, password_hash))
            .await?;

        info!(user_id = %identity.id, "Registered new user");
        self.session_for(identity.public())
    }

    /// Verify credentials and issue a fresh session token.
    ///
    /// # Errors
    ///
    /// `Validation` if a field is blank, `Unauthenticated` if the email is
    /// unknown or the password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ShopResult<AuthSession> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ShopError::validation("email and password are required"));
        }

        let Some(identity) = self.store.find_by_email(email).await? else {
            let dummy = self.dummy_hash().await?.to_string();
            verify_password(password.to_string(), dummy).await?;
            return Err(ShopError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !verify_password(password.to_string(), identity.password_hash.clone()).await? {
            return Err(ShopError::unauthenticated(INVALID_CREDENTIALS));
        }

        info!(user_id = %identity.id, "User logged in");
        self.session_for(identity.public())
    }

    async fn dummy_hash(&self) -> ShopResult<&str> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_string()))
            .await
            .map(String::as_str)
    }

    fn session_for(&self, user: PublicUser) -> ShopResult<AuthSession> {
        let issued = self.tokens.issue(&user)?;
        Ok(AuthSession {
            token: issued.token,
            user,
        })
    }
}

/// Salted Argon2 hash, computed off the async executor
async fn hash_password(password: String) -> ShopResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ShopError::Internal(format!("password hashing failed: {e}")))
    })
    .await
    .map_err(|e| ShopError::Internal(format!("hashing task failed: {e}")))?
}

/// Returns false for a wrong password or an unparseable stored hash
async fn verify_password(password: String, hash: String) -> ShopResult<bool> {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await
    .map_err(|e| ShopError::Internal(format!("verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCredentialStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(SessionTokenCodec::new("test-secret")),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let registered = auth
            .register("Ada Lovelace", "Ada@Example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(registered.user.email, "ada@example.com");

        let session = auth.login("ada@example.com", "hunter22").await.unwrap();
        let claims = auth.tokens().verify(&session.token).unwrap();

        assert_eq!(claims.id, registered.user.id);
        assert_eq!(claims.email, registered.user.email);
        assert_eq!(session.user, registered.user);
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let auth = service();
        for (name, email, password) in [
            ("", "a@b.c", "pw"),
            ("Ada", "  ", "pw"),
            ("Ada", "a@b.c", ""),
        ] {
            let result = auth.register(name, email, password).await;
            assert!(matches!(result, Err(ShopError::Validation(_))));
        }
        assert_eq!(auth.store().len().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let auth = service();
        auth.register("Ada", "ada@example.com", "pw1").await.unwrap();

        let result = auth.register("Ada Again", "ADA@example.com", "pw2").await;
        assert!(matches!(result, Err(ShopError::Conflict(_))));
        assert_eq!(auth.store().len().await, 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("Ada", "ada@example.com", "right").await.unwrap();

        let wrong_password = auth.login("ada@example.com", "wrong").await.unwrap_err();
        let unknown_email = auth.login("nobody@example.com", "right").await.unwrap_err();

        assert!(matches!(wrong_password, ShopError::Unauthenticated(_)));
        assert_eq!(wrong_password.client_message(), unknown_email.client_message());
        assert_eq!(wrong_password.status_code(), unknown_email.status_code());
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_hash() {
        let auth = service();
        assert!(auth.dummy_hash.get().is_none());

        let err = auth.login("nobody@example.com", "whatever").await.unwrap_err();
        assert!(matches!(err, ShopError::Unauthenticated(_)));

        let dummy = auth.dummy_hash.get().unwrap();
        assert!(dummy.starts_with("$argon2"));
        assert!(verify_password(DUMMY_PASSWORD.to_string(), dummy.clone()).await.unwrap());

        // the dummy password never logs anyone in
        let err = auth.login("nobody@example.com", DUMMY_PASSWORD).await.unwrap_err();
        assert!(matches!(err, ShopError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let auth = service();
        assert!(matches!(
            auth.login("", "pw").await,
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            auth.login("ada@example.com", "").await,
            Err(ShopError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_stored_hash_is_not_plaintext() {
        let auth = service();
        auth.register("Ada", "ada@example.com", "hunter22").await.unwrap();

        let identity = auth
            .store()
            .find_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(identity.password_hash, "hunter22");
        assert!(identity.password_hash.starts_with("$argon2"));
    }
}
