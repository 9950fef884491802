//! # Credential Store
//!
//! Storage seam for registered identities. The only implementation keeps
//! everything in process memory; identities disappear on restart.

use async_trait::async_trait;
use shop_core::{normalize_email, Identity, ShopError, ShopResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Insert-and-lookup storage for identities.
///
/// Implementations must reject a second identity with the same normalized
/// email, even when two inserts race.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a new identity. Fails with `Conflict` if the email is taken.
    async fn insert(&self, identity: Identity) -> ShopResult<Identity>;

    /// Look up an identity by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> ShopResult<Option<Identity>>;

    /// Number of stored identities.
    async fn len(&self) -> usize;
}

/// Process-lifetime identity store keyed by normalized email
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, identity: Identity) -> ShopResult<Identity> {
        let key = normalize_email(&identity.email);
        // check and insert under a single write guard
        let mut identities = self.identities.write().await;
        if identities.contains_key(&key) {
            return Err(ShopError::Conflict("Email already registered".to_string()));
        }
        identities.insert(key, identity.clone());
        Ok(identity)
    }

    async fn find_by_email(&self, email: &str) -> ShopResult<Option<Identity>> {
        let identities = self.identities.read().await;
        Ok(identities.get(&normalize_email(email)).cloned())
    }

    async fn len(&self) -> usize {
        self.identities.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_and_find_case_insensitive() {
        let store = InMemoryCredentialStore::new();
        let identity = Identity::new("Ada", "ada@example.com", "hash");
        store.insert(identity.clone()).await.unwrap();

        let found = store.find_by_email("  ADA@Example.com").await.unwrap();
        assert_eq!(found, Some(identity));
        assert_eq!(store.find_by_email("bob@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryCredentialStore::new();
        store
            .insert(Identity::new("Ada", "ada@example.com", "h1"))
            .await
            .unwrap();

        let result = store.insert(Identity::new("Imposter", "Ada@Example.COM", "h2")).await;
        assert!(matches!(result, Err(ShopError::Conflict(_))));
        assert_eq!(store.len().await, 1);

        let kept = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(kept.name, "Ada");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_inserts_keep_one() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(Identity::new(format!("user{i}"), "race@example.com", "h"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }
}
