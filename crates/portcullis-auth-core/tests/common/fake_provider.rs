//! In-memory identity provider for testing

use async_trait::async_trait;
use dashmap::DashMap;
use portcullis_auth_core::{IdentityProvider, ProviderError, ProviderToken};
use portcullis_types::{Claims, SubjectId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fake provider: tokens are looked up in a table, revocations are recorded
#[derive(Default, Clone)]
pub struct FakeIdentityProvider {
    tokens: Arc<DashMap<String, Result<ProviderToken, ProviderError>>>,
    revocations: Arc<DashMap<String, usize>>,
    revoke_failure: Arc<Mutex<Option<ProviderError>>>,
    verify_calls: Arc<AtomicUsize>,
}

impl FakeIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with `tok-123` -> `user-1` and an expired `tok-expired`
    pub fn seeded() -> Self {
        let provider = Self::new();
        provider.accept("tok-123", "user-1");
        provider.reject("tok-expired", "auth/id-token-expired");
        provider.reject("tok-disabled", "auth/user-disabled");
        provider
    }

    /// Accept `token` as `uid` with an email claim
    pub fn accept(&self, token: &str, uid: &str) {
        let mut claims = Claims::new();
        claims.insert(
            "email".to_string(),
            serde_json::json!(format!("{uid}@example.com")),
        );
        self.tokens.insert(
            token.to_string(),
            Ok(ProviderToken {
                uid: uid.to_string(),
                claims,
            }),
        );
    }

    /// Reject `token` with provider error `code`
    pub fn reject(&self, token: &str, code: &str) {
        self.tokens.insert(
            token.to_string(),
            Err(ProviderError::new(code, "rejected by fake provider")),
        );
    }

    /// Make every revocation fail with `code`
    pub fn fail_revocations(&self, code: &str) {
        *self.revoke_failure.lock().unwrap() =
            Some(ProviderError::new(code, "provider unavailable"));
    }

    /// Number of upstream verification calls so far
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// Number of upstream revocations attempted for `uid`
    pub fn revocations_for(&self, uid: &str) -> usize {
        self.revocations.get(uid).map(|n| *n).unwrap_or(0)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<ProviderToken, ProviderError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(id_token)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| {
                Err(ProviderError::new(
                    "auth/invalid-id-token",
                    "unknown token",
                ))
            })
    }

    async fn revoke_subject(&self, subject: &SubjectId) -> Result<(), ProviderError> {
        *self
            .revocations
            .entry(subject.to_string())
            .or_insert(0) += 1;
        match self.revoke_failure.lock().unwrap().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
