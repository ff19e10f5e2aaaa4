//! Identity-provider capability
//!
//! The session core needs exactly two things from the upstream identity
//! provider: verify an ID token, and revoke a subject's sessions. Both are
//! behind [`IdentityProvider`] so the use cases run against a fake in tests.

mod jwks;

pub use jwks::JwksIdentityProvider;

use async_trait::async_trait;
use portcullis_types::{Claims, SubjectId};
use std::sync::Arc;

/// What the provider reports for a token it accepted
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderToken {
    /// Provider user id (`sub`)
    pub uid: String,
    /// Remaining token claims
    pub claims: Claims,
}

/// Provider failure, in the provider's own vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider error code, e.g. `auth/id-token-expired`
    pub code: String,
    /// Human-readable detail, never shown to end users
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Admin-side identity provider operations
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an ID token's signature, issuer, audience and expiry
    async fn verify_id_token(&self, id_token: &str) -> Result<ProviderToken, ProviderError>;

    /// Revoke every upstream session of `subject`
    async fn revoke_subject(&self, subject: &SubjectId) -> Result<(), ProviderError>;
}

#[async_trait]
impl<P: IdentityProvider + ?Sized> IdentityProvider for Arc<P> {
    async fn verify_id_token(&self, id_token: &str) -> Result<ProviderToken, ProviderError> {
        (**self).verify_id_token(id_token).await
    }

    async fn revoke_subject(&self, subject: &SubjectId) -> Result<(), ProviderError> {
        (**self).revoke_subject(subject).await
    }
}
