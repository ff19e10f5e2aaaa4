//! Session context types.
//!
//! The [`SessionContext`] struct carries the authenticated subject to
//! request handlers.

use portcullis_auth_core::VerifiedIdentity;
use portcullis_types::{Claims, SessionStatus, SubjectId};

/// Authenticated session available to handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Subject the session cookie was minted for.
    pub subject_id: SubjectId,
    /// Claims carried in the session cookie.
    pub claims: Claims,
}

impl SessionContext {
    /// Create a context for `subject_id` with no claims.
    #[must_use]
    pub fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            claims: Claims::new(),
        }
    }

    /// Set the claims.
    #[must_use]
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }

    /// A single claim by name.
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.claims.get(name)
    }

    /// A string claim by name.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claim(name).and_then(serde_json::Value::as_str)
    }
}

impl From<VerifiedIdentity> for SessionContext {
    fn from(identity: VerifiedIdentity) -> Self {
        let (subject_id, claims) = identity.into_parts();
        Self { subject_id, claims }
    }
}

/// Guard outcome stored in request extensions for every request the layer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession(pub SessionStatus);
