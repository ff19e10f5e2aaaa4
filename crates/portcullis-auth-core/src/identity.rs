//! Verified identity

use portcullis_types::{Claims, SubjectId};

/// A subject whose credential or session cookie passed verification.
///
/// Only the credential verifier and the session codec produce these.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    subject_id: SubjectId,
    claims: Claims,
}

impl VerifiedIdentity {
    pub(crate) fn new(subject_id: SubjectId, claims: Claims) -> Self {
        Self { subject_id, claims }
    }

    /// Build an identity without verifying anything.
    ///
    /// For fixtures in downstream tests and benches; requires the
    /// `test-support` feature.
    #[cfg(any(test, feature = "test-support"))]
    pub fn unverified(subject_id: SubjectId, claims: Claims) -> Self {
        Self::new(subject_id, claims)
    }

    /// The verified subject
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    /// Claims carried with the subject
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// A single claim by name
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.claims.get(name)
    }

    /// Split into subject and claims
    pub fn into_parts(self) -> (SubjectId, Claims) {
        (self.subject_id, self.claims)
    }
}
