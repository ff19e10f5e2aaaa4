//! Session revocation
//!
//! Revocation always ends the local session. An upstream failure is logged
//! and reported in the outcome but never turned into an error: the user must
//! be able to sign out while the provider is unavailable or slow. The
//! upstream call is bounded by a deadline.

use portcullis_types::SubjectId;
use std::sync::Arc;
use std::time::Duration;

use crate::codec::SessionCodec;
use crate::mapper::map_provider_code;
use crate::provider::{IdentityProvider, ProviderError};
use crate::AuthError;

/// Code reported when the provider misses the revocation deadline
const CODE_TIMEOUT: &str = "auth/network-request-failed";

/// What happened upstream during a revocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRevocation {
    /// Provider revoked the subject's sessions
    Revoked,
    /// No decodable session, nothing to revoke upstream
    Skipped,
    /// Provider call failed; local sign-out went ahead anyway
    Failed(AuthError),
}

/// Revocation result. The cookie must always be cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeOutcome {
    /// Always true: local sign-out cannot fail
    pub revoked: bool,
    /// Subject whose session was presented, if it decoded
    pub subject_id: Option<SubjectId>,
    pub upstream: UpstreamRevocation,
}

/// Revokes sessions upstream and locally
#[derive(Debug, Clone)]
pub struct SessionRevoker<P> {
    provider: P,
    codec: Arc<SessionCodec>,
    timeout: Duration,
}

impl<P: IdentityProvider> SessionRevoker<P> {
    pub fn new(provider: P, codec: Arc<SessionCodec>, timeout: Duration) -> Self {
        Self {
            provider,
            codec,
            timeout,
        }
    }

    /// Revoke the session carried by `cookie_value`.
    ///
    /// Idempotent: a missing or undecodable cookie is already signed out.
    pub async fn revoke(&self, cookie_value: Option<&str>) -> RevokeOutcome {
        let identity = match cookie_value.map(|value| self.codec.decode(value)) {
            Some(Ok(identity)) => identity,
            Some(Err(e)) => {
                tracing::debug!(reason = %e.reason, "Revoking undecodable session; nothing upstream");
                return Self::skipped();
            }
            None => return Self::skipped(),
        };

        let subject = identity.subject_id().clone();
        let call = tokio::time::timeout(self.timeout, self.provider.revoke_subject(&subject));
        let result = call.await.unwrap_or_else(|_| {
            Err(ProviderError::new(
                CODE_TIMEOUT,
                format!("revocation timed out after {:?}", self.timeout),
            ))
        });

        let upstream = match result {
            Ok(()) => {
                tracing::info!(subject_id = %subject, "Session revoked");
                UpstreamRevocation::Revoked
            }
            Err(e) => {
                let mapped = map_provider_code(&e.code);
                tracing::warn!(
                    subject_id = %subject,
                    code = %e.code,
                    error = %e.message,
                    "Upstream revocation failed; clearing local session anyway"
                );
                metrics::counter!("portcullis_upstream_revocation_failures_total").increment(1);
                UpstreamRevocation::Failed(mapped)
            }
        };

        RevokeOutcome {
            revoked: true,
            subject_id: Some(subject),
            upstream,
        }
    }

    fn skipped() -> RevokeOutcome {
        RevokeOutcome {
            revoked: true,
            subject_id: None,
            upstream: UpstreamRevocation::Skipped,
        }
    }
}
