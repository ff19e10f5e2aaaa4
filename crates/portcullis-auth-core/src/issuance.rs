//! Session issuance: ID token in, signed session cookie out

use std::sync::Arc;
use std::time::Duration;

use crate::codec::{SessionCodec, SessionCookie};
use crate::identity::VerifiedIdentity;
use crate::provider::IdentityProvider;
use crate::verifier::CredentialVerifier;
use crate::IssueError;

/// Result of a successful issuance
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Cookie to attach to the response
    pub cookie: SessionCookie,
    /// Identity the cookie was minted for
    pub identity: VerifiedIdentity,
}

/// Exchanges identity credentials for session cookies.
///
/// No retries: a rejected credential is the caller's problem and is
/// returned immediately.
#[derive(Debug, Clone)]
pub struct SessionIssuer<P> {
    verifier: CredentialVerifier<P>,
    codec: Arc<SessionCodec>,
    ttl: Duration,
}

impl<P: IdentityProvider> SessionIssuer<P> {
    pub fn new(verifier: CredentialVerifier<P>, codec: Arc<SessionCodec>, ttl: Duration) -> Self {
        Self {
            verifier,
            codec,
            ttl,
        }
    }

    /// Verify `raw_credential` and mint a session cookie with the default ttl
    pub async fn issue(&self, raw_credential: &str) -> Result<IssuedSession, IssueError> {
        let identity = self.verifier.verify(raw_credential).await?;
        let cookie = self.codec.mint(&identity, self.ttl).map_err(|e| {
            tracing::error!(error = %e, "Session ttl rejected by codec");
            e
        })?;

        tracing::info!(
            subject_id = %cookie.subject_id,
            expires_at = %cookie.expires_at,
            "Session issued"
        );
        metrics::counter!("portcullis_sessions_issued_total").increment(1);

        Ok(IssuedSession { cookie, identity })
    }

    /// Lifetime given to issued sessions
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
