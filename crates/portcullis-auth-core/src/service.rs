//! Auth service - ties together issuance, revocation and the guard

use std::sync::Arc;

use crate::clock::Clock;
use crate::codec::SessionCodec;
use crate::guard::AuthGuard;
use crate::issuance::{IssuedSession, SessionIssuer};
use crate::provider::IdentityProvider;
use crate::revocation::{RevokeOutcome, SessionRevoker};
use crate::verifier::CredentialVerifier;
use crate::{AuthConfig, ConfigError, IssueError};

/// Session authentication service
///
/// One provider, one signing key, one cookie name:
/// - issuance (ID token -> session cookie)
/// - revocation (upstream revoke + local clear)
/// - the per-request guard
pub struct AuthService<P> {
    config: AuthConfig,
    issuer: SessionIssuer<Arc<P>>,
    revoker: SessionRevoker<Arc<P>>,
    guard: AuthGuard,
}

impl<P: IdentityProvider> AuthService<P> {
    /// Create a service, validating `config` first
    pub fn new(config: AuthConfig, provider: Arc<P>) -> Result<Self, ConfigError> {
        let codec = SessionCodec::from_config(&config)?;
        Self::with_codec(config, provider, codec)
    }

    /// Create a service with a specific time source
    pub fn with_clock(
        config: AuthConfig,
        provider: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let codec = SessionCodec::from_config(&config)?.with_clock(clock);
        Self::with_codec(config, provider, codec)
    }

    fn with_codec(
        config: AuthConfig,
        provider: Arc<P>,
        codec: SessionCodec,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = Arc::new(codec);

        Ok(Self {
            issuer: SessionIssuer::new(
                CredentialVerifier::new(Arc::clone(&provider)),
                Arc::clone(&codec),
                config.session_ttl,
            ),
            revoker: SessionRevoker::new(provider, Arc::clone(&codec), config.revocation_timeout),
            guard: AuthGuard::new(codec, config.cookie_name.clone()),
            config,
        })
    }

    /// Exchange an ID token for a session cookie
    pub async fn issue(&self, id_token: &str) -> Result<IssuedSession, IssueError> {
        self.issuer.issue(id_token).await
    }

    /// Revoke the session carried by `cookie_value`
    pub async fn revoke(&self, cookie_value: Option<&str>) -> RevokeOutcome {
        self.revoker.revoke(cookie_value).await
    }

    /// The per-request guard
    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl<P> std::fmt::Debug for AuthService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
