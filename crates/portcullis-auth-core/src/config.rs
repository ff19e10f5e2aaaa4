//! Configuration types for the session core

use std::time::Duration;

use crate::crypto::HmacKey;
use crate::ConfigError;

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "__session";

/// Default session lifetime (5 days)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(5 * 24 * 60 * 60);

/// Default upper bound on any session lifetime (14 days)
pub const DEFAULT_MAX_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Default deadline for the upstream revocation call
pub const DEFAULT_REVOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Session core configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for session signing (at least 32 bytes)
    pub session_secret: String,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Lifetime given to every issued session
    pub session_ttl: Duration,
    /// Largest lifetime the codec will mint
    pub max_session_ttl: Duration,
    /// Expected `iss` of provider ID tokens
    pub issuer: String,
    /// Expected `aud` of provider ID tokens (the app's client/project id)
    pub audience: String,
    /// Provider JWKS endpoint
    pub jwks_url: String,
    /// Provider endpoint that revokes a subject's sessions
    pub revocation_url: String,
    /// Bearer credential for the revocation endpoint
    pub service_token: Option<String>,
    /// JWKS cache duration
    pub jwks_cache_duration: Duration,
    /// Longest wait for the provider during revocation
    pub revocation_timeout: Duration,
}

impl AuthConfig {
    /// Create a config with default lifetimes and cookie name
    pub fn new(
        session_secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        let issuer = issuer.into();
        Self {
            session_secret: session_secret.into(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_ttl: DEFAULT_SESSION_TTL,
            max_session_ttl: DEFAULT_MAX_SESSION_TTL,
            jwks_url: format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/')),
            revocation_url: format!("{}/sessions:revoke", issuer.trim_end_matches('/')),
            issuer,
            audience: audience.into(),
            service_token: None,
            jwks_cache_duration: Duration::from_secs(60 * 60),
            revocation_timeout: DEFAULT_REVOCATION_TIMEOUT,
        }
    }

    /// Create a config, validating the secret and lifetimes up front
    pub fn try_new(
        session_secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::new(session_secret, issuer, audience);
        config.validate()?;
        Ok(config)
    }

    /// Check the secret length and that `0 < session_ttl <= max_session_ttl`
    pub fn validate(&self) -> Result<(), ConfigError> {
        HmacKey::new(self.session_secret.as_bytes())?;
        if self.session_ttl.is_zero() || self.session_ttl > self.max_session_ttl {
            return Err(ConfigError::TtlOutOfBounds {
                ttl: self.session_ttl,
                max: self.max_session_ttl,
            });
        }
        if self.revocation_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "revocation timeout must be non-zero".to_string(),
            ));
        }
        if self.cookie_name.is_empty()
            || self
                .cookie_name
                .contains(|c: char| c == ';' || c == '=' || c == ',' || c.is_whitespace())
        {
            return Err(ConfigError::Invalid(format!(
                "cookie name {:?} is not a valid cookie token",
                self.cookie_name
            )));
        }
        Ok(())
    }

    /// Set the cookie name
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set session duration
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the maximum session duration
    pub fn with_max_session_ttl(mut self, max: Duration) -> Self {
        self.max_session_ttl = max;
        self
    }

    /// Override the JWKS URL
    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = url.into();
        self
    }

    /// Override the revocation URL
    pub fn with_revocation_url(mut self, url: impl Into<String>) -> Self {
        self.revocation_url = url.into();
        self
    }

    /// Set the bearer token used for revocation calls
    pub fn with_service_token(mut self, token: impl Into<String>) -> Self {
        self.service_token = Some(token.into());
        self
    }

    /// Set JWKS cache duration
    pub fn with_jwks_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    /// Set the upstream revocation deadline
    pub fn with_revocation_timeout(mut self, timeout: Duration) -> Self {
        self.revocation_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie_name", &self.cookie_name)
            .field("session_ttl", &self.session_ttl)
            .field("max_session_ttl", &self.max_session_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("jwks_url", &self.jwks_url)
            .field("revocation_url", &self.revocation_url)
            .field("revocation_timeout", &self.revocation_timeout)
            .finish_non_exhaustive()
    }
}
