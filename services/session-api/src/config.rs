//! Configuration for the session API service.

use portcullis_auth_core::{
    AuthConfig, DEFAULT_MAX_SESSION_TTL, DEFAULT_REVOCATION_TIMEOUT, DEFAULT_SESSION_TTL,
};
use std::time::Duration;

/// Session API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Where page routes send browsers without a session
    pub sign_in_path: String,

    /// Session core configuration
    pub auth: AuthConfig,

    /// Request timeout for API routes (sign-out routes are exempt)
    pub request_timeout: Duration,

    /// Serve Prometheus metrics on /metrics
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parse_u64 = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            var(name)
                .map(|v| v.parse().map_err(|_| ConfigError::Invalid(name)))
                .unwrap_or(Ok(default))
        };

        // Server
        let http_port = var("HTTP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        let sign_in_path = var("SIGN_IN_PATH").unwrap_or_else(|| "/sign-in".to_string());

        // Identity provider
        let issuer = var("IDP_ISSUER").ok_or(ConfigError::Missing("IDP_ISSUER"))?;
        let audience = var("IDP_AUDIENCE").ok_or(ConfigError::Missing("IDP_AUDIENCE"))?;

        // Session secret (minimum 32 bytes)
        let session_secret = var("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        // Session lifetimes
        let ttl_hours = parse_u64("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL.as_secs() / 3600)?;
        let max_ttl_hours =
            parse_u64("MAX_SESSION_TTL_HOURS", DEFAULT_MAX_SESSION_TTL.as_secs() / 3600)?;

        let request_timeout_secs = parse_u64("REQUEST_TIMEOUT_SECS", 30)?;
        let revocation_timeout_secs = parse_u64(
            "REVOCATION_TIMEOUT_SECS",
            DEFAULT_REVOCATION_TIMEOUT.as_secs(),
        )?;

        let metrics_enabled = var("METRICS_ENABLED")
            .map(|v| v.parse().unwrap_or(true))
            .unwrap_or(true);

        let mut auth = AuthConfig::new(session_secret, issuer, audience)
            .with_session_ttl(Duration::from_secs(ttl_hours.saturating_mul(3600)))
            .with_max_session_ttl(Duration::from_secs(max_ttl_hours.saturating_mul(3600)))
            .with_revocation_timeout(Duration::from_secs(revocation_timeout_secs));
        if let Some(name) = var("COOKIE_NAME") {
            auth = auth.with_cookie_name(name);
        }
        if let Some(url) = var("IDP_JWKS_URL") {
            auth = auth.with_jwks_url(url);
        }
        if let Some(url) = var("IDP_REVOCATION_URL") {
            auth = auth.with_revocation_url(url);
        }
        if let Some(token) = var("IDP_SERVICE_TOKEN") {
            auth = auth.with_service_token(token);
        }
        auth.validate()?;

        Ok(Self {
            http_port,
            sign_in_path,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(#[from] portcullis_auth_core::ConfigError),
}
