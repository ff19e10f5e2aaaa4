//! Auth errors

use portcullis_types::InvalidReason;
use std::time::Duration;
use thiserror::Error;

use crate::crypto::HmacKeyError;

/// Domain authentication errors.
///
/// Only the error mapper builds these from provider codes (the credential
/// verifier also short-circuits an empty credential to `InvalidCredential`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed or badly signed credential
    #[error("invalid credential")]
    InvalidCredential,

    /// Credential was valid but has expired
    #[error("credential expired")]
    CredentialExpired,

    /// The provider account is disabled
    #[error("user disabled")]
    UserDisabled,

    /// The provider has no such user
    #[error("user not found")]
    UserNotFound,

    /// The provider revoked the subject's sessions
    #[error("session revoked")]
    RevokedSession,

    /// Provider code this system does not know
    #[error("unknown provider error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredential
            | Self::CredentialExpired
            | Self::RevokedSession
            | Self::UserNotFound => 401,
            Self::UserDisabled => 403,
            Self::Unknown(_) => 502,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "InvalidCredential",
            Self::CredentialExpired => "CredentialExpired",
            Self::UserDisabled => "UserDisabled",
            Self::UserNotFound => "UserNotFound",
            Self::RevokedSession => "RevokedSession",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Configuration errors. Fatal; never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Session lifetime is zero or above the configured maximum
    #[error("session ttl {ttl:?} outside (0, {max:?}]")]
    TtlOutOfBounds { ttl: Duration, max: Duration },

    /// Session signing secret is unusable
    #[error("session secret: {0}")]
    SessionSecret(#[from] HmacKeyError),

    /// Anything else wrong with the configuration
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Session issuance failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// Credential verification failed; passed through unchanged
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Minting refused the configured ttl
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A session cookie that failed decoding.
///
/// The reason is for observability; callers treat every reason alike.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid session cookie ({reason})")]
pub struct InvalidSession {
    pub reason: InvalidReason,
}

impl InvalidSession {
    pub(crate) fn new(reason: InvalidReason) -> Self {
        Self { reason }
    }
}

impl From<InvalidReason> for InvalidSession {
    fn from(reason: InvalidReason) -> Self {
        Self::new(reason)
    }
}
