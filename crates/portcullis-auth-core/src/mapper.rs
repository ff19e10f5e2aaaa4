//! Identity-provider error code mapping
//!
//! Providers report failures as string codes (`auth/id-token-expired`,
//! `user-disabled`, ...). This module is the only place those codes are
//! interpreted. The mapping is total: codes it does not know become
//! [`AuthError::Unknown`] carrying the raw code.

use crate::AuthError;

/// Prefix providers put in front of their auth error codes
const PROVIDER_PREFIX: &str = "auth/";

/// Every provider code this system handles, without the `auth/` prefix.
pub const KNOWN_PROVIDER_CODES: &[(&str, AuthErrorKind)] = &[
    ("invalid-id-token", AuthErrorKind::InvalidCredential),
    ("argument-error", AuthErrorKind::InvalidCredential),
    ("invalid-argument", AuthErrorKind::InvalidCredential),
    ("invalid-credential", AuthErrorKind::InvalidCredential),
    ("invalid-session-cookie", AuthErrorKind::InvalidCredential),
    ("id-token-expired", AuthErrorKind::CredentialExpired),
    ("session-cookie-expired", AuthErrorKind::CredentialExpired),
    ("user-token-expired", AuthErrorKind::CredentialExpired),
    ("user-disabled", AuthErrorKind::UserDisabled),
    ("user-not-found", AuthErrorKind::UserNotFound),
    ("id-token-revoked", AuthErrorKind::RevokedSession),
    ("session-cookie-revoked", AuthErrorKind::RevokedSession),
];

/// Field-less mirror of [`AuthError`] for the static code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredential,
    CredentialExpired,
    UserDisabled,
    UserNotFound,
    RevokedSession,
}

impl From<AuthErrorKind> for AuthError {
    fn from(kind: AuthErrorKind) -> Self {
        match kind {
            AuthErrorKind::InvalidCredential => Self::InvalidCredential,
            AuthErrorKind::CredentialExpired => Self::CredentialExpired,
            AuthErrorKind::UserDisabled => Self::UserDisabled,
            AuthErrorKind::UserNotFound => Self::UserNotFound,
            AuthErrorKind::RevokedSession => Self::RevokedSession,
        }
    }
}

/// Map a provider error code to a domain error.
///
/// Matching ignores surrounding whitespace, ASCII case and an optional
/// `auth/` prefix. Unrecognised codes keep their raw text.
pub fn map_provider_code(code: &str) -> AuthError {
    let normalized = code.trim().to_ascii_lowercase();
    let bare = normalized
        .strip_prefix(PROVIDER_PREFIX)
        .unwrap_or(&normalized);

    KNOWN_PROVIDER_CODES
        .iter()
        .find(|(known, _)| *known == bare)
        .map(|(_, kind)| AuthError::from(*kind))
        .unwrap_or_else(|| {
            tracing::debug!(code, "Unrecognised identity provider error code");
            AuthError::Unknown(code.to_string())
        })
}
