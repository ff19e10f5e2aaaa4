//! Session resolution types

use serde::{Deserialize, Serialize};

use crate::SubjectId;

/// Why a presented session cookie was rejected.
///
/// Kept for logs and metrics only. Routing must treat every reason the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Not `payload.signature`, bad base64, or a payload that is not a session
    Malformed,
    /// HMAC did not match
    BadSignature,
    /// Signature fine but past `exp`
    Expired,
}

impl InvalidReason {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving the session for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SessionStatus {
    /// A valid, unexpired session cookie for this subject
    Authenticated(SubjectId),
    /// No session cookie at all
    Anonymous,
    /// A cookie was presented but failed verification
    Invalid(InvalidReason),
}

impl SessionStatus {
    /// Whether the request may reach a protected handler
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The authenticated subject, if any
    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Self::Authenticated(subject) => Some(subject),
            Self::Anonymous | Self::Invalid(_) => None,
        }
    }
}
