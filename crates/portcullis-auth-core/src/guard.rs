//! Per-request session resolution
//!
//! `Unchecked -> Authenticated | Anonymous | Invalid`, once per request.
//! The guard only reads the cookie: it never re-mints or refreshes it, and
//! it makes no upstream calls.

use portcullis_types::SessionStatus;
use std::sync::Arc;

use crate::codec::SessionCodec;
use crate::identity::VerifiedIdentity;

/// Guard result with the decoded identity for downstream handlers
#[derive(Debug, Clone)]
pub struct Resolution {
    pub status: SessionStatus,
    /// Present exactly when `status` is `Authenticated`
    pub identity: Option<VerifiedIdentity>,
}

/// Resolves the session status of a request from its cookie
#[derive(Debug, Clone)]
pub struct AuthGuard {
    codec: Arc<SessionCodec>,
    cookie_name: String,
}

impl AuthGuard {
    pub fn new(codec: Arc<SessionCodec>, cookie_name: impl Into<String>) -> Self {
        Self {
            codec,
            cookie_name: cookie_name.into(),
        }
    }

    /// Name of the session cookie this guard reads
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Resolve from the session cookie value, if one was sent
    pub fn resolve(&self, cookie_value: Option<&str>) -> SessionStatus {
        self.resolve_with_identity(cookie_value).status
    }

    /// Resolve from a raw `Cookie` request header
    pub fn resolve_header(&self, cookie_header: Option<&str>) -> Resolution {
        let value = cookie_header.and_then(|header| find_cookie(header, &self.cookie_name));
        self.resolve_with_identity(value)
    }

    /// Resolve and keep the decoded identity
    pub fn resolve_with_identity(&self, cookie_value: Option<&str>) -> Resolution {
        let Some(value) = cookie_value else {
            metrics::counter!("portcullis_guard_resolutions_total", "status" => "anonymous")
                .increment(1);
            return Resolution {
                status: SessionStatus::Anonymous,
                identity: None,
            };
        };

        match self.codec.decode(value) {
            Ok(identity) => {
                metrics::counter!("portcullis_guard_resolutions_total", "status" => "authenticated")
                    .increment(1);
                Resolution {
                    status: SessionStatus::Authenticated(identity.subject_id().clone()),
                    identity: Some(identity),
                }
            }
            Err(e) => {
                tracing::warn!(
                    reason = %e.reason,
                    "Invalid session cookie presented (possible tampering or expiry)"
                );
                metrics::counter!(
                    "portcullis_guard_resolutions_total",
                    "status" => "invalid",
                    "reason" => e.reason.as_str()
                )
                .increment(1);
                Resolution {
                    status: SessionStatus::Invalid(e.reason),
                    identity: None,
                }
            }
        }
    }

    /// Protected routes admit only authenticated sessions
    pub fn permits(status: &SessionStatus) -> bool {
        status.is_authenticated()
    }
}

/// Find the value of cookie `name` in a `Cookie` header.
///
/// The first occurrence wins. Surrounding double quotes are stripped.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
    })
}
