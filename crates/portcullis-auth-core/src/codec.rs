//! Session cookie codec
//!
//! Cookie value format: `base64url(payload_json) "." base64url(hmac_sha256(payload_b64))`.
//! Decoding parses the structure, checks the signature, then checks expiry.
//! Every failure collapses into [`InvalidSession`]; decoding never extends a
//! cookie's lifetime.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use portcullis_types::{Claims, InvalidReason, SubjectId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::crypto::HmacKey;
use crate::identity::VerifiedIdentity;
use crate::{AuthConfig, ConfigError, InvalidSession};

/// Signed session payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Subject id
    pub sub: String,
    /// Claims copied from the verified credential
    #[serde(default)]
    pub claims: Claims,
    /// Issue timestamp (milliseconds)
    pub iat: i64,
    /// Expiration timestamp (milliseconds)
    pub exp: i64,
}

/// A freshly minted session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Opaque signed value to place in the cookie
    pub value: String,
    /// Subject embedded in the signed payload
    pub subject_id: SubjectId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionCookie {
    /// Lifetime to advertise as `Max-Age`
    pub fn max_age(&self) -> Duration {
        (self.expires_at - self.issued_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Mints and decodes signed session cookies
#[derive(Clone)]
pub struct SessionCodec {
    key: HmacKey,
    max_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionCodec {
    /// Create a codec signing with `secret` (at least 32 bytes)
    pub fn new(secret: impl AsRef<[u8]>, max_ttl: Duration) -> Result<Self, ConfigError> {
        if max_ttl.is_zero() {
            return Err(ConfigError::TtlOutOfBounds {
                ttl: max_ttl,
                max: max_ttl,
            });
        }
        Ok(Self {
            key: HmacKey::new(secret)?,
            max_ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a codec from the session secret and maximum lifetime in `config`
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        Self::new(config.session_secret.as_bytes(), config.max_session_ttl)
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Largest ttl [`mint`](Self::mint) accepts
    pub fn max_ttl(&self) -> Duration {
        self.max_ttl
    }

    /// Mint a cookie for `identity` valid for `ttl`.
    ///
    /// `ttl` must be non-zero and at most the configured maximum.
    pub fn mint(
        &self,
        identity: &VerifiedIdentity,
        ttl: Duration,
    ) -> Result<SessionCookie, ConfigError> {
        let out_of_bounds = || ConfigError::TtlOutOfBounds {
            ttl,
            max: self.max_ttl,
        };
        if ttl.is_zero() || ttl > self.max_ttl {
            return Err(out_of_bounds());
        }

        let now = self.clock.now();
        // Millisecond precision so the payload and the returned times agree.
        let issued_at = DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        let expires_at = ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(out_of_bounds)?;

        let payload = SessionPayload {
            sub: identity.subject_id().to_string(),
            claims: identity.claims().clone(),
            iat: issued_at.timestamp_millis(),
            exp: expires_at.timestamp_millis(),
        };

        Ok(SessionCookie {
            value: self.sign_payload(&payload)?,
            subject_id: identity.subject_id().clone(),
            issued_at,
            expires_at,
        })
    }

    /// Verify and decode a cookie value.
    pub fn decode(&self, value: &str) -> Result<VerifiedIdentity, InvalidSession> {
        let payload = self.decode_payload(value).map_err(|reason| {
            tracing::debug!(%reason, "Session cookie rejected");
            InvalidSession::from(reason)
        })?;
        Ok(VerifiedIdentity::new(
            SubjectId::new(payload.sub),
            payload.claims,
        ))
    }

    fn decode_payload(&self, value: &str) -> Result<SessionPayload, InvalidReason> {
        // (a) structure
        let (payload_b64, signature_b64) =
            value.rsplit_once('.').ok_or(InvalidReason::Malformed)?;
        if payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(InvalidReason::Malformed);
        }
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| InvalidReason::Malformed)?;

        // (b) integrity
        if !self.key.verify(payload_b64.as_bytes(), &signature) {
            return Err(InvalidReason::BadSignature);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| InvalidReason::Malformed)?;
        let payload: SessionPayload =
            serde_json::from_slice(&payload_json).map_err(|_| InvalidReason::Malformed)?;
        if payload.sub.is_empty() {
            return Err(InvalidReason::Malformed);
        }

        // (c) expiry
        if self.clock.now().timestamp_millis() >= payload.exp {
            return Err(InvalidReason::Expired);
        }

        Ok(payload)
    }

    fn sign_payload(&self, payload: &SessionPayload) -> Result<String, ConfigError> {
        let payload_json = serde_json::to_vec(payload).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize session payload");
            ConfigError::Invalid(format!("unserializable session claims: {e}"))
        })?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json);
        let signature = URL_SAFE_NO_PAD.encode(self.key.sign(payload_b64.as_bytes()));
        Ok(format!("{payload_b64}.{signature}"))
    }
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("max_ttl", &self.max_ttl)
            .finish_non_exhaustive()
    }
}
