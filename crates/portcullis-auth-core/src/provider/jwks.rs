//! JWKS-backed identity provider
//!
//! Verifies RS256 ID tokens against the provider's published key set and
//! revokes subjects through the provider's admin endpoint. Failures are
//! reported as provider codes so they pass through the error mapper like
//! those of any other provider.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use portcullis_types::{Claims, SubjectId};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{IdentityProvider, ProviderError, ProviderToken};
use crate::AuthConfig;

const CODE_INVALID_ID_TOKEN: &str = "auth/invalid-id-token";
const CODE_ID_TOKEN_EXPIRED: &str = "auth/id-token-expired";
const CODE_USER_NOT_FOUND: &str = "auth/user-not-found";
const CODE_INTERNAL: &str = "auth/internal-error";
const CODE_NETWORK: &str = "auth/network-request-failed";

/// Registered JWT claims that are validated here and not passed on as claims
const REGISTERED_CLAIMS: &[&str] = &["sub", "iss", "aud", "exp", "iat", "nbf", "jti"];

/// Single cache slot holding the known key ids
const KIDS_CACHE_KEY: &str = "jwks";

/// JWKS (JSON Web Key Set) structure
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Individual JWK (JSON Web Key)
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub alg: Option<String>,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(flatten)]
    rest: Claims,
}

/// Identity provider speaking JWKS for verification and HTTP for revocation.
///
/// Unknown key ids are rejected without a refetch once a key set is cached.
#[derive(Clone)]
pub struct JwksIdentityProvider {
    config: AuthConfig,
    http_client: reqwest::Client,
    key_cache: Cache<String, Arc<DecodingKey>>,
    kids_cache: Cache<String, Arc<Vec<String>>>,
}

impl JwksIdentityProvider {
    /// Create a provider with a short-timeout HTTP client
    pub fn new(config: AuthConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(config, http_client)
    }

    /// Create a provider with a caller-supplied HTTP client
    pub fn with_client(config: AuthConfig, http_client: reqwest::Client) -> Self {
        let ttl = config.jwks_cache_duration;
        Self {
            config,
            http_client,
            key_cache: Cache::builder().time_to_live(ttl).max_capacity(100).build(),
            kids_cache: Cache::builder().time_to_live(ttl).max_capacity(1).build(),
        }
    }

    /// Drop cached keys so the next verification refetches the JWKS
    pub async fn invalidate_keys(&self) {
        self.key_cache.invalidate_all();
        self.kids_cache.invalidate_all();
    }

    async fn decoding_key(&self, kid: &str) -> Result<Arc<DecodingKey>, ProviderError> {
        if let Some(key) = self.key_cache.get(kid).await {
            return Ok(key);
        }

        if let Some(known) = self.kids_cache.get(KIDS_CACHE_KEY).await {
            if !known.iter().any(|k| k == kid) {
                tracing::debug!(kid, "Unknown key id not in cached JWKS");
                return Err(ProviderError::new(CODE_INVALID_ID_TOKEN, "unknown key id"));
            }
        }

        let jwks = self.fetch_jwks().await?;
        let kids: Vec<String> = jwks.keys.iter().map(|k| k.kid.clone()).collect();
        self.kids_cache
            .insert(KIDS_CACHE_KEY.to_string(), Arc::new(kids))
            .await;

        let mut found = None;
        for jwk in jwks.keys.iter().filter(|k| k.kty == "RSA") {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    let key = Arc::new(key);
                    if jwk.kid == kid {
                        found = Some(Arc::clone(&key));
                    }
                    self.key_cache.insert(jwk.kid.clone(), key).await;
                }
                Err(e) => tracing::warn!(kid = %jwk.kid, error = %e, "Skipping unusable JWK"),
            }
        }

        found.ok_or_else(|| ProviderError::new(CODE_INVALID_ID_TOKEN, "key id not in JWKS"))
    }

    async fn fetch_jwks(&self) -> Result<Jwks, ProviderError> {
        let url = &self.config.jwks_url;
        tracing::debug!(url, "Fetching JWKS");

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch JWKS");
            ProviderError::new(CODE_NETWORK, "failed to fetch JWKS")
        })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "JWKS fetch failed");
            return Err(ProviderError::new(CODE_INTERNAL, "JWKS endpoint error"));
        }

        response.json::<Jwks>().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse JWKS");
            ProviderError::new(CODE_INTERNAL, "unparseable JWKS")
        })
    }
}

#[async_trait]
impl IdentityProvider for JwksIdentityProvider {
    async fn verify_id_token(&self, id_token: &str) -> Result<ProviderToken, ProviderError> {
        let header = decode_header(id_token).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode ID token header");
            ProviderError::new(CODE_INVALID_ID_TOKEN, "malformed token header")
        })?;

        if header.alg != Algorithm::RS256 {
            return Err(ProviderError::new(
                CODE_INVALID_ID_TOKEN,
                "unexpected signing algorithm",
            ));
        }

        let kid = header
            .kid
            .ok_or_else(|| ProviderError::new(CODE_INVALID_ID_TOKEN, "token missing kid"))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let data = decode::<IdTokenClaims>(id_token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "ID token validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ProviderError::new(CODE_ID_TOKEN_EXPIRED, "token expired")
                }
                _ => ProviderError::new(CODE_INVALID_ID_TOKEN, e.to_string()),
            }
        })?;

        let IdTokenClaims { sub, mut rest } = data.claims;
        rest.retain(|name, _| !REGISTERED_CLAIMS.contains(&name.as_str()));

        Ok(ProviderToken {
            uid: sub,
            claims: rest,
        })
    }

    async fn revoke_subject(&self, subject: &SubjectId) -> Result<(), ProviderError> {
        let mut request = self
            .http_client
            .post(&self.config.revocation_url)
            .json(&serde_json::json!({ "sub": subject.as_str() }));
        if let Some(token) = &self.config.service_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Revocation request failed");
            ProviderError::new(CODE_NETWORK, "revocation request failed")
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(ProviderError::new(CODE_USER_NOT_FOUND, "no such subject"))
        } else {
            Err(ProviderError::new(
                CODE_INTERNAL,
                format!("revocation endpoint returned {status}"),
            ))
        }
    }
}

impl std::fmt::Debug for JwksIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksIdentityProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
