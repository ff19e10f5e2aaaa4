//! Credential verification
//!
//! Turns a raw ID token into a [`VerifiedIdentity`], translating provider
//! failures through the error mapper. Every call verifies fresh.

use portcullis_types::SubjectId;

use crate::identity::VerifiedIdentity;
use crate::mapper::map_provider_code;
use crate::provider::IdentityProvider;
use crate::AuthError;

/// Verifies identity-provider credentials
#[derive(Debug, Clone)]
pub struct CredentialVerifier<P> {
    provider: P,
}

impl<P: IdentityProvider> CredentialVerifier<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Verify `raw_credential` with the provider.
    ///
    /// An empty credential fails with [`AuthError::InvalidCredential`]
    /// without an upstream call.
    pub async fn verify(&self, raw_credential: &str) -> Result<VerifiedIdentity, AuthError> {
        let credential = raw_credential.trim();
        if credential.is_empty() {
            tracing::debug!("Empty credential rejected");
            return Err(AuthError::InvalidCredential);
        }

        let token = self
            .provider
            .verify_id_token(credential)
            .await
            .map_err(|e| {
                let mapped = map_provider_code(&e.code);
                tracing::debug!(code = %e.code, error = ?mapped, "Credential verification failed");
                mapped
            })?;

        if token.uid.is_empty() {
            tracing::debug!("Provider accepted a token without a subject");
            return Err(AuthError::InvalidCredential);
        }

        Ok(VerifiedIdentity::new(SubjectId::new(token.uid), token.claims))
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
