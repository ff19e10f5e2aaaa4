//! Portcullis Auth Core - Session authentication business logic
//!
//! Exchanges identity-provider ID tokens for signed session cookies,
//! verifies those cookies on every request, and revokes sessions.
//!
//! Components, leaf first:
//! - [`mapper`]: provider error codes to [`AuthError`]
//! - [`verifier`]: ID token to [`VerifiedIdentity`]
//! - [`codec`]: [`VerifiedIdentity`] to and from signed cookie values
//! - [`issuance`] / [`revocation`]: the two session use cases
//! - [`guard`]: per-request [`SessionStatus`](portcullis_types::SessionStatus) resolution

pub mod clock;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod identity;
pub mod issuance;
pub mod mapper;
pub mod provider;
pub mod revocation;
pub mod service;
pub mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{SessionCodec, SessionCookie, SessionPayload};
pub use config::*;
pub use crypto::{HmacKey, HmacKeyError};
pub use error::*;
pub use guard::{find_cookie, AuthGuard, Resolution};
pub use identity::VerifiedIdentity;
pub use issuance::{IssuedSession, SessionIssuer};
pub use mapper::map_provider_code;
pub use provider::{IdentityProvider, JwksIdentityProvider, ProviderError, ProviderToken};
pub use revocation::{RevokeOutcome, SessionRevoker, UpstreamRevocation};
pub use service::AuthService;
pub use verifier::CredentialVerifier;
