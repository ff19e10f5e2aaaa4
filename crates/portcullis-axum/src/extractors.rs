//! Axum extractors for the resolved session.
//!
//! These read what [`SessionGuardLayer`](crate::SessionGuardLayer) stored in
//! request extensions; they never decode cookies themselves.
//!
//! # Usage
//!
//! ```ignore
//! use portcullis_axum::{MaybeSession, RequireSession};
//!
//! // 401 without an authenticated session
//! async fn protected(session: RequireSession) -> String {
//!     format!("Hello, {}!", session.subject_id)
//! }
//!
//! // Anonymous and invalid sessions both arrive as `None`
//! async fn landing(session: MaybeSession) -> String {
//!     match session.0 {
//!         Some(ctx) => format!("Welcome back, {}!", ctx.subject_id),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use portcullis_types::SessionStatus;

use crate::context::{ResolvedSession, SessionContext};
use crate::error::SessionRejection;

/// Extractor that requires an authenticated session.
///
/// Rejects with `401` when the guard found no authenticated session, or when
/// no guard layer ran at all.
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionContext);

impl Deref for RequireSession {
    type Target = SessionContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<SessionContext>() {
            return Ok(Self(ctx.clone()));
        }
        if parts.extensions.get::<ResolvedSession>().is_none() {
            tracing::error!(
                path = %parts.uri.path(),
                "RequireSession used on a route without SessionGuardLayer"
            );
        }
        Err(SessionRejection::Unauthenticated)
    }
}

/// Extractor for an optional session.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionContext>);

impl Deref for MaybeSession {
    type Target = Option<SessionContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SessionContext>().cloned()))
    }
}

impl<S> FromRequestParts<S> for ResolvedSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    /// The guard outcome; `Anonymous` when no guard layer ran.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ResolvedSession>()
            .cloned()
            .unwrap_or(ResolvedSession(SessionStatus::Anonymous)))
    }
}
