//! Portcullis Axum Integration
//!
//! Axum middleware, extractors and cookie helpers for Portcullis sessions.
//!
//! # Overview
//!
//! - **Middleware**: [`SessionGuardLayer`] resolves the session cookie once
//!   per request and rejects unauthenticated requests on protected routes
//! - **Extractors**: [`RequireSession`], [`MaybeSession`], [`ResolvedSession`]
//! - **Cookies**: [`session_set_cookie`] and [`clear_session_cookie`]
//!
//! # Quick Start
//!
//! ```ignore
//! use portcullis_axum::{RequireSession, SessionGuardLayer};
//! use axum::{Router, routing::get};
//!
//! async fn me(session: RequireSession) -> String {
//!     format!("Hello, {}!", session.subject_id)
//! }
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .route_layer(SessionGuardLayer::new(auth.guard().clone()));
//! ```

pub mod context;
pub mod cookie;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::{ResolvedSession, SessionContext};
pub use cookie::{clear_session_cookie, session_set_cookie};
pub use error::SessionRejection;
pub use extractors::{MaybeSession, RequireSession};
pub use layer::{
    session_cookie_value, RejectMode, SessionGuardConfig, SessionGuardLayer, SessionGuardService,
};
