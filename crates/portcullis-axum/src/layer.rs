//! Tower middleware layer that resolves the session of every request.
//!
//! [`SessionGuardLayer`] reads the session cookie, resolves it with an
//! [`AuthGuard`] and stores the outcome in request extensions: always a
//! [`ResolvedSession`], plus a [`SessionContext`] when authenticated. When a
//! session is required, anything but an authenticated session is rejected
//! before the inner service runs.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use pin_project_lite::pin_project;
use portcullis_auth_core::{find_cookie, AuthGuard};
use tower::{Layer, Service};

use crate::context::{ResolvedSession, SessionContext};
use crate::error::SessionRejection;

/// How a request without an authenticated session is turned away.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RejectMode {
    /// `401` with `{"error":"Unauthenticated"}`, for API routes.
    #[default]
    Unauthorized,
    /// `303` to the sign-in page, for page routes.
    Redirect {
        /// Path placed in `Location`.
        sign_in_path: String,
    },
}

impl RejectMode {
    fn rejection(&self) -> SessionRejection {
        match self {
            Self::Unauthorized => SessionRejection::Unauthenticated,
            Self::Redirect { sign_in_path } => SessionRejection::redirect(sign_in_path.as_str()),
        }
    }
}

/// Configuration for the session guard layer.
#[derive(Debug, Clone)]
pub struct SessionGuardConfig {
    /// Reject requests without an authenticated session.
    pub require_session: bool,
    /// Response for rejected requests.
    pub reject: RejectMode,
}

impl Default for SessionGuardConfig {
    fn default() -> Self {
        Self {
            require_session: true,
            reject: RejectMode::Unauthorized,
        }
    }
}

impl SessionGuardConfig {
    /// Create a new config builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether an authenticated session is required.
    #[must_use]
    pub fn require_session(mut self, require: bool) -> Self {
        self.require_session = require;
        self
    }

    /// Redirect rejected requests to `sign_in_path`.
    #[must_use]
    pub fn redirect_to(mut self, sign_in_path: impl Into<String>) -> Self {
        self.reject = RejectMode::Redirect {
            sign_in_path: sign_in_path.into(),
        };
        self
    }

    /// Answer rejected requests with `401`.
    #[must_use]
    pub fn unauthorized(mut self) -> Self {
        self.reject = RejectMode::Unauthorized;
        self
    }
}

/// Tower layer that resolves sessions from the session cookie.
#[derive(Clone)]
pub struct SessionGuardLayer {
    guard: Arc<AuthGuard>,
    config: SessionGuardConfig,
}

impl SessionGuardLayer {
    /// Require a session, answering `401` otherwise.
    #[must_use]
    pub fn new(guard: AuthGuard) -> Self {
        Self::with_config(guard, SessionGuardConfig::default())
    }

    /// Require a session, redirecting to `sign_in_path` otherwise.
    #[must_use]
    pub fn redirecting(guard: AuthGuard, sign_in_path: impl Into<String>) -> Self {
        Self::with_config(guard, SessionGuardConfig::new().redirect_to(sign_in_path))
    }

    /// Resolve sessions without rejecting anything.
    #[must_use]
    pub fn optional(guard: AuthGuard) -> Self {
        Self::with_config(guard, SessionGuardConfig::new().require_session(false))
    }

    /// Create a layer with custom configuration.
    #[must_use]
    pub fn with_config(guard: AuthGuard, config: SessionGuardConfig) -> Self {
        Self {
            guard: Arc::new(guard),
            config,
        }
    }
}

impl<S> Layer<S> for SessionGuardLayer {
    type Service = SessionGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionGuardService {
            inner,
            guard: Arc::clone(&self.guard),
            config: self.config.clone(),
        }
    }
}

/// The session guard service.
#[derive(Clone)]
pub struct SessionGuardService<S> {
    inner: S,
    guard: Arc<AuthGuard>,
    config: SessionGuardConfig,
}

/// Value of cookie `name` across all `Cookie` headers; the first match wins.
pub fn session_cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| find_cookie(value, name))
}

impl<S> Service<Request<Body>> for SessionGuardService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = SessionGuardFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let resolution = {
            let value = session_cookie_value(req.headers(), self.guard.cookie_name());
            self.guard.resolve_with_identity(value)
        };

        if self.config.require_session && !AuthGuard::permits(&resolution.status) {
            tracing::debug!(
                path = %req.uri().path(),
                status = ?resolution.status,
                "Request rejected by session guard"
            );
            return SessionGuardFuture {
                state: GuardState::Rejected {
                    response: Some(self.config.reject.rejection().into_response()),
                },
            };
        }

        if let Some(identity) = resolution.identity {
            req.extensions_mut().insert(SessionContext::from(identity));
        }
        req.extensions_mut()
            .insert(ResolvedSession(resolution.status));

        // The readied service handles this request; keep a fresh clone for the next.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        SessionGuardFuture {
            state: GuardState::Calling {
                future: inner.call(req),
            },
        }
    }
}

pin_project! {
    /// Future for the session guard service.
    pub struct SessionGuardFuture<F> {
        #[pin]
        state: GuardState<F>,
    }
}

pin_project! {
    #[project = GuardStateProj]
    enum GuardState<F> {
        Rejected {
            response: Option<Response>,
        },
        Calling {
            #[pin]
            future: F,
        },
    }
}

impl<F, E> Future for SessionGuardFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().state.project() {
            GuardStateProj::Rejected { response } => match response.take() {
                Some(response) => Poll::Ready(Ok(response)),
                None => panic!("polled after completion"),
            },
            GuardStateProj::Calling { future } => future.poll(cx),
        }
    }
}
