//! Portcullis Session API
//!
//! ## REST Endpoints
//!
//! - `POST /api/session` - Exchange an ID token for a session cookie
//! - `DELETE /api/session` - Revoke the current session (also `POST /api/session/revoke`)
//! - `GET /api/me` - Current subject (401 without a session)
//! - `GET /account` - Page route (303 to the sign-in path without a session)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use portcullis_auth_core::IdentityProvider;
use portcullis_axum::SessionGuardLayer;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{health, ready};
use crate::state::AppState;

/// Build the HTTP router
pub fn build_router<P: IdentityProvider + 'static>(
    state: AppState<P>,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let request_timeout = state.request_timeout();
    let guard = state.auth.guard().clone();

    // Session lifecycle routes (no guard: they read the cookie themselves).
    // Sign-out must always clear the cookie, so only issuance gets the request
    // timeout; the upstream revocation call carries its own deadline.
    let session_routes = Router::new()
        .route(
            "/api/session",
            post(handlers::issue_session::<P>)
                .layer(TimeoutLayer::new(request_timeout))
                .delete(handlers::revoke_session::<P>),
        )
        .route("/api/session/revoke", post(handlers::revoke_session::<P>));

    // Protected API routes
    let api_routes = Router::new()
        .route("/api/me", get(handlers::me))
        .route_layer(SessionGuardLayer::new(guard.clone()));

    // Protected page routes
    let page_routes = Router::new()
        .route("/account", get(handlers::account))
        .route_layer(SessionGuardLayer::redirecting(
            guard,
            state.config.sign_in_path.clone(),
        ));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready::<P>));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let guarded_routes = Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(TimeoutLayer::new(request_timeout));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Router::new()
        .merge(session_routes)
        .merge(guarded_routes)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

