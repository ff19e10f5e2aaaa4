//! Health check handlers

use axum::extract::State;
use axum::Json;
use portcullis_auth_core::IdentityProvider;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub cookie_name: String,
    pub session_ttl_secs: u64,
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "session-api",
    })
}

/// GET /ready - Readiness probe
///
/// The service holds no connections; once state exists it can serve.
pub async fn ready<P: IdentityProvider + 'static>(
    State(state): State<AppState<P>>,
) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        status: "ready",
        service: "session-api",
        cookie_name: state.auth.cookie_name().to_string(),
        session_ttl_secs: state.auth.config().session_ttl.as_secs(),
    })
}
