//! Handlers behind the session guard

use axum::Json;
use portcullis_axum::RequireSession;
use portcullis_types::Claims;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject_id: String,
    pub claims: Claims,
}

/// GET /api/me
///
/// The signed-in subject and its session claims
pub async fn me(RequireSession(session): RequireSession) -> Json<MeResponse> {
    Json(MeResponse {
        subject_id: session.subject_id.to_string(),
        claims: session.claims,
    })
}

/// GET /account
///
/// Minimal page route; browsers without a session are redirected to sign in
pub async fn account(session: RequireSession) -> String {
    format!("Signed in as {}", session.subject_id)
}
