//! Session handlers (issue, revoke)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use portcullis_auth_core::IdentityProvider;
use portcullis_axum::{clear_session_cookie, session_cookie_value, session_set_cookie};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    /// ID token from the identity provider
    #[serde(default)]
    pub id_token: String,
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub status: &'static str,
    pub subject_id: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub revoked: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/session
///
/// Exchange an ID token for a session cookie
pub async fn issue_session<P: IdentityProvider + 'static>(
    State(state): State<AppState<P>>,
    body: Result<Json<IssueRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let issued = state.auth.issue(&req.id_token).await?;
    let cookie = session_set_cookie(state.auth.cookie_name(), &issued.cookie);

    let response = IssueResponse {
        status: "ok",
        subject_id: issued.cookie.subject_id.to_string(),
        expires_at: issued.cookie.expires_at.to_rfc3339(),
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// DELETE /api/session, POST /api/session/revoke
///
/// Revoke the current session. Always succeeds and always clears the cookie.
pub async fn revoke_session<P: IdentityProvider + 'static>(
    State(state): State<AppState<P>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let cookie_name = state.auth.cookie_name();
    let outcome = state
        .auth
        .revoke(session_cookie_value(&headers, cookie_name))
        .await;

    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(cookie_name))],
        Json(RevokeResponse {
            revoked: outcome.revoked,
        }),
    )
}
