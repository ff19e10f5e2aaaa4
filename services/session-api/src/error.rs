//! Error types for the session API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portcullis_auth_core::{AuthError, IssueError};
use serde::Serialize;

/// API error body: `{"error":"<Kind>"}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::Auth(e) => Self::Auth(e),
            IssueError::Config(e) => Self::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BadRequest",
            Self::Auth(e) => e.error_code(),
            Self::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "Internal API error"),
            Self::Auth(AuthError::Unknown(code)) => {
                tracing::error!(code, "Identity provider returned an unknown error");
            }
            Self::Auth(e) => tracing::debug!(error = %e, "Sign-in rejected"),
            Self::BadRequest(_) => {}
        }

        (
            status,
            Json(ErrorResponse {
                error: self.error_code(),
            }),
        )
            .into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use portcullis_auth_core::ConfigError;

    #[test]
    fn test_auth_error_statuses() {
        let cases = [
            (AuthError::InvalidCredential, 401, "InvalidCredential"),
            (AuthError::CredentialExpired, 401, "CredentialExpired"),
            (AuthError::RevokedSession, 401, "RevokedSession"),
            (AuthError::UserNotFound, 401, "UserNotFound"),
            (AuthError::UserDisabled, 403, "UserDisabled"),
            (AuthError::Unknown("auth/odd".into()), 502, "Unknown"),
        ];
        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status_code().as_u16(), status);
            assert_eq!(api.error_code(), code);
        }
    }

    #[test]
    fn test_issue_config_error_is_internal() {
        let api = ApiError::from(IssueError::Config(ConfigError::Invalid("x".into())));
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error_code(), "Internal");
    }
}
