//! Rejections for the session guard and extractors.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body of every 401 from the guard.
#[derive(Debug, Serialize)]
struct RejectionBody {
    error: &'static str,
}

/// Why a request was turned away before reaching its handler.
///
/// Anonymous and invalid sessions are rejected identically so callers
/// cannot tell a tampered cookie from a missing one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionRejection {
    /// API routes: no valid session.
    #[error("authentication required")]
    Unauthenticated,

    /// Page routes: send the browser to sign in.
    #[error("sign-in required")]
    SignInRedirect {
        /// Sign-in path placed in `Location`.
        location: String,
    },
}

impl SessionRejection {
    /// Create a redirect to `location`.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::SignInRedirect {
            location: location.into(),
        }
    }
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(RejectionBody {
                    error: "Unauthenticated",
                }),
            )
                .into_response(),
            Self::SignInRedirect { location } => match HeaderValue::from_str(&location) {
                Ok(location) => {
                    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
                }
                Err(_) => {
                    tracing::error!(location, "Sign-in path is not a valid header value");
                    Self::Unauthenticated.into_response()
                }
            },
        }
    }
}
