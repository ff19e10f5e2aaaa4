//! Session guard layer behaviour on a real axum router

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use portcullis_auth_core::{AuthGuard, ManualClock, SessionCodec, VerifiedIdentity};
use portcullis_axum::{MaybeSession, RequireSession, ResolvedSession, SessionGuardLayer};
use portcullis_types::{Claims, SessionStatus, SubjectId};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "axum-test-secret-0123456789abcdef";

fn codec() -> Arc<SessionCodec> {
    Arc::new(SessionCodec::new(SECRET, Duration::from_secs(86_400)).unwrap())
}

fn mint(codec: &SessionCodec, sub: &str) -> String {
    let mut claims = Claims::new();
    claims.insert("email".to_string(), serde_json::json!(format!("{sub}@example.com")));
    let identity = VerifiedIdentity::unverified(SubjectId::new(sub), claims);
    codec.mint(&identity, Duration::from_secs(600)).unwrap().value
}

async fn me(session: RequireSession) -> String {
    format!(
        "{} {}",
        session.subject_id,
        session.claim_str("email").unwrap_or("-")
    )
}

async fn landing(session: MaybeSession, ResolvedSession(status): ResolvedSession) -> String {
    match (session.0, status) {
        (Some(ctx), _) => format!("hello {}", ctx.subject_id),
        (None, SessionStatus::Invalid(reason)) => format!("guest ({reason})"),
        (None, _) => "guest".to_string(),
    }
}

fn app(codec: Arc<SessionCodec>) -> Router {
    let guard = AuthGuard::new(codec, "__session");

    let api = Router::new()
        .route("/api/me", get(me))
        .route_layer(SessionGuardLayer::new(guard.clone()));
    let pages = Router::new()
        .route("/account", get(me))
        .route_layer(SessionGuardLayer::redirecting(guard.clone(), "/sign-in"));
    let public = Router::new()
        .route("/", get(landing))
        .route_layer(SessionGuardLayer::optional(guard));

    api.merge(pages).merge(public)
}

fn request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_authenticated_request_reaches_handler() {
    let codec = codec();
    let value = mint(&codec, "user-1");

    let response = app(codec)
        .oneshot(request("/api/me", Some(&format!("theme=dark; __session={value}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "user-1 user-1@example.com");
}

#[tokio::test]
async fn test_missing_and_invalid_sessions_get_identical_401() {
    let codec = codec();
    let value = mint(&codec, "user-1");
    let tampered = format!("{}x", value);

    let mut bodies = Vec::new();
    for cookie in [None, Some("__session=garbage".to_string()), Some(format!("__session={tampered}"))] {
        let response = app(Arc::clone(&codec))
            .oneshot(request("/api/me", cookie.as_deref()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(body_string(response).await);
    }

    assert!(bodies.iter().all(|b| b == r#"{"error":"Unauthenticated"}"#));
}

#[tokio::test]
async fn test_page_routes_redirect_to_sign_in() {
    let response = app(codec())
        .oneshot(request("/account", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/sign-in");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let identity = VerifiedIdentity::unverified(SubjectId::new("user-1"), Claims::new());
    let an_hour_ago = ManualClock::new(chrono::Utc::now() - chrono::Duration::hours(1));
    let minting = SessionCodec::new(SECRET, Duration::from_secs(86_400))
        .unwrap()
        .with_clock(Arc::new(an_hour_ago));
    let cookie = minting.mint(&identity, Duration::from_secs(60)).unwrap();

    let response = app(codec())
        .oneshot(request("/api/me", Some(&format!("__session={}", cookie.value))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_optional_guard_never_rejects() {
    let codec = codec();
    let value = mint(&codec, "user-9");
    let router = app(codec);

    let response = router.clone().oneshot(request("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "guest");

    let response = router
        .clone()
        .oneshot(request("/", Some("__session=nope")))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "guest (malformed)");

    let response = router
        .oneshot(request("/", Some(&format!("__session={value}"))))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "hello user-9");
}

#[tokio::test]
async fn test_guard_does_not_set_cookies() {
    let codec = codec();
    let value = mint(&codec, "user-1");

    let response = app(codec)
        .oneshot(request("/api/me", Some(&format!("__session={value}"))))
        .await
        .unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}
