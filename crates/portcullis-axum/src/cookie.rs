//! `Set-Cookie` values for the session cookie.

use portcullis_auth_core::SessionCookie;

const COOKIE_ATTRIBUTES: &str = "HttpOnly; Secure; SameSite=Strict; Path=/";

/// `Set-Cookie` value that stores a freshly minted session.
pub fn session_set_cookie(name: &str, cookie: &SessionCookie) -> String {
    format!(
        "{name}={}; {COOKIE_ATTRIBUTES}; Max-Age={}",
        cookie.value,
        cookie.max_age().as_secs()
    )
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(name: &str) -> String {
    format!("{name}=; {COOKIE_ATTRIBUTES}; Max-Age=0")
}
