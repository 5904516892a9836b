use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use chrono::DateTime;
use chrono::Utc;
use time::OffsetDateTime;

use crate::domain::session::models::SessionToken;

pub const SESSION_COOKIE_NAME: &str = "auth-session";

/// Reads and writes the session cookie.
///
/// The cookie carries the raw token; only its hash is stored server-side.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    secure: bool,
}

impl SessionCookies {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Token carried by the request, if any.
    pub fn session_token(&self, jar: &CookieJar) -> Option<SessionToken> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
            .map(SessionToken::new)
    }

    /// Write `token` with an expiry matching the session.
    pub fn set_session_token_cookie(
        &self,
        jar: CookieJar,
        token: &SessionToken,
        expires_at: DateTime<Utc>,
    ) -> CookieJar {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, token.as_str().to_string()))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/");

        // Out-of-range instants fall back to a browser-session cookie
        if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
            cookie = cookie.expires(expires);
        }

        jar.add(cookie)
    }

    /// Overwrite the cookie with an empty value that expires immediately.
    pub fn delete_session_token_cookie(&self, jar: CookieJar) -> CookieJar {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::ZERO);

        jar.add(cookie)
    }
}
