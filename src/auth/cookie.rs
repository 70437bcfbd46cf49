// Cookie adapter: writes and clears the session token cookie, reads it back

use axum::http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue};

/// Name of the cookie carrying the signed token
pub const TOKEN_COOKIE: &str = "token";

/// Default cookie lifetime: 15 minutes
pub const DEFAULT_COOKIE_MAX_AGE_SECONDS: i64 = 900;

/// Cookie attributes applied to every `Set-Cookie` this service emits.
/// SameSite is always `Strict`.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub http_only: bool,
    pub secure: bool,
    pub max_age_seconds: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            max_age_seconds: DEFAULT_COOKIE_MAX_AGE_SECONDS,
        }
    }
}

impl CookieConfig {
    /// `Set-Cookie` value storing `value` under `name`
    pub fn set(&self, name: &str, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.render(name, value, self.max_age_seconds))
    }

    /// `Set-Cookie` value that expires `name` immediately.
    /// Uses the same path and flags as [`CookieConfig::set`] so browsers match it.
    pub fn clear(&self, name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.render(name, "", 0))
    }

    fn render(&self, name: &str, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age);
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Strict");
        cookie
    }
}

/// Read a cookie from the request's `Cookie` headers. Empty values count as absent.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
