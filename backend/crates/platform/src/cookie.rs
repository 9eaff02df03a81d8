//! Session Cookie Handling
//!
//! Builds Set-Cookie header values for the session cookie and parses
//! them back out of request headers. Also owns the `payload.signature`
//! wire format used for signed session tokens.

use axum::http::{HeaderMap, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Builder for a session Set-Cookie value. Always HttpOnly with
/// Path=/; the session cookie must never be script-readable.
#[derive(Debug)]
pub struct SessionCookie<'a> {
    name: &'a str,
    value: &'a str,
    secure: bool,
    same_site: SameSite,
    max_age_secs: Option<u64>,
    expired: bool,
}

impl<'a> SessionCookie<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            value,
            secure: true,
            same_site: SameSite::default(),
            max_age_secs: None,
            expired: false,
        }
    }

    /// A cookie that instructs the browser to drop the session
    pub fn removal(name: &'a str) -> Self {
        Self {
            expired: true,
            ..Self::new(name, "")
        }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn max_age(mut self, secs: u64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    pub fn to_header_value(&self) -> String {
        let mut parts = vec![
            format!("{}={}", self.name, self.value),
            "HttpOnly".to_string(),
            "Path=/".to_string(),
        ];

        if self.expired {
            parts.push("Max-Age=0".to_string());
            parts.push("Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string());
        } else if let Some(max_age) = self.max_age_secs {
            parts.push(format!("Max-Age={}", max_age));
        }

        if self.secure {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));

        parts.join("; ")
    }
}

/// Extract a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    for pair in raw.split(';') {
        match pair.trim().split_once('=') {
            Some((key, value)) if key == name => return Some(value.to_string()),
            _ => {}
        }
    }

    None
}

/// Join a cookie payload and its detached signature as `payload.signature`
pub fn join_signed(payload: &str, signature: &str) -> String {
    format!("{payload}.{signature}")
}

/// Split a `payload.signature` cookie value. Rejects values where
/// either half is empty; the payload itself must not contain a dot.
pub fn split_signed(value: &str) -> Option<(&str, &str)> {
    let (payload, signature) = value.split_once('.')?;

    if payload.is_empty() || signature.is_empty() || signature.contains('.') {
        return None;
    }

    Some((payload, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_header_value() {
        let cookie = SessionCookie::new("lms_session", "tok123")
            .secure(true)
            .same_site(SameSite::Lax)
            .max_age(3600)
            .to_header_value();

        assert!(cookie.starts_with("lms_session=tok123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_insecure_cookie_omits_secure_flag() {
        let cookie = SessionCookie::new("lms_session", "tok123")
            .secure(false)
            .to_header_value();

        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = SessionCookie::removal("lms_session").to_header_value();

        assert!(cookie.starts_with("lms_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; lms_session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "lms_session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_signed_value_roundtrip() {
        let value = join_signed("payload", "sig");
        assert_eq!(split_signed(&value), Some(("payload", "sig")));
    }

    #[test]
    fn test_split_signed_rejects_malformed() {
        assert_eq!(split_signed("no-dot"), None);
        assert_eq!(split_signed(".sig"), None);
        assert_eq!(split_signed("payload."), None);
        assert_eq!(split_signed("a.b.c"), None);
        assert_eq!(split_signed(""), None);
    }
}
