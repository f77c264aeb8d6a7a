//! Cookie attributes and cookie construction.

use axum::http::{header::COOKIE, HeaderMap};
use cookie::Cookie;
use time::{Duration, OffsetDateTime};

/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "sessions";

/// Attributes written on the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Domain` attribute.
    pub domain: Option<String>,
    /// `Expires` attribute. Unset means a browser-session cookie.
    pub expires: Option<OffsetDateTime>,
    /// `Max-Age` attribute.
    pub max_age: Option<Duration>,
    /// `Secure` flag.
    pub secure: bool,
    /// `HttpOnly` flag.
    pub http_only: bool,
}

impl CookieOptions {
    /// Create options with no attributes set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Build a cookie carrying `value` with these attributes.
    pub fn build(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value.to_string());
        if let Some(path) = &self.path {
            cookie.set_path(path.clone());
        }
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(expires) = self.expires {
            cookie.set_expires(expires);
        }
        if let Some(max_age) = self.max_age {
            cookie.set_max_age(max_age);
        }
        if self.secure {
            cookie.set_secure(true);
        }
        if self.http_only {
            cookie.set_http_only(true);
        }
        cookie
    }

    /// Build a cookie that is already expired at the time of writing.
    pub fn build_expired(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut cookie = self.build(name, value);
        cookie.set_expires(OffsetDateTime::now_utc());
        cookie.set_max_age(Duration::ZERO);
        cookie
    }
}

/// Find the value of cookie `name` in the request's `Cookie` headers.
///
/// The first occurrence wins. Unparseable pairs are skipped.
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Check that `name` is a valid cookie name (an RFC 6265 token).
pub fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_build_minimal() {
        let cookie = CookieOptions::new().build("sessions", "abc");
        assert_eq!(cookie.to_string(), "sessions=abc");
    }

    #[test]
    fn test_build_all_attributes() {
        let expires = OffsetDateTime::now_utc() + Duration::days(1);
        let options = CookieOptions::new()
            .with_path("/")
            .with_domain("example.com")
            .with_expires(expires)
            .with_max_age(Duration::hours(1))
            .secure(true)
            .http_only(true);

        let cookie = options.build("sid", "value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.max_age(), Some(Duration::hours(1)));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.expires_datetime().is_some());
    }

    #[test]
    fn test_build_expired() {
        let before = OffsetDateTime::now_utc();
        let cookie = CookieOptions::new().with_path("/").build_expired("sid", "value");

        assert_eq!(cookie.value(), "value");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        let expires = cookie.expires_datetime().unwrap();
        // Cookie dates have second precision.
        assert!(expires <= before + Duration::seconds(1));
    }

    #[test]
    fn test_find_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; sessions=abc123"));

        assert_eq!(find_cookie(&headers, "sessions"), Some("abc123".to_string()));
        assert_eq!(find_cookie(&headers, "theme"), Some("dark".to_string()));
        assert_eq!(find_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_find_cookie_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));

        assert_eq!(find_cookie(&headers, "b"), Some("2".to_string()));
    }

    #[test]
    fn test_find_cookie_no_header() {
        assert_eq!(find_cookie(&HeaderMap::new(), "sessions"), None);
    }

    #[test]
    fn test_valid_cookie_names() {
        assert!(is_valid_cookie_name("sessions"));
        assert!(is_valid_cookie_name("app_session-1"));
        assert!(is_valid_cookie_name("__Host-id"));
    }

    #[test]
    fn test_invalid_cookie_names() {
        assert!(!is_valid_cookie_name(""));
        assert!(!is_valid_cookie_name("my session"));
        assert!(!is_valid_cookie_name("séance"));
        assert!(!is_valid_cookie_name("a=b"));
        assert!(!is_valid_cookie_name("a;b"));
        assert!(!is_valid_cookie_name("(id)"));
    }
}
