//! Request cookies as a [`SessionStore`].
//!
//! The token key doubles as the cookie name, so the server-side gate observes
//! the same contract as the browser one: a value stored under the key means
//! the visitor may see the page.

use crate::{config::TokenKey, error::StoreError, store::SessionStore};
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use secrecy::SecretString;

/// Read-only view over the `Cookie` headers of one request.
#[derive(Debug, Clone, Copy)]
pub struct CookieStore<'a> {
    headers: &'a HeaderMap,
}

impl<'a> CookieStore<'a> {
    #[must_use]
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self { headers }
    }
}

impl SessionStore for CookieStore<'_> {
    fn get(&self, key: &TokenKey) -> Result<Option<SecretString>, StoreError> {
        // HTTP/2 clients may split cookies across several headers.
        // Only the matched value has to decode; other pairs may carry any bytes.
        for header in self.headers.get_all(COOKIE) {
            if let Some(raw) = find_cookie(header.as_bytes(), key.as_str().as_bytes()) {
                let token = std::str::from_utf8(raw).map_err(|_| StoreError::Unreadable)?;
                return Ok(Some(SecretString::from(token)));
            }
        }
        Ok(None)
    }
}

fn find_cookie<'h>(header: &'h [u8], name: &[u8]) -> Option<&'h [u8]> {
    header.split(|&b| b == b';').find_map(|pair| {
        let pair = pair.trim_ascii();
        let eq = pair.iter().position(|&b| b == b'=')?;
        let (key, value) = (&pair[..eq], &pair[eq + 1..]);
        (key.trim_ascii() == name).then_some(value.trim_ascii())
    })
}

/// Builds the `Set-Cookie` value that stores `token` under `key`.
///
/// Returns `None` when either part cannot be carried in a cookie.
#[must_use]
pub fn session_cookie(key: &TokenKey, token: &str, secure: bool) -> Option<HeaderValue> {
    if !is_cookie_name(key.as_str()) || !is_cookie_value(token) {
        return None;
    }
    let mut cookie = format!("{key}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Builds the `Set-Cookie` value that removes the token stored under `key`.
#[must_use]
pub fn clear_session_cookie(key: &TokenKey, secure: bool) -> Option<HeaderValue> {
    if !is_cookie_name(key.as_str()) {
        return None;
    }
    let mut cookie = format!("{key}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

// RFC 6265 `token`.
pub(crate) fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

// RFC 6265 `cookie-octet`, unquoted.
fn is_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn key(value: &str) -> TokenKey {
        match TokenKey::new(value) {
            Ok(key) => key,
            Err(err) => panic!("invalid test key: {err}"),
        }
    }

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(COOKIE, value);
            }
        }
        headers
    }

    fn read(headers: &HeaderMap, name: &str) -> Result<Option<String>, StoreError> {
        Ok(CookieStore::new(headers)
            .get(&key(name))?
            .map(|token| token.expose_secret().to_string()))
    }

    #[test]
    fn finds_named_cookie_among_others() -> Result<(), StoreError> {
        let headers = headers(&["theme=dark; ACCESS_TOKEN=xyz123; lang=en"]);
        assert_eq!(read(&headers, "ACCESS_TOKEN")?, Some("xyz123".to_string()));
        Ok(())
    }

    #[test]
    fn searches_every_cookie_header() -> Result<(), StoreError> {
        let headers = headers(&["theme=dark", "ACCESS_TOKEN=xyz123"]);
        assert_eq!(read(&headers, "ACCESS_TOKEN")?, Some("xyz123".to_string()));
        Ok(())
    }

    #[test]
    fn missing_cookie_is_absent() -> Result<(), StoreError> {
        assert_eq!(read(&headers(&[]), "ACCESS_TOKEN")?, None);
        assert_eq!(read(&headers(&["ACCESS_TOKENX=1"]), "ACCESS_TOKEN")?, None);
        Ok(())
    }

    #[test]
    fn empty_cookie_value_is_present() -> Result<(), StoreError> {
        let headers = headers(&["ACCESS_TOKEN="]);
        assert_eq!(read(&headers, "ACCESS_TOKEN")?, Some(String::new()));
        Ok(())
    }

    #[test]
    fn non_utf8_header_is_unreadable() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(b"ACCESS_TOKEN=\xff") {
            headers.insert(COOKIE, value);
        }
        assert_eq!(read(&headers, "ACCESS_TOKEN"), Err(StoreError::Unreadable));
    }

    #[test]
    fn foreign_bytes_in_other_cookies_are_ignored() -> Result<(), StoreError> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(b"name=Jos\xe9; ACCESS_TOKEN=xyz123") {
            headers.append(COOKIE, value);
        }
        assert_eq!(read(&headers, "ACCESS_TOKEN")?, Some("xyz123".to_string()));

        let mut split = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(b"name=Jos\xe9") {
            split.append(COOKIE, value);
        }
        split.append(COOKIE, HeaderValue::from_static("ACCESS_TOKEN=xyz123"));
        assert_eq!(read(&split, "ACCESS_TOKEN")?, Some("xyz123".to_string()));
        Ok(())
    }

    #[test]
    fn cookie_names_follow_token_grammar() {
        assert!(is_cookie_name("ACCESS_TOKEN"));
        assert!(!is_cookie_name("ACCESS TOKEN"));
        assert!(!is_cookie_name("A=B"));
        assert!(!is_cookie_name("clé"));
    }

    #[test]
    fn session_cookie_rejects_unsafe_parts() {
        assert!(session_cookie(&key("ACCESS_TOKEN"), "xyz123", false).is_some());
        assert!(session_cookie(&key("ACCESS_TOKEN"), "a;b", false).is_none());
        assert!(session_cookie(&key("ACCESS TOKEN"), "xyz123", false).is_none());
        assert!(clear_session_cookie(&key("ACCESS=TOKEN"), false).is_none());
    }

    #[test]
    fn session_cookie_sets_attributes() {
        let cookie = session_cookie(&key("ACCESS_TOKEN"), "xyz123", true);
        assert_eq!(
            cookie.as_ref().and_then(|v| v.to_str().ok()),
            Some("ACCESS_TOKEN=xyz123; Path=/; HttpOnly; SameSite=Lax; Secure")
        );
        let cleared = clear_session_cookie(&key("ACCESS_TOKEN"), false);
        assert_eq!(
            cleared.as_ref().and_then(|v| v.to_str().ok()),
            Some("ACCESS_TOKEN=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        );
    }
}
