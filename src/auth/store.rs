//! Session flag storage.
//!
//! The flag is a single key (`email`) holding the logged-in email. The gate
//! only sees it through [`SessionStore`], so the HTTP layer can back it with the
//! request cookies while tests use a plain map.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use std::collections::HashMap;
use tracing::error;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Key under which the logged-in email is persisted.
pub const SESSION_KEY: &str = "email";

pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn clear(&mut self, key: &str);
}

/// In-memory store, one per logical client.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Request-scoped store backed by the browser's cookies.
///
/// Reads come from the request `Cookie` header. Writes update the local view
/// and queue a `Set-Cookie` header; call [`CookieSession::response_headers`]
/// to attach them to the response.
#[derive(Debug, Default)]
pub struct CookieSession {
    cookies: HashMap<String, String>,
    pending: Vec<HeaderValue>,
    secure: bool,
}

impl CookieSession {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, secure: bool) -> Self {
        let mut cookies = HashMap::new();
        for header in headers.get_all(COOKIE) {
            let Ok(value) = header.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                let mut parts = pair.trim().splitn(2, '=');
                let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                    continue;
                };
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                cookies.insert(key.to_string(), decode_value(val.trim()));
            }
        }

        Self {
            cookies,
            pending: Vec::new(),
            secure,
        }
    }

    /// `Set-Cookie` headers produced by writes on this session.
    #[must_use]
    pub fn response_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in &self.pending {
            headers.append(SET_COOKIE, cookie.clone());
        }
        headers
    }

    fn queue(&mut self, cookie: String) {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => self.pending.push(value),
            Err(err) => error!("Failed to build session cookie: {err}"),
        }
    }

    fn attributes(&self) -> &'static str {
        if self.secure {
            "Path=/; HttpOnly; SameSite=Lax; Secure"
        } else {
            "Path=/; HttpOnly; SameSite=Lax"
        }
    }
}

impl SessionStore for CookieSession {
    fn get(&self, key: &str) -> Option<String> {
        self.cookies.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        let cookie = format!("{key}={}; {}", encode_value(value), self.attributes());
        self.queue(cookie);
        self.cookies.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        let cookie = format!("{key}=; {}; Max-Age=0", self.attributes());
        self.queue(cookie);
        self.cookies.remove(key);
    }
}

// Bytes outside the cookie-octet range, plus the ones with meaning in a
// cookie header or in percent-encoding itself.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'\\');

fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, COOKIE_VALUE).to_string()
}

fn decode_value(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
