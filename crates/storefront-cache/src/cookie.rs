//! Request cookies and `Set-Cookie` responses.
//!
//! A [`CookieJar`] is built from the `Cookie` header of a request, mutated
//! by handlers and turned back into `Set-Cookie` headers for the response.
//! Clients replay those headers with [`CookieJar::apply_set_cookie`].

use std::collections::BTreeMap;

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::CacheError;

/// Thirty days, in seconds.
pub const DEFAULT_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
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

/// Attributes attached to a cookie when it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// Lifetime in seconds.
    pub max_age: i64,
    pub path: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            max_age: DEFAULT_MAX_AGE_SECS,
            path: "/".to_string(),
        }
    }
}

impl CookieOptions {
    /// Set the `Secure` flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the lifetime in days.
    pub fn max_age_days(mut self, days: u32) -> Self {
        self.max_age = i64::from(days) * 60 * 60 * 24;
        self
    }
}

/// A cookie queued for the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

impl SetCookie {
    /// Check if this entry deletes the cookie.
    pub fn is_removal(&self) -> bool {
        self.options.max_age <= 0
    }

    /// Render as a `Set-Cookie` header value.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}={}; Path={}; Max-Age={}",
            self.name, self.value, self.options.path, self.options.max_age
        );
        if self.options.http_only {
            out.push_str("; HttpOnly");
        }
        if self.options.secure {
            out.push_str("; Secure");
        }
        out.push_str("; SameSite=");
        out.push_str(self.options.same_site.as_str());
        out
    }
}

/// Cookies of one request/response exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
    #[serde(skip)]
    pending: Vec<SetCookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every `Cookie` header of a request.
    ///
    /// Pairs without `=` are skipped; the first occurrence of a name wins.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::new();
        for value in headers.get_all(COOKIE) {
            let Ok(raw) = value.to_str() else {
                tracing::debug!("skipping non-ASCII cookie header");
                continue;
            };
            for pair in raw.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    let name = name.trim();
                    if !name.is_empty() {
                        jar.cookies
                            .entry(name.to_string())
                            .or_insert_with(|| value.trim().to_string());
                    }
                }
            }
        }
        jar
    }

    /// Get a cookie value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Set a cookie and queue its `Set-Cookie` header.
    pub fn set(&mut self, name: &str, value: impl Into<String>, options: &CookieOptions) {
        let value = value.into();
        self.cookies.insert(name.to_string(), value.clone());
        self.queue(SetCookie {
            name: name.to_string(),
            value,
            options: options.clone(),
        });
    }

    /// Delete a cookie: an empty value with `Max-Age=0`.
    pub fn remove(&mut self, name: &str, options: &CookieOptions) {
        self.cookies.remove(name);
        self.queue(SetCookie {
            name: name.to_string(),
            value: String::new(),
            options: CookieOptions {
                max_age: 0,
                ..options.clone()
            },
        });
    }

    fn queue(&mut self, cookie: SetCookie) {
        // Only the last write of a name reaches the response.
        self.pending.retain(|c| c.name != cookie.name);
        self.pending.push(cookie);
    }

    /// Cookies queued for the response.
    pub fn pending(&self) -> &[SetCookie] {
        &self.pending
    }

    /// Check if anything was set or removed.
    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Render the queued cookies as response headers.
    pub fn set_cookie_headers(&self) -> Result<HeaderMap, CacheError> {
        let mut headers = HeaderMap::new();
        for cookie in &self.pending {
            let value = HeaderValue::from_str(&cookie.render())
                .map_err(|_| CacheError::InvalidHeader(cookie.name.clone()))?;
            headers.append(SET_COOKIE, value);
        }
        Ok(headers)
    }

    /// Render the stored cookies as a request `Cookie` header.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("; "))
    }

    /// Build request headers carrying the stored cookies.
    pub fn request_headers(&self) -> Result<HeaderMap, CacheError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = self.cookie_header() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|_| CacheError::InvalidHeader("Cookie".to_string()))?;
            headers.insert(COOKIE, value);
        }
        Ok(headers)
    }

    /// Apply `Set-Cookie` headers of a response, the way a browser does.
    ///
    /// `Max-Age=0` (or negative) deletes the cookie.
    pub fn apply_set_cookie(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            let mut parts = raw.split(';');
            let Some((name, value)) = parts.next().and_then(|p| p.trim().split_once('=')) else {
                continue;
            };
            let expired = parts.any(|attr| {
                attr.trim()
                    .split_once('=')
                    .filter(|(key, _)| key.eq_ignore_ascii_case("max-age"))
                    .and_then(|(_, age)| age.trim().parse::<i64>().ok())
                    .is_some_and(|age| age <= 0)
            });

            if expired {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }

    /// Iterate over stored cookies.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
