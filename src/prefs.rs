//! Persisted client preferences.
//!
//! The timezone preference outlives any single page view; it is stored in a
//! cookie with a five-year expiry and read back on every view load to
//! initialize the time-range picker.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Preference key for the IANA timezone name.
pub const TIMEZONE_KEY: &str = "timezone";

/// Key-value store for long-lived client preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str, expires: DateTime<Utc>);
}

/// Cookie-backed preference store scoped to one request/response cycle.
///
/// Values are read from the request's `Cookie` header; writes are queued as
/// `Set-Cookie` header values for the handler to attach to the response.
#[derive(Debug, Clone, Default)]
pub struct CookiePreferences {
    values: HashMap<String, String>,
    pending: Vec<String>,
}

impl CookiePreferences {
    /// Parse a `Cookie` request header, if any.
    pub fn from_header(header: Option<&str>) -> Self {
        let mut values = HashMap::new();

        if let Some(header) = header {
            for part in header.split(';') {
                if let Some((k, v)) = part.trim().split_once('=') {
                    values.insert(k.to_string(), v.to_string());
                }
            }
        }

        Self {
            values,
            pending: Vec::new(),
        }
    }

    /// `Set-Cookie` header values queued by [`PreferenceStore::set`].
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.pending
    }
}

impl PreferenceStore for CookiePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str, expires: DateTime<Utc>) {
        self.values.insert(key.to_string(), value.to_string());
        self.pending.push(format!(
            "{}={}; Expires={}; Path=/",
            key,
            value,
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        ));
    }
}

/// Expiry for the timezone preference: five years out.
pub fn timezone_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::days(5 * 365)
}
