//! Cookie-jar adapter.
//!
//! Cookies expire on their own, so no ledger is kept: every write carries
//! its absolute expiration in the `expires` attribute.

use chrono::{DateTime, NaiveDateTime, Utc};
use local_cache_core::{codec, escape, unescape, CacheError};
use serde_json::Value;
use tracing::debug;

use crate::storage::CookieJar;

/// `expires` attribute format, e.g. `Thu, 01 Jan 1970 00:00:00 GMT`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Render an instant as an HTTP date.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date written by [`format_http_date`].
pub fn parse_http_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Cache adapter over a cookie jar.
pub struct CookieAdapter<J> {
    jar: J,
    path: String,
}

impl<J: CookieJar> CookieAdapter<J> {
    /// Create an adapter writing cookies with `path=/`.
    pub fn new(jar: J) -> Self {
        Self::with_path(jar, "/")
    }

    /// Create an adapter writing cookies with the given path attribute.
    pub fn with_path(jar: J, path: impl Into<String>) -> Self {
        Self {
            jar,
            path: path.into(),
        }
    }

    /// Write `value` under `key`, expiring at `expires_at`.
    ///
    /// `Value::Null` deletes the cookie.
    pub fn set(
        &self,
        key: &str,
        value: &Value,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let name = escape(key);

        let cookie = match codec::encode(value) {
            None => {
                debug!(key, "clearing cookie");
                format!(
                    "{}=deleted; expires={}; path={}",
                    name,
                    format_http_date(DateTime::UNIX_EPOCH),
                    self.path
                )
            }
            Some(text) => {
                debug!(key, %expires_at, "writing cookie");
                format!(
                    "{}={}; expires={}; path={}",
                    name,
                    escape(&text),
                    format_http_date(expires_at),
                    self.path
                )
            }
        };

        self.jar.set_cookie(&cookie)
    }

    /// Read the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let header = self.jar.cookie_header()?;
        let name = escape(key);

        let raw = header
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| value);

        Ok(raw.map(|value| codec::decode(&unescape(value))))
    }

    /// Delete the cookie for `key`.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.set(key, &Value::Null, DateTime::UNIX_EPOCH)
    }

    /// The underlying jar.
    pub fn jar(&self) -> &J {
        &self.jar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCookieJar;
    use chrono::{Duration, TimeZone};
    use local_cache_core::ManualClock;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn adapter() -> (CookieAdapter<MemoryCookieJar<ManualClock>>, ManualClock) {
        let clock = ManualClock::new(now());
        (
            CookieAdapter::new(MemoryCookieJar::with_clock(clock.clone())),
            clock,
        )
    }

    #[test]
    fn test_http_date_format() {
        assert_eq!(
            format_http_date(DateTime::UNIX_EPOCH),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
        assert_eq!(parse_http_date(&format_http_date(now())), Some(now()));
    }

    #[test]
    fn test_http_date_past_year_9999() {
        let far = Utc.with_ymd_and_hms(10026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(parse_http_date(&format_http_date(far)), Some(far));
    }

    #[test]
    fn test_far_future_cookie_keeps_expiry() {
        let (adapter, _) = adapter();
        let far = Utc.with_ymd_and_hms(10026, 10, 19, 12, 0, 0).unwrap();
        adapter.set("color", &json!("blue"), far).unwrap();

        let cookies = adapter.jar().live_cookies();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].expires, Some(far));
        assert_eq!(adapter.get("color").unwrap(), Some(json!("blue")));
    }

    #[test]
    fn test_set_writes_escaped_cookie() {
        let (adapter, _) = adapter();
        adapter
            .set("fav color", &json!("deep blue"), now() + Duration::days(1))
            .unwrap();
        assert_eq!(adapter.jar().cookie_header().unwrap(), "fav%20color=deep%20blue");
    }

    #[test]
    fn test_get_round_trips_values() {
        let (adapter, _) = adapter();
        let later = now() + Duration::days(1);

        adapter.set("color", &json!("blue"), later).unwrap();
        adapter.set("count", &json!(15), later).unwrap();
        adapter
            .set("car", &json!({"make": "Honda", "year": 2012}), later)
            .unwrap();

        assert_eq!(adapter.get("color").unwrap(), Some(json!("blue")));
        assert_eq!(adapter.get("count").unwrap(), Some(json!(15)));
        assert_eq!(
            adapter.get("car").unwrap(),
            Some(json!({"make": "Honda", "year": 2012}))
        );
    }

    #[test]
    fn test_get_missing() {
        let (adapter, _) = adapter();
        adapter.set("other", &json!("x"), now() + Duration::days(1)).unwrap();
        assert_eq!(adapter.get("missing").unwrap(), None);
    }

    #[test]
    fn test_get_does_not_match_suffix() {
        let (adapter, _) = adapter();
        adapter.set("xcolor", &json!("red"), now() + Duration::days(1)).unwrap();
        assert_eq!(adapter.get("color").unwrap(), None);
    }

    #[test]
    fn test_null_deletes() {
        let (adapter, _) = adapter();
        adapter.set("color", &json!("blue"), now() + Duration::days(1)).unwrap();
        adapter.set("color", &Value::Null, now() + Duration::days(1)).unwrap();
        assert_eq!(adapter.get("color").unwrap(), None);
    }

    #[test]
    fn test_expired_cookie_is_absent() {
        let (adapter, clock) = adapter();
        adapter.set("color", &json!("blue"), now() + Duration::hours(1)).unwrap();
        clock.advance(Duration::hours(2));
        assert_eq!(adapter.get("color").unwrap(), None);
    }

    #[test]
    fn test_past_expiry_never_stored() {
        let (adapter, _) = adapter();
        adapter.set("color", &json!("blue"), now() - Duration::hours(1)).unwrap();
        assert_eq!(adapter.get("color").unwrap(), None);
    }
}
