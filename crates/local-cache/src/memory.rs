//! In-process backends.
//!
//! Used natively (tests, the CLI) where no browser storage exists. The
//! cookie jar enforces `expires` against its clock the way a browser does,
//! so expired cookies disappear from the header.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use local_cache_core::{CacheError, Clock, SystemClock};
use serde::{Deserialize, Serialize};

use crate::cookie::parse_http_date;
use crate::storage::{CookieJar, DurableStore};

/// Durable store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            items: RefCell::new(entries),
        }
    }

    /// Copy of all entries.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl DurableStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// A cookie as held by [`MemoryCookieJar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    /// `None` for a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(true, |expires| expires > now)
    }
}

/// Cookie jar held in memory.
#[derive(Debug)]
pub struct MemoryCookieJar<C = SystemClock> {
    cookies: RefCell<Vec<StoredCookie>>,
    clock: C,
}

impl MemoryCookieJar<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryCookieJar<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryCookieJar<C> {
    /// Create an empty jar that checks expiry against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self::from_cookies(Vec::new(), clock)
    }

    /// Create a jar holding `cookies`.
    pub fn from_cookies(cookies: Vec<StoredCookie>, clock: C) -> Self {
        Self {
            cookies: RefCell::new(cookies),
            clock,
        }
    }

    /// Cookies that have not expired.
    pub fn live_cookies(&self) -> Vec<StoredCookie> {
        let now = self.clock.now();
        self.cookies
            .borrow()
            .iter()
            .filter(|cookie| cookie.is_live(now))
            .cloned()
            .collect()
    }
}

impl<C: Clock> CookieJar for MemoryCookieJar<C> {
    fn cookie_header(&self) -> Result<String, CacheError> {
        let pairs: Vec<String> = self
            .live_cookies()
            .into_iter()
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect();
        Ok(pairs.join("; "))
    }

    fn set_cookie(&self, cookie: &str) -> Result<(), CacheError> {
        let mut parts = cookie.split(';');
        let assignment = parts.next().unwrap_or_default();
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(CacheError::StoreError(format!(
                "cookie assignment without '=': {}",
                assignment
            )));
        };

        let mut expires = None;
        for attribute in parts {
            if let Some((attr, attr_value)) = attribute.trim().split_once('=') {
                if attr.eq_ignore_ascii_case("expires") {
                    expires = parse_http_date(attr_value.trim());
                }
            }
        }

        let name = name.trim().to_string();
        let now = self.clock.now();
        let mut cookies = self.cookies.borrow_mut();

        let incoming = StoredCookie {
            name,
            value: value.trim().to_string(),
            expires,
        };
        let existing = cookies.iter().position(|c| c.name == incoming.name);

        match (existing, incoming.is_live(now)) {
            (Some(index), true) => cookies[index] = incoming,
            (Some(index), false) => {
                cookies.remove(index);
            }
            (None, true) => cookies.push(incoming),
            (None, false) => {}
        }

        Ok(())
    }
}
