//! Expiration ledger.
//!
//! Stores without native TTL support keep a single index entry mapping
//! each expiring key to its absolute expiration:
//!
//! ```text
//! favColor^2026-10-24T09:00:00.000Z|cars^2026-10-20T00:00:00.000Z
//! ```
//!
//! The ledger is parsed into an ordered list, edited in memory and
//! rendered back to text only when it is persisted.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Default store key under which the ledger text is kept.
pub const DEFAULT_LEDGER_KEY: &str = "localStorageExpirations";

const PAIR_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = '^';

// `%Y` writes a leading sign past year 9999 and reads it back.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A tracked expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub key: String,
    pub expires_at: DateTime<Utc>,
}

/// Ordered index of key expirations.
///
/// Holds at most one entry per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpirationLedger {
    entries: Vec<LedgerEntry>,
}

impl ExpirationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse ledger text.
    ///
    /// Malformed pairs are dropped. A key repeated in the text keeps its
    /// first occurrence.
    pub fn parse(text: &str) -> Self {
        let mut ledger = Self::new();
        if text.is_empty() {
            return ledger;
        }

        for pair in text.split(PAIR_SEPARATOR) {
            let Some((key, stamp)) = pair.split_once(FIELD_SEPARATOR) else {
                warn!(pair, "dropping ledger pair without separator");
                continue;
            };
            let Some(expires_at) = parse_timestamp(stamp) else {
                warn!(pair, "dropping ledger pair with unreadable timestamp");
                continue;
            };
            let key = unescape_key(key);
            if ledger.get(&key).is_none() {
                ledger.entries.push(LedgerEntry { key, expires_at });
            }
        }

        ledger
    }

    /// Render ledger text, or `None` when there is nothing to persist.
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "{}{}{}",
                    escape_key(&entry.key),
                    FIELD_SEPARATOR,
                    format_timestamp(entry.expires_at)
                )
            })
            .collect();
        Some(pairs.join(&PAIR_SEPARATOR.to_string()))
    }

    /// Expiration tracked for `key`.
    pub fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.expires_at)
    }

    /// Stop tracking `key`.
    pub fn remove(&mut self, key: &str) -> Option<LedgerEntry> {
        let index = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.remove(index))
    }

    /// Replace the expiration for `key`.
    ///
    /// Any existing entry is removed; a new one is appended only when
    /// `expires_at` is strictly after `now`. Passing a past instant clears
    /// the key. Returns whether an entry was added.
    pub fn set(&mut self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.remove(key);
        if expires_at > now {
            self.entries.push(LedgerEntry {
                key: key.to_string(),
                expires_at,
            });
            true
        } else {
            false
        }
    }

    /// Entries whose expiration is strictly before `now`.
    pub fn expired(&self, now: DateTime<Utc>) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.expires_at < now)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Timestamp rendering used in ledger text.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written by [`format_timestamp`].
///
/// Any other RFC 3339 timestamp is accepted as well.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|at| at.with_timezone(&Utc)))
        .ok()
}

// Keys are written verbatim unless they contain a separator or '%'.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '%' => out.push_str("%25"),
            PAIR_SEPARATOR => out.push_str("%7C"),
            FIELD_SEPARATOR => out.push_str("%5E"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_key(key: &str) -> String {
    if !key.contains('%') {
        return key.to_string();
    }
    key.replace("%7C", "|")
        .replace("%5E", "^")
        .replace("%25", "%")
}
