//! Durable-store adapter.
//!
//! Values live under their own keys; expirations are tracked in the
//! ledger entry. A value without a live ledger entry is discarded the
//! next time it is read.

use chrono::{DateTime, Utc};
use local_cache_core::{
    codec, CacheError, Clock, ExpirationLedger, SystemClock, DEFAULT_LEDGER_KEY,
};
use serde_json::Value;
use tracing::debug;

use crate::storage::DurableStore;

/// Cache adapter over a durable key-value store.
pub struct DurableAdapter<S, C = SystemClock> {
    store: S,
    clock: C,
    ledger_key: String,
}

impl<S: DurableStore> DurableAdapter<S, SystemClock> {
    /// Create an adapter using the wall clock and the default ledger key.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: DurableStore, C: Clock> DurableAdapter<S, C> {
    /// Create an adapter using `clock` and the default ledger key.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
        }
    }

    /// Keep the ledger under a different key.
    pub fn with_ledger_key(mut self, key: impl Into<String>) -> Self {
        self.ledger_key = key.into();
        self
    }

    /// Write `value` under `key`, expiring at `expires_at`.
    ///
    /// `Value::Null` deletes the entry and its tracked expiration. An
    /// `expires_at` that is not in the future stores the value untracked,
    /// so the next read discards it.
    pub fn set(
        &self,
        key: &str,
        value: &Value,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.check_key(key)?;

        match codec::encode(value) {
            None => {
                debug!(key, "clearing durable entry");
                self.store.remove_item(key)?;
                self.set_expiration(key, DateTime::UNIX_EPOCH)
            }
            Some(text) => {
                debug!(key, %expires_at, "writing durable entry");
                self.store.set_item(key, &text)?;
                self.set_expiration(key, expires_at)
            }
        }
    }

    /// Read the value stored under `key`.
    ///
    /// Returns `None` when the entry is missing, expired or untracked;
    /// expired and untracked entries are deleted.
    pub fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        self.check_key(key)?;

        let raw = match self.store.get_item(key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        let now = self.clock.now();
        match self.expiration_at(key, now)? {
            Some(expires_at) if now <= expires_at => Ok(Some(codec::decode(&raw))),
            _ => {
                debug!(key, "discarding expired durable entry");
                self.store.remove_item(key)?;
                Ok(None)
            }
        }
    }

    /// Delete `key` and its tracked expiration.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.set(key, &Value::Null, DateTime::UNIX_EPOCH)
    }

    /// Track `expires_at` for `key`, replacing any previous expiration.
    ///
    /// An instant that is not strictly in the future clears the key's
    /// expiration instead.
    pub fn set_expiration(&self, key: &str, expires_at: DateTime<Utc>) -> Result<(), CacheError> {
        let mut ledger = self.ledger()?;
        ledger.set(key, expires_at, self.clock.now());
        self.save_ledger(&ledger)
    }

    /// Expiration tracked for `key`.
    ///
    /// An expired entry is dropped from the ledger but its timestamp is
    /// still returned; callers compare it against the current time.
    pub fn get_expiration(&self, key: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        self.expiration_at(key, self.clock.now())
    }

    fn expiration_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, CacheError> {
        let mut ledger = self.ledger()?;
        let Some(expires_at) = ledger.get(key) else {
            return Ok(None);
        };

        if expires_at < now {
            ledger.remove(key);
            self.save_ledger(&ledger)?;
        }

        Ok(Some(expires_at))
    }

    /// Current ledger contents.
    pub fn ledger(&self) -> Result<ExpirationLedger, CacheError> {
        Ok(self
            .store
            .get_item(&self.ledger_key)?
            .map(|text| ExpirationLedger::parse(&text))
            .unwrap_or_default())
    }

    fn save_ledger(&self, ledger: &ExpirationLedger) -> Result<(), CacheError> {
        match ledger.render() {
            Some(text) => self.store.set_item(&self.ledger_key, &text),
            None => self.store.remove_item(&self.ledger_key),
        }
    }

    /// Delete every value whose tracked expiration has passed.
    ///
    /// Returns the removed keys in ledger order.
    pub fn purge_expired(&self) -> Result<Vec<String>, CacheError> {
        let now = self.clock.now();
        let mut ledger = self.ledger()?;
        let expired = ledger.expired(now);
        if expired.is_empty() {
            return Ok(Vec::new());
        }

        let mut removed = Vec::with_capacity(expired.len());
        for entry in expired {
            self.store.remove_item(&entry.key)?;
            ledger.remove(&entry.key);
            removed.push(entry.key);
        }
        self.save_ledger(&ledger)?;

        debug!(count = removed.len(), "purged expired durable entries");
        Ok(removed)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The key holding the ledger.
    pub fn ledger_key(&self) -> &str {
        &self.ledger_key
    }

    fn check_key(&self, key: &str) -> Result<(), CacheError> {
        if key == self.ledger_key {
            return Err(CacheError::ReservedKey(key.to_string()));
        }
        Ok(())
    }
}
