//! Cache configuration.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::{CacheError, ExpirySpec, DEFAULT_LEDGER_KEY};

/// Settings shared by both storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Durable-store key holding the expiration ledger.
    pub ledger_key: String,

    /// Path attribute written on cookies.
    pub cookie_path: String,

    /// Offset used for midnight and calendar arithmetic, in minutes east
    /// of UTC.
    pub utc_offset_minutes: i32,

    /// Lifetime applied when a write carries no expiration.
    pub default_expires: ExpirySpec,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
            cookie_path: "/".to_string(),
            utc_offset_minutes: 0,
            default_expires: ExpirySpec::one_day(),
        }
    }
}

impl CacheConfig {
    /// Set the ledger key.
    pub fn with_ledger_key(mut self, key: impl Into<String>) -> Self {
        self.ledger_key = key.into();
        self
    }

    /// Set the default expiration.
    pub fn with_default_expires(mut self, spec: ExpirySpec) -> Self {
        self.default_expires = spec;
        self
    }

    /// Set the calendar offset.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Calendar offset as a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset, CacheError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                CacheError::Config(format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Check the configuration for values the adapters cannot work with.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.ledger_key.is_empty() {
            return Err(CacheError::Config("ledger_key must not be empty".into()));
        }
        if self.ledger_key.contains(['|', '^']) {
            return Err(CacheError::Config(format!(
                "ledger_key must not contain '|' or '^': {}",
                self.ledger_key
            )));
        }
        if !self.cookie_path.starts_with('/') {
            return Err(CacheError::Config(format!(
                "cookie_path must start with '/': {}",
                self.cookie_path
            )));
        }
        self.offset()?;
        Ok(())
    }
}
