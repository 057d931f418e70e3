//! Expiring key-value cache over browser storage.
//!
//! Values are kept in a durable key-value store (`localStorage` in a
//! browser) with expirations tracked in a ledger entry, or in cookies when
//! no durable store is available or the caller asks for them.
//!
//! # Example
//!
//! ```rust,ignore
//! use local_cache::prelude::*;
//! use serde_json::json;
//!
//! let store = Some(MemoryStore::new());
//! let cache = CacheItem::new(store, MemoryCookieJar::new(), CacheConfig::default())?;
//!
//! // Keep a value for five days.
//! let five_days = CacheOptions::default().expires(ExpirySpec::default().with_days(5));
//! cache.set_with("favColor", "blue", &five_days)?;
//! assert_eq!(cache.get("favColor")?, Some(json!("blue")));
//!
//! // Store an array in cookies.
//! cache.set_with("cars", &json!([{"make": "Honda", "year": 2012}]), &CacheOptions::cookies())?;
//! let cars = cache.get_with("cars", &CacheOptions::cookies())?;
//!
//! // Clear a value.
//! cache.remove("favColor")?;
//! ```

mod cookie;
mod durable;
mod memory;
mod selector;
mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use cookie::{format_http_date, parse_http_date, CookieAdapter, HTTP_DATE_FORMAT};
pub use durable::DurableAdapter;
pub use memory::{MemoryCookieJar, MemoryStore, StoredCookie};
pub use selector::{BackendKind, CacheCall, CacheItem, CacheOptions, Capabilities};
pub use storage::{CookieJar, DurableStore};

pub use local_cache_core::{
    codec, CacheConfig, CacheError, Clock, ExpirationLedger, ExpirySpec, LedgerEntry,
    ManualClock, SystemClock,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CacheConfig, CacheError, CacheItem, CacheOptions, CookieJar, DurableStore, ExpirySpec,
        MemoryCookieJar, MemoryStore,
    };
}
