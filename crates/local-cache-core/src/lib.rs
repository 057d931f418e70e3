//! Core building blocks for the local-cache storage layer.
//!
//! This crate provides:
//! - `codec` - Value envelope encoding for text-only storage
//! - `ExpirationLedger` - Key to expiry index for stores without native TTLs
//! - `ExpirySpec` - Relative/absolute expiration resolution
//! - `escape` / `unescape` - Cookie-safe escaping
//! - `Clock` - Injectable time source
//! - `CacheConfig` - Shared configuration
//!
//! # Example
//!
//! ```ignore
//! use local_cache_core::{codec, ExpirationLedger};
//! use serde_json::json;
//!
//! let text = codec::encode(&json!({"make": "Honda"})).unwrap();
//! assert_eq!(codec::decode(&text), json!({"make": "Honda"}));
//!
//! let ledger = ExpirationLedger::parse("favColor^2030-01-01T00:00:00.000Z");
//! assert!(ledger.get("favColor").is_some());
//! ```

mod clock;
pub mod codec;
mod config;
mod error;
mod escape;
mod expiry;
mod ledger;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use escape::*;
pub use expiry::*;
pub use ledger::*;
