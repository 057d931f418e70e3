//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
///
/// Missing, expired and cleared entries are not errors; reads report them
/// as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store is not usable in this host.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backing store rejected an operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Failed to serialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// An expiration could not be computed.
    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    /// The key is reserved for the expiration ledger.
    #[error("Key is reserved: {0}")]
    ReservedKey(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
