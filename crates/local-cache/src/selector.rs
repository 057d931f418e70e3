//! Backend selection and the `cache_item` entry point.

use chrono::{DateTime, FixedOffset, Utc};
use local_cache_core::{
    codec, resolve_expiration, CacheConfig, CacheError, Clock, ExpirySpec, SystemClock,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cookie::CookieAdapter;
use crate::durable::DurableAdapter;
use crate::storage::{CookieJar, DurableStore};

/// Which backend serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The persistent key-value store, with ledger-tracked expirations.
    DurableStore,
    /// The cookie jar, with browser-enforced expirations.
    CookieJar,
}

impl BackendKind {
    /// Pick a backend: cookies when forced or when no durable store exists.
    pub fn select(use_cookies: bool, capabilities: Capabilities) -> Self {
        if use_cookies || !capabilities.durable_store {
            Self::CookieJar
        } else {
            Self::DurableStore
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DurableStore => write!(f, "durable store"),
            Self::CookieJar => write!(f, "cookie jar"),
        }
    }
}

/// Storage facilities present in the host. Cookies are assumed always
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub durable_store: bool,
}

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheOptions {
    /// Force the cookie jar even when a durable store exists.
    pub use_cookies: bool,
    /// Expiration for writes; the configured default applies when absent.
    #[serde(alias = "expire", skip_serializing_if = "Option::is_none")]
    pub expires: Option<ExpirySpec>,
}

impl CacheOptions {
    /// Options forcing the cookie jar.
    pub fn cookies() -> Self {
        Self {
            use_cookies: true,
            expires: None,
        }
    }

    /// Set the expiration.
    pub fn expires(mut self, spec: ExpirySpec) -> Self {
        self.expires = Some(spec);
        self
    }

    /// Options from a loosely typed call argument.
    ///
    /// A falsy argument (`null`, `false`, `0`, `""`) counts as absent.
    pub fn from_argument(argument: Option<Value>) -> Result<Option<Self>, CacheError> {
        match argument {
            Some(value) if codec::is_truthy(&value) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }
}

/// A `cache_item` call after working out whether it reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheCall {
    Get { use_cookies: bool },
    Set { value: Value, options: CacheOptions },
}

impl CacheCall {
    /// Classify call arguments.
    ///
    /// A key alone is a read, as is a key with a single object argument
    /// whose `useCookies` is truthy. Everything else writes; a missing
    /// value alongside options writes `Null`, which deletes.
    pub fn classify(value: Option<Value>, options: Option<CacheOptions>) -> Self {
        match (value, options) {
            (None, None) => Self::Get { use_cookies: false },
            (Some(Value::Object(fields)), None)
                if fields.get("useCookies").is_some_and(codec::is_truthy) =>
            {
                Self::Get { use_cookies: true }
            }
            (value, options) => Self::Set {
                value: value.unwrap_or(Value::Null),
                options: options.unwrap_or_default(),
            },
        }
    }
}

/// Expiring cache over a durable store with cookie fallback.
///
/// # Example
///
/// ```rust,ignore
/// let store = Some(MemoryStore::new());
/// let cache = CacheItem::new(store, MemoryCookieJar::new(), CacheConfig::default())?;
///
/// let five_days = CacheOptions::default().expires(ExpirySpec::default().with_days(5));
/// cache.set_with("favColor", "blue", &five_days)?;
/// let color = cache.get("favColor")?;
/// ```
pub struct CacheItem<S, J, C = SystemClock> {
    durable: Option<DurableAdapter<S, C>>,
    cookies: CookieAdapter<J>,
    clock: C,
    config: CacheConfig,
    offset: FixedOffset,
}

impl<S: DurableStore, J: CookieJar> CacheItem<S, J, SystemClock> {
    /// Create a cache using the wall clock.
    ///
    /// Pass `None` for `durable` when the host has no durable store.
    pub fn new(durable: Option<S>, jar: J, config: CacheConfig) -> Result<Self, CacheError> {
        Self::with_clock(durable, jar, SystemClock, config)
    }
}

impl<S, J, C> CacheItem<S, J, C>
where
    S: DurableStore,
    J: CookieJar,
    C: Clock + Clone,
{
    /// Create a cache using `clock`.
    pub fn with_clock(
        durable: Option<S>,
        jar: J,
        clock: C,
        config: CacheConfig,
    ) -> Result<Self, CacheError> {
        config.validate()?;
        let offset = config.offset()?;

        let durable = durable.map(|store| {
            DurableAdapter::with_clock(store, clock.clone()).with_ledger_key(&config.ledger_key)
        });
        let cookies = CookieAdapter::with_path(jar, &config.cookie_path);

        let cache = Self {
            durable,
            cookies,
            clock,
            config,
            offset,
        };
        debug!(backend = %cache.backend(), "cache initialized");
        Ok(cache)
    }

    /// Storage facilities this cache was built with.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            durable_store: self.durable.is_some(),
        }
    }

    /// Backend used when a call does not force cookies.
    pub fn backend(&self) -> BackendKind {
        BackendKind::select(false, self.capabilities())
    }

    /// Single entry point: reads or writes depending on the arguments.
    ///
    /// ```text
    /// cache_item(key, None, None)                        -> read
    /// cache_item(key, Some({"useCookies": true}), None)  -> read from cookies
    /// cache_item(key, Some(value), None)                 -> write, default expiry
    /// cache_item(key, Some(value), Some(options))        -> write
    /// cache_item(key, Some(Null), _)                     -> delete
    /// ```
    ///
    /// Writes return `Ok(None)`.
    pub fn cache_item(
        &self,
        key: &str,
        value: Option<Value>,
        options: Option<CacheOptions>,
    ) -> Result<Option<Value>, CacheError> {
        match CacheCall::classify(value, options) {
            CacheCall::Get { use_cookies } => self.get_from(key, self.select(use_cookies)),
            CacheCall::Set { value, options } => {
                self.write(key, &value, &options)?;
                Ok(None)
            }
        }
    }

    /// Read `key` from the preferred backend.
    pub fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        self.get_from(key, self.backend())
    }

    /// Read `key`, honoring `options.use_cookies`.
    pub fn get_with(&self, key: &str, options: &CacheOptions) -> Result<Option<Value>, CacheError> {
        self.get_from(key, self.select(options.use_cookies))
    }

    /// Read `key` and deserialize it.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Read `key` from a specific backend.
    pub fn get_from(&self, key: &str, backend: BackendKind) -> Result<Option<Value>, CacheError> {
        debug!(key, %backend, "cache get");
        match backend {
            BackendKind::DurableStore => self.durable()?.get(key),
            BackendKind::CookieJar => self.cookies.get(key),
        }
    }

    /// Write `value` with the default expiration.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_with(key, value, &CacheOptions::default())
    }

    /// Write `value` with explicit options.
    pub fn set_with<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &CacheOptions,
    ) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        self.write(key, &value, options)
    }

    /// Delete `key` from the preferred backend.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.write(key, &Value::Null, &CacheOptions::default())
    }

    /// Delete `key`, honoring `options.use_cookies`.
    pub fn remove_with(&self, key: &str, options: &CacheOptions) -> Result<(), CacheError> {
        self.write(key, &Value::Null, options)
    }

    /// Absolute expiration a write with `options` would receive now.
    pub fn expiration_for(&self, options: &CacheOptions) -> Result<DateTime<Utc>, CacheError> {
        resolve_expiration(
            options.expires.as_ref(),
            &self.config.default_expires,
            self.clock.now(),
            self.offset,
        )
    }

    /// The durable adapter, when the host has a durable store.
    pub fn durable(&self) -> Result<&DurableAdapter<S, C>, CacheError> {
        self.durable
            .as_ref()
            .ok_or_else(|| CacheError::Unavailable("no durable store in this host".into()))
    }

    /// The cookie adapter.
    pub fn cookies(&self) -> &CookieAdapter<J> {
        &self.cookies
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn select(&self, use_cookies: bool) -> BackendKind {
        BackendKind::select(use_cookies, self.capabilities())
    }

    fn write(&self, key: &str, value: &Value, options: &CacheOptions) -> Result<(), CacheError> {
        let expires_at = self.expiration_for(options)?;
        let backend = self.select(options.use_cookies);
        debug!(key, %backend, %expires_at, "cache set");

        match backend {
            BackendKind::DurableStore => self.durable()?.set(key, value, expires_at),
            BackendKind::CookieJar => self.cookies.set(key, value, expires_at),
        }
    }
}
