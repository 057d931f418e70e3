//! Backing store interfaces.
//!
//! Both mirror the browser facilities they abstract: handles are shared
//! (`&self`) and mutate through interior state.

use local_cache_core::CacheError;

/// A persistent string key-value store, like `window.localStorage`.
pub trait DurableStore {
    /// Read an entry.
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write an entry, replacing any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete an entry. Deleting a missing entry is not an error.
    fn remove_item(&self, key: &str) -> Result<(), CacheError>;
}

/// A cookie jar, like `document.cookie`.
pub trait CookieJar {
    /// The current cookie header: live `name=value` pairs joined by `"; "`.
    fn cookie_header(&self) -> Result<String, CacheError>;

    /// Apply a `Set-Cookie` style assignment such as
    /// `name=value; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/`.
    fn set_cookie(&self, cookie: &str) -> Result<(), CacheError>;
}

impl<S: DurableStore + ?Sized> DurableStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove_item(key)
    }
}

impl<J: CookieJar + ?Sized> CookieJar for &J {
    fn cookie_header(&self) -> Result<String, CacheError> {
        (**self).cookie_header()
    }

    fn set_cookie(&self, cookie: &str) -> Result<(), CacheError> {
        (**self).set_cookie(cookie)
    }
}
