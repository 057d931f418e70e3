//! Browser backends.
//!
//! `window.localStorage` serves as the durable store and `document.cookie`
//! as the cookie jar. Hosts where `localStorage` is missing or blocked
//! fall back to cookies.

use local_cache_core::{CacheConfig, CacheError};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

use crate::selector::{BackendKind, CacheCall, CacheItem, CacheOptions};
use crate::storage::{CookieJar, DurableStore};

fn js_error(context: &str, err: JsValue) -> CacheError {
    CacheError::StoreError(format!("{}: {:?}", context, err))
}

/// `window.localStorage`.
pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// The window's local storage, if the host exposes one.
    pub fn detect() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl DurableStore for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("localStorage.getItem", e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("localStorage.setItem", e))
    }

    fn remove_item(&self, key: &str) -> Result<(), CacheError> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error("localStorage.removeItem", e))
    }
}

/// `document.cookie`.
pub struct DocumentCookies {
    document: HtmlDocument,
}

impl DocumentCookies {
    /// The window's HTML document.
    pub fn detect() -> Result<Self, CacheError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .ok_or_else(|| CacheError::Unavailable("no HTML document for cookies".into()))?;
        Ok(Self { document })
    }
}

impl CookieJar for DocumentCookies {
    fn cookie_header(&self) -> Result<String, CacheError> {
        self.document
            .cookie()
            .map_err(|e| js_error("document.cookie", e))
    }

    fn set_cookie(&self, cookie: &str) -> Result<(), CacheError> {
        self.document
            .set_cookie(cookie)
            .map_err(|e| js_error("document.cookie", e))
    }
}

/// Build a cache over the current page's storage.
pub fn browser_cache(
    config: CacheConfig,
) -> Result<CacheItem<WebStorage, DocumentCookies>, CacheError> {
    CacheItem::new(WebStorage::detect(), DocumentCookies::detect()?, config)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// `undefined` means the argument was not passed; `null` is a value.
fn from_js(value: &JsValue) -> Result<Option<Value>, JsValue> {
    if value.is_undefined() {
        return Ok(None);
    }
    let text = String::from(js_sys::JSON::stringify(value)?);
    serde_json::from_str(&text).map(Some).map_err(to_js)
}

/// Script entry point: `cacheItem(key, value?, options?)`.
///
/// Reads return the stored value or `null`; writes return `undefined`.
#[wasm_bindgen(js_name = cacheItem)]
pub fn cache_item_js(key: &str, value: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let value = from_js(&value)?;
    let options = CacheOptions::from_argument(from_js(&options)?).map_err(to_js)?;
    let cache = browser_cache(CacheConfig::default()).map_err(to_js)?;
    match CacheCall::classify(value, options) {
        CacheCall::Get { use_cookies } => {
            let backend = BackendKind::select(use_cookies, cache.capabilities());
            match cache.get_from(key, backend).map_err(to_js)? {
                Some(found) => js_sys::JSON::parse(&found.to_string()),
                None => Ok(JsValue::NULL),
            }
        }
        CacheCall::Set { value, options } => {
            cache.set_with(key, &value, &options).map_err(to_js)?;
            Ok(JsValue::UNDEFINED)
        }
    }
}
