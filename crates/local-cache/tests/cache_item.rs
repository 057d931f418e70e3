//! End-to-end behavior of `CacheItem` over the in-memory backends.

use chrono::{DateTime, Duration, TimeZone, Utc};
use local_cache::{
    BackendKind, CacheConfig, CacheItem, CacheOptions, CookieJar, DurableStore, ExpirySpec,
    ManualClock, MemoryCookieJar, MemoryStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

type TestCache = CacheItem<MemoryStore, MemoryCookieJar<ManualClock>, ManualClock>;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn cache() -> (TestCache, ManualClock) {
    cache_with(true, CacheConfig::default())
}

fn cache_with(durable: bool, config: CacheConfig) -> (TestCache, ManualClock) {
    let clock = ManualClock::new(start());
    let store = durable.then(MemoryStore::new);
    let jar = MemoryCookieJar::with_clock(clock.clone());
    let cache = CacheItem::with_clock(store, jar, clock.clone(), config).unwrap();
    (cache, clock)
}

fn options(json: Value) -> Option<CacheOptions> {
    Some(serde_json::from_value(json).unwrap())
}

#[test]
fn test_default_backend_prefers_durable_store() {
    let (cache, _) = cache();
    assert_eq!(cache.backend(), BackendKind::DurableStore);

    let (cache, _) = cache_with(false, CacheConfig::default());
    assert_eq!(cache.backend(), BackendKind::CookieJar);
}

#[test]
fn test_default_expiration_keeps_value_for_a_day() {
    let (cache, clock) = cache();
    cache.cache_item("greeting", Some(json!("hello")), None).unwrap();

    assert_eq!(
        cache.cache_item("greeting", None, None).unwrap(),
        Some(json!("hello"))
    );

    clock.advance(Duration::hours(23));
    assert_eq!(cache.get("greeting").unwrap(), Some(json!("hello")));

    clock.advance(Duration::hours(2));
    assert_eq!(cache.get("greeting").unwrap(), None);
}

#[test]
fn test_past_expiration_is_absent() {
    let (cache, _) = cache();
    let yesterday = start() - Duration::days(1);

    cache
        .cache_item("k", Some(json!("v")), options(json!({"expires": {"date": yesterday}})))
        .unwrap();
    assert_eq!(cache.get("k").unwrap(), None);

    cache
        .set_with("k", "v", &CacheOptions::default().expires(ExpirySpec::at(yesterday)))
        .unwrap();
    assert_eq!(cache.get("k").unwrap(), None);

    cache
        .cache_item(
            "k",
            Some(json!("v")),
            options(json!({"useCookies": true, "expires": {"date": yesterday}})),
        )
        .unwrap();
    assert_eq!(cache.get_with("k", &CacheOptions::cookies()).unwrap(), None);
}

#[test]
fn test_lazy_expiration_clears_ledger() {
    let (cache, clock) = cache();
    cache
        .cache_item("k", Some(json!("v")), options(json!({"expires": {"minutes": 1}})))
        .unwrap();
    assert!(cache.durable().unwrap().ledger().unwrap().get("k").is_some());

    clock.advance(Duration::minutes(2));

    assert_eq!(cache.get("k").unwrap(), None);
    let durable = cache.durable().unwrap();
    assert!(durable.ledger().unwrap().get("k").is_none());
    assert_eq!(durable.store().get_item("k").unwrap(), None);
    assert_eq!(
        durable.store().get_item("localStorageExpirations").unwrap(),
        None
    );
}

#[test]
fn test_null_deletes_in_both_backends() {
    let (cache, _) = cache();
    cache.set("k", "v").unwrap();
    cache.set_with("k", "v", &CacheOptions::cookies()).unwrap();

    cache.cache_item("k", Some(Value::Null), None).unwrap();
    cache
        .cache_item("k", Some(Value::Null), Some(CacheOptions::cookies()))
        .unwrap();

    assert_eq!(cache.get("k").unwrap(), None);
    assert_eq!(cache.get_with("k", &CacheOptions::cookies()).unwrap(), None);
    assert!(cache.durable().unwrap().store().is_empty());
}

#[test]
fn test_delete_of_never_set_key() {
    let (cache, _) = cache();
    cache.remove("ghost").unwrap();
    assert_eq!(cache.get("ghost").unwrap(), None);
}

#[test]
fn test_fav_color_lives_five_days() {
    let (cache, clock) = cache();
    cache
        .cache_item("favColor", Some(json!("blue")), options(json!({"expires": {"days": 5}})))
        .unwrap();

    for _ in 0..4 {
        clock.advance(Duration::days(1));
        assert_eq!(cache.get("favColor").unwrap(), Some(json!("blue")));
    }

    clock.advance(Duration::days(1) + Duration::seconds(1));
    assert_eq!(cache.get("favColor").unwrap(), None);
}

#[test]
fn test_cars_round_trip_through_cookies() {
    let (cache, _) = cache();
    let cars = json!([{"make": "Honda", "year": 2012}]);

    cache
        .cache_item("cars", Some(cars.clone()), options(json!({"useCookies": true})))
        .unwrap();

    let found = cache
        .cache_item("cars", Some(json!({"useCookies": true})), None)
        .unwrap();
    assert_eq!(found, Some(cars));

    // The durable store was never touched.
    assert_eq!(cache.get("cars").unwrap(), None);
}

#[test]
fn test_cookie_fallback_without_durable_store() {
    let (cache, clock) = cache_with(false, CacheConfig::default());
    cache
        .cache_item("k", Some(json!({"a": 1})), options(json!({"expires": {"hours": 1}})))
        .unwrap();

    assert!(cache.cookies().jar().cookie_header().unwrap().starts_with("k="));
    assert_eq!(cache.get("k").unwrap(), Some(json!({"a": 1})));

    clock.advance(Duration::hours(2));
    assert_eq!(cache.get("k").unwrap(), None);
}

#[test]
fn test_objects_and_arrays_round_trip_in_durable_store() {
    let (cache, _) = cache();
    let object = json!({"make": "Honda", "year": 2012, "tags": ["a", "b"]});
    let array = json!([1, "two", {"three": 3}]);

    cache.set("object", &object).unwrap();
    cache.set("array", &array).unwrap();

    assert_eq!(cache.get("object").unwrap(), Some(object));
    assert_eq!(cache.get("array").unwrap(), Some(array));
}

#[test]
fn test_scalars_round_trip() {
    let (cache, _) = cache();
    cache.set("n", &15).unwrap();
    cache.set("b", &true).unwrap();
    cache.set("s", "plain text").unwrap();

    assert_eq!(cache.get("n").unwrap(), Some(json!(15)));
    assert_eq!(cache.get("b").unwrap(), Some(json!(true)));
    assert_eq!(cache.get("s").unwrap(), Some(json!("plain text")));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Car {
    make: String,
    year: u16,
}

#[test]
fn test_typed_get() {
    let (cache, _) = cache();
    let car = Car {
        make: "Honda".into(),
        year: 2012,
    };
    cache.set("car", &car).unwrap();
    assert_eq!(cache.get_as::<Car>("car").unwrap(), Some(car));
    assert_eq!(cache.get_as::<Car>("missing").unwrap(), None);
}

#[test]
fn test_at_midnight_uses_configured_offset() {
    // 12:00 UTC is 21:00 at +09:00, so midnight there is 15:00 UTC.
    let config = CacheConfig::default().with_utc_offset_minutes(9 * 60);
    let (cache, clock) = cache_with(true, config);
    let spec = CacheOptions::default().expires(ExpirySpec::next_midnight());

    assert_eq!(
        cache.expiration_for(&spec).unwrap(),
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap()
    );

    cache.set_with("k", "v", &spec).unwrap();
    clock.advance(Duration::hours(2));
    assert_eq!(cache.get("k").unwrap(), Some(json!("v")));
    clock.advance(Duration::hours(2));
    assert_eq!(cache.get("k").unwrap(), None);
}

#[test]
fn test_far_future_expiration_survives_reparse() {
    let (cache, clock) = cache();
    let far = CacheOptions::default().expires(ExpirySpec::default().with_years(8000));
    let far_cookie = CacheOptions {
        use_cookies: true,
        ..far.clone()
    };

    cache.set_with("k", "v", &far).unwrap();
    cache.set_with("c", "w", &far_cookie).unwrap();
    clock.advance(Duration::days(365));

    assert_eq!(cache.get("k").unwrap(), Some(json!("v")));
    assert_eq!(
        cache.durable().unwrap().ledger().unwrap().get("k"),
        Some(Utc.with_ymd_and_hms(10026, 10, 19, 12, 0, 0).unwrap())
    );
    assert_eq!(cache.get_with("c", &far_cookie).unwrap(), Some(json!("w")));
    assert_eq!(
        cache.cookies().jar().live_cookies()[0].expires,
        Some(Utc.with_ymd_and_hms(10026, 10, 19, 12, 0, 0).unwrap())
    );
}

#[test]
fn test_configured_default_expiration() {
    let config =
        CacheConfig::default().with_default_expires(ExpirySpec::default().with_minutes(10));
    let (cache, clock) = cache_with(true, config);

    cache.set("k", "v").unwrap();
    clock.advance(Duration::minutes(11));
    assert_eq!(cache.get("k").unwrap(), None);
}

#[test]
fn test_overwrite_keeps_single_ledger_entry() {
    let (cache, _) = cache();
    for days in 1..=5 {
        cache
            .set_with(
                "k",
                &days,
                &CacheOptions::default().expires(ExpirySpec::default().with_days(days)),
            )
            .unwrap();
    }

    let ledger = cache.durable().unwrap().ledger().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.get("k"), Some(start() + Duration::days(5)));
    assert_eq!(cache.get("k").unwrap(), Some(json!(5)));
}

#[test]
fn test_invalid_config_rejected() {
    let clock = ManualClock::new(start());
    let result = CacheItem::with_clock(
        Some(MemoryStore::new()),
        MemoryCookieJar::with_clock(clock.clone()),
        clock,
        CacheConfig::default().with_ledger_key(""),
    );
    assert!(result.is_err());
}

#[test]
fn test_durable_unavailable_error_when_missing() {
    let (cache, _) = cache_with(false, CacheConfig::default());
    assert!(cache.durable().is_err());
    assert!(cache.get_from("k", BackendKind::DurableStore).is_err());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_ledger_tracks_each_live_key_once(
            ops in prop::collection::vec(("[a-d]", prop::option::of(1i64..48)), 1..30)
        ) {
            let (cache, _) = cache();
            let mut live = std::collections::BTreeSet::new();

            for (key, hours) in &ops {
                match hours {
                    Some(hours) => {
                        let opts = CacheOptions::default()
                            .expires(ExpirySpec::default().with_hours(*hours));
                        cache.set_with(key, "v", &opts).unwrap();
                        live.insert(key.clone());
                    }
                    None => {
                        cache.remove(key).unwrap();
                        live.remove(key);
                    }
                }
            }

            let ledger = cache.durable().unwrap().ledger().unwrap();
            let tracked: std::collections::BTreeSet<String> =
                ledger.iter().map(|e| e.key.clone()).collect();
            prop_assert_eq!(ledger.len(), tracked.len());
            prop_assert_eq!(&tracked, &live);
            for key in &live {
                prop_assert_eq!(cache.get(key).unwrap(), Some(json!("v")));
            }
        }
    }
}
