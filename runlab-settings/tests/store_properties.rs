//! Property-based tests for store correctness.
//!
//! These verify the store's algebraic laws over generated JSON values:
//! - Roundtrip: a value written through a codec reads back identically
//! - Merge: a partial write overlays exactly its own fields
//! - Idempotence: writing the same value twice changes nothing
//! - Composition: update(f) reads back as f(previous)

use proptest::prelude::*;
use runlab_codec::{SerdeCodec, Shape};
use runlab_settings::SettingsStore;
use runlab_settings::service::mock::MockSettingsService;
use runlab_types::{Loadable, SettingsPath, UserId};
use serde_json::{Map as JsonMap, Value};
use std::future::Future;
use std::sync::Arc;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn new_store() -> SettingsStore {
    SettingsStore::new(UserId::new(), Arc::new(MockSettingsService::new()))
}

fn test_path() -> SettingsPath {
    SettingsPath::new("prop-test").unwrap()
}

// ── Strategies ────────────────────────────────────────────────────

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::from),
    ]
}

fn json_object() -> impl Strategy<Value = JsonMap<String, Value>> {
    prop::collection::btree_map("[a-z]{1,8}", json_leaf(), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}

// ── Laws ──────────────────────────────────────────────────────────

proptest! {
    /// Roundtrip: set(v) then get yields Loaded(v).
    #[test]
    fn set_get_roundtrip(value in json_leaf()) {
        let path = test_path();
        let got = block_on(async {
            let store = new_store();
            store.set(&Shape::Any, &path, &value).unwrap();
            let got = store.get(&Shape::Any, &path);
            store.flush().await;
            got
        });
        prop_assert_eq!(got, Loadable::Loaded(value));
    }

    /// Merge: set_partial overlays exactly the partial's fields.
    #[test]
    fn partial_merge_law(base in json_object(), partial in json_object()) {
        let path = test_path();
        let got = block_on(async {
            let store = new_store();
            store.set(&Shape::Any, &path, &Value::Object(base.clone())).unwrap();
            store.set_partial(&Shape::Any, &path, partial.clone()).unwrap();
            let got = store.get(&Shape::Any, &path);
            store.flush().await;
            got
        });

        let mut merged = base;
        for (field, value) in partial {
            merged.insert(field, value);
        }
        prop_assert_eq!(got, Loadable::Loaded(Value::Object(merged)));
    }

    /// Idempotence: a second identical set leaves the read unchanged.
    #[test]
    fn set_is_idempotent(value in json_leaf()) {
        let path = test_path();
        let (first, second) = block_on(async {
            let store = new_store();
            store.set(&Shape::Any, &path, &value).unwrap();
            let first = store.get(&Shape::Any, &path);
            store.set(&Shape::Any, &path, &value).unwrap();
            let second = store.get(&Shape::Any, &path);
            store.flush().await;
            (first, second)
        });
        prop_assert_eq!(first, second);
    }

    /// Composition: update(f) then get equals Loaded(f(previous)).
    #[test]
    fn update_composes(initial in any::<i64>(), delta in any::<i64>()) {
        let path = test_path();
        let codec = SerdeCodec::<i64>::new();
        let got = block_on(async {
            let store = new_store();
            store.set(&codec, &path, &initial).unwrap();
            store.update(&codec, &path, |n| n.wrapping_add(delta)).unwrap();
            let got = store.get(&codec, &path);
            store.flush().await;
            got
        });
        prop_assert_eq!(got, Loadable::Loaded(initial.wrapping_add(delta)));
    }
}
