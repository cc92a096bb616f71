use runlab_settings::SettingsService;
use runlab_settings::service::mock::{MockSettingsService, ServiceCall};
use runlab_types::SettingsPath;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn path(s: &str) -> SettingsPath {
    SettingsPath::new(s).unwrap()
}

// ── MockSettingsService ───────────────────────────────────────────

#[tokio::test]
async fn mock_starts_empty() {
    let service = MockSettingsService::new();
    let settings = service.fetch_all().await.unwrap();
    assert!(settings.is_empty());
    assert_eq!(service.calls(), vec![ServiceCall::FetchAll]);
}

#[tokio::test]
async fn mock_serves_seeded_settings() {
    let service = MockSettingsService::with_settings(HashMap::from([(path("a"), json!(1))]));
    let settings = service.fetch_all().await.unwrap();
    assert_eq!(settings.get(&path("a")), Some(&json!(1)));
}

#[tokio::test]
async fn mock_persist_stores_value() {
    let service = MockSettingsService::new();
    service.persist(&path("a"), &json!("x")).await.unwrap();
    assert_eq!(service.persisted(&path("a")), Some(json!("x")));
}

#[tokio::test]
async fn mock_remove_deletes_value() {
    let service = MockSettingsService::with_settings(HashMap::from([(path("a"), json!(1))]));
    service.remove(&path("a")).await.unwrap();
    assert_eq!(service.persisted(&path("a")), None);
}

#[tokio::test]
async fn mock_reset_all_clears() {
    let service = MockSettingsService::with_settings(HashMap::from([
        (path("a"), json!(1)),
        (path("b"), json!(2)),
    ]));
    service.reset_all().await.unwrap();
    assert!(service.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn mock_records_calls_in_order() {
    let service = MockSettingsService::new();
    service.persist(&path("a"), &json!(1)).await.unwrap();
    service.remove(&path("a")).await.unwrap();
    service.reset_all().await.unwrap();

    assert_eq!(
        service.calls(),
        vec![
            ServiceCall::Persist {
                path: path("a"),
                value: json!(1),
            },
            ServiceCall::Remove { path: path("a") },
            ServiceCall::ResetAll,
        ]
    );
}

#[tokio::test]
async fn mock_failing_writes_error_but_still_record() {
    let service = MockSettingsService::new();
    service.fail_writes(true);

    assert!(service.persist(&path("a"), &json!(1)).await.is_err());
    assert!(service.remove(&path("a")).await.is_err());
    assert_eq!(service.call_count(), 2);

    // Failed writes do not change the persisted state.
    assert_eq!(service.persisted(&path("a")), None);
}

#[tokio::test]
async fn mock_failure_mode_can_be_cleared() {
    let service = MockSettingsService::new();
    service.fail_writes(true);
    assert!(service.persist(&path("a"), &json!(1)).await.is_err());

    service.fail_writes(false);
    assert!(service.persist(&path("a"), &json!(1)).await.is_ok());
}

#[tokio::test]
async fn mock_works_as_trait_object() {
    let service: Arc<dyn SettingsService> = Arc::new(MockSettingsService::new());
    service.persist(&path("a"), &json!(true)).await.unwrap();
    let settings = service.fetch_all().await.unwrap();
    assert_eq!(settings.get(&path("a")), Some(&json!(true)));
}
