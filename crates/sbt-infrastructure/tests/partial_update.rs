//! Partial update behaviour against the in-memory store.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use sbt_core::domain::{Record, RecordStatus, TENANTS};
use sbt_core::error::DomainError;
use sbt_core::repositories::{PutCondition, RecordStore};
use sbt_core::update::{PartialUpdateEngine, UpdateRequest};
use sbt_infrastructure::MemoryRecordStore;

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

fn request(value: Value) -> UpdateRequest {
    UpdateRequest::from_map(map(value)).unwrap()
}

async fn seeded(record: Value) -> (Arc<MemoryRecordStore>, PartialUpdateEngine) {
    let store = Arc::new(MemoryRecordStore::new());
    store
        .put(&TENANTS, Record::from(map(record)), PutCondition::KeyNotExists)
        .await
        .unwrap();
    let engine = PartialUpdateEngine::new(store.clone(), TENANTS);
    (store, engine)
}

#[tokio::test]
async fn test_round_trip_rename() {
    let (_, engine) = seeded(json!({"tenantId": "t1", "name": "Acme", "sbtaws_active": true})).await;

    let updated = engine
        .apply_partial_update("t1", request(json!({"name": "Acme Corp"})))
        .await
        .unwrap();

    assert_eq!(
        updated.into_value(),
        json!({"tenantId": "t1", "name": "Acme Corp", "sbtaws_active": true})
    );
}

#[tokio::test]
async fn test_update_overrides_only_requested_fields() {
    let (store, engine) = seeded(json!({
        "tenantId": "t1",
        "name": "Acme",
        "tier": "basic",
        "settings": {"theme": "dark"},
        "sbtaws_active": true
    }))
    .await;

    let updated = engine
        .apply_partial_update("t1", request(json!({"tier": "premium", "seats": 25, "tenantId": "t2"})))
        .await
        .unwrap();

    let expected = json!({
        "tenantId": "t1",
        "name": "Acme",
        "tier": "premium",
        "seats": 25,
        "settings": {"theme": "dark"},
        "sbtaws_active": true
    });
    assert_eq!(updated.clone().into_value(), expected);
    assert_eq!(store.get(&TENANTS, "t1").await.unwrap(), Some(updated));
    assert_eq!(store.get(&TENANTS, "t2").await.unwrap(), None);
}

#[tokio::test]
async fn test_missing_record_is_never_created() {
    let store = Arc::new(MemoryRecordStore::new());
    let engine = PartialUpdateEngine::new(store.clone(), TENANTS);

    let err = engine
        .apply_partial_update("ghost", request(json!({"name": "Nobody"})))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::not_found("tenant_details", "ghost"));
    assert!(store.is_empty(&TENANTS));
}

#[tokio::test]
async fn test_soft_delete_twice_reaches_same_state() {
    let (_, engine) = seeded(json!({"tenantId": "t1", "name": "Acme", "sbtaws_active": true})).await;

    let first = engine.soft_delete("t1").await.unwrap();
    assert_eq!(first.status(), RecordStatus::Inactive);
    assert_eq!(first.get_str("name"), Some("Acme"));

    let second = engine.soft_delete("t1").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_update_is_rejected_without_writing() {
    let (store, engine) = seeded(json!({"tenantId": "t1", "name": "Acme"})).await;

    let err = engine
        .apply_partial_update("t1", request(json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));

    // A request that only names the key is empty once the key is stripped.
    let err = engine
        .apply_partial_update("t1", request(json!({"tenantId": "t9"})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ValidationError(_)));

    let stored = store.get(&TENANTS, "t1").await.unwrap().unwrap();
    assert_eq!(stored.into_value(), json!({"tenantId": "t1", "name": "Acme"}));
}

#[tokio::test]
async fn test_concurrent_disjoint_updates_both_land() {
    let (store, engine) = seeded(json!({"tenantId": "t1", "sbtaws_active": true})).await;

    for _ in 0..50 {
        let a = engine.clone();
        let b = engine.clone();
        let first = tokio::spawn(async move { a.apply_partial_update("t1", request(json!({"a": 1}))).await });
        let second = tokio::spawn(async move { b.apply_partial_update("t1", request(json!({"b": 2}))).await });

        assert!(first.await.unwrap().is_ok());
        assert!(second.await.unwrap().is_ok());
    }

    let stored = store.get(&TENANTS, "t1").await.unwrap().unwrap();
    assert_eq!(stored.get("a"), Some(&json!(1)));
    assert_eq!(stored.get("b"), Some(&json!(2)));
}
