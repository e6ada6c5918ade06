// ============================================================================
// SBT Core - Partial Update Engine
// File: crates/sbt-core/src/update/engine.rs
// ============================================================================
//! Existence-conditioned partial updates shared by every resource service.

use std::sync::Arc;

use tracing::{debug, error, info};

use sbt_shared::constants::ACTIVE_FLAG_ATTRIBUTE;

use super::request::UpdateRequest;
use crate::domain::{Record, RecordStatus, TableSpec};
use crate::error::DomainError;
use crate::repositories::RecordStore;

/// Applies partial updates to records of one table.
///
/// Each call issues exactly one conditional `update` against the store and
/// returns the full record as it stands after the write. Nothing is retried.
#[derive(Clone)]
pub struct PartialUpdateEngine {
    store: Arc<dyn RecordStore>,
    table: TableSpec,
}

impl PartialUpdateEngine {
    pub fn new(store: Arc<dyn RecordStore>, table: TableSpec) -> Self {
        Self { store, table }
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    pub async fn apply_partial_update(
        &self,
        identifier: &str,
        request: UpdateRequest,
    ) -> Result<Record, DomainError> {
        if identifier.trim().is_empty() {
            return Err(DomainError::validation("Record identifier must not be empty"));
        }

        // The identifier is immutable; an edit to it is discarded, not merged.
        let request = request.without(self.table.key_field);
        if request.is_empty() {
            return Err(DomainError::validation("Update request has no attributes to set"));
        }

        let expression = request.into_expression()?;
        debug!(
            table = self.table.name,
            key = identifier,
            statement = %expression.statement(),
            "Applying partial update"
        );

        match self.store.update(&self.table, identifier, &expression).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_not_found() => {
                info!("Update targeted non-existing record {} in {}", identifier, self.table.name);
                Err(e)
            }
            Err(e) => {
                error!("Update of {} in {} failed: {}", identifier, self.table.name, e);
                Err(e)
            }
        }
    }

    /// Marks the record inactive. Repeating it on an inactive record succeeds
    /// and leaves it unchanged.
    pub async fn soft_delete(&self, identifier: &str) -> Result<Record, DomainError> {
        let request = UpdateRequest::new().set(ACTIVE_FLAG_ATTRIBUTE, RecordStatus::Inactive.as_flag())?;
        self.apply_partial_update(identifier, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TENANTS;
    use crate::repositories::MockRecordStore;
    use crate::update::UpdateExpression;
    use serde_json::{json, Map, Value};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(m) => Record::from(m),
            _ => Record::new(),
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_single_update_returns_full_record() {
        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .withf(|table, key, expr: &UpdateExpression| {
                table.name == "tenant_details" && key == "t1" && expr.statement() == "SET #f0 = :v0"
            })
            .returning(|_, _, _| {
                Ok(record(json!({"tenantId": "t1", "name": "Acme Corp", "sbtaws_active": true})))
            });

        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let request = UpdateRequest::from_map(map(json!({"name": "Acme Corp"}))).unwrap();
        let updated = engine.apply_partial_update("t1", request).await.unwrap();

        assert_eq!(
            updated.into_value(),
            json!({"tenantId": "t1", "name": "Acme Corp", "sbtaws_active": true})
        );
    }

    #[tokio::test]
    async fn test_identifier_is_stripped_from_request() {
        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .withf(|_, _, expr: &UpdateExpression| {
                expr.clauses().iter().all(|c| c.name().as_str() != "tenantId")
            })
            .returning(|_, _, _| Ok(record(json!({"tenantId": "t1", "name": "x"}))));

        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let request = UpdateRequest::from_map(map(json!({"tenantId": "t2", "name": "x"}))).unwrap();
        let updated = engine.apply_partial_update("t1", request).await.unwrap();
        assert_eq!(updated.key(&TENANTS), Some("t1"));
    }

    #[tokio::test]
    async fn test_empty_request_fails_fast_without_store_call() {
        let mut store = MockRecordStore::new();
        store.expect_update().times(0);

        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);

        let err = engine.apply_partial_update("t1", UpdateRequest::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        // Only the identifier: empty once stripped.
        let request = UpdateRequest::from_map(map(json!({"tenantId": "t1"}))).unwrap();
        let err = engine.apply_partial_update("t1", request).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_empty_identifier_is_rejected() {
        let mut store = MockRecordStore::new();
        store.expect_update().times(0);

        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let request = UpdateRequest::new().set("name", "x").unwrap();
        let err = engine.apply_partial_update("  ", request).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_not_found_and_storage_errors_stay_distinct() {
        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .returning(|table, key, _| Err(DomainError::not_found(table.name, key)));
        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let err = engine.soft_delete("missing").await.unwrap_err();
        assert!(err.is_not_found());

        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .returning(|_, _, _| Err(DomainError::StorageError("throttled".into())));
        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let err = engine.soft_delete("t1").await.unwrap_err();
        assert_eq!(err, DomainError::StorageError("throttled".into()));
    }

    #[tokio::test]
    async fn test_soft_delete_sets_only_active_flag() {
        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .withf(|_, _, expr: &UpdateExpression| {
                expr.len() == 1
                    && expr.clauses()[0].name().as_str() == "sbtaws_active"
                    && expr.clauses()[0].value() == &json!(false)
            })
            .returning(|_, _, _| Ok(record(json!({"tenantId": "t1", "sbtaws_active": false}))));

        let engine = PartialUpdateEngine::new(Arc::new(store), TENANTS);
        let deleted = engine.soft_delete("t1").await.unwrap();
        assert_eq!(deleted.status(), RecordStatus::Inactive);
    }
}
