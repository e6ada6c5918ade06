// ============================================================================
// SBT Core - User Service
// File: crates/sbt-core/src/services/user_service.rs
// ============================================================================
//! Control plane users keyed by user name

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Map;
use tracing::{info, warn};
use validator::Validate;

use sbt_shared::{Page, Pagination};

use super::list_page;
use crate::domain::{Record, USERS};
use crate::error::DomainError;
use crate::repositories::{PutCondition, RecordStore};
use crate::update::{PartialUpdateEngine, UpdateRequest};

pub const USER_STATUS_CONFIRMED: &str = "CONFIRMED";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 128, message = "User name must be between 1 and 128 characters"))]
    pub user_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "User role must be between 1 and 64 characters"))]
    pub user_role: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 64, message = "User role must be between 1 and 64 characters"))]
    pub user_role: Option<String>,
}

pub struct UserService {
    store: Arc<dyn RecordStore>,
    engine: PartialUpdateEngine,
}

impl UserService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let engine = PartialUpdateEngine::new(store.clone(), USERS);
        Self { store, engine }
    }

    /// The user name is trimmed before validation and becomes the key.
    pub async fn create(&self, mut request: CreateUserRequest) -> Result<Record, DomainError> {
        request.user_name = request.user_name.trim().to_string();
        request.validate()?;
        info!("Creating user {}", request.user_name);

        let now = Utc::now().to_rfc3339();
        let mut user = Record::keyed(&USERS, &request.user_name, Map::new());
        user.insert("email", request.email);
        user.insert("userRole", request.user_role);
        user.insert("enabled", true);
        user.insert("userStatus", USER_STATUS_CONFIRMED);
        user.insert("createdAt", now.clone());
        user.insert("modifiedAt", now);

        self.store
            .put(&USERS, user.clone(), PutCondition::KeyNotExists)
            .await
            .inspect_err(|e| warn!("Failed to create user {}: {}", request.user_name, e))?;
        Ok(user)
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<Page<Record>, DomainError> {
        list_page(self.store.as_ref(), &USERS, pagination).await
    }

    pub async fn get(&self, user_name: &str) -> Result<Record, DomainError> {
        self.store
            .get(&USERS, user_name)
            .await?
            .ok_or_else(|| DomainError::not_found(USERS.name, user_name))
    }

    /// Only `email` and `userRole` can be changed.
    pub async fn update(&self, user_name: &str, request: UpdateUserRequest) -> Result<Record, DomainError> {
        request.validate()?;

        let mut edits = UpdateRequest::new();
        if let Some(email) = request.email {
            edits = edits.set("email", email)?;
        }
        if let Some(role) = request.user_role {
            edits = edits.set("userRole", role)?;
        }
        if edits.is_empty() {
            return Err(DomainError::validation("Nothing to update: provide email or userRole"));
        }

        self.engine
            .apply_partial_update(user_name, edits.set("modifiedAt", Utc::now().to_rfc3339())?)
            .await
    }

    pub async fn enable(&self, user_name: &str) -> Result<Record, DomainError> {
        info!("Enabling user {}", user_name);
        self.set_enabled(user_name, true).await
    }

    pub async fn disable(&self, user_name: &str) -> Result<Record, DomainError> {
        info!("Disabling user {}", user_name);
        self.set_enabled(user_name, false).await
    }

    pub async fn delete(&self, user_name: &str) -> Result<Record, DomainError> {
        info!("Deleting user {}", user_name);
        self.engine.soft_delete(user_name).await
    }

    async fn set_enabled(&self, user_name: &str, enabled: bool) -> Result<Record, DomainError> {
        let edits = UpdateRequest::new()
            .set("enabled", enabled)?
            .set("modifiedAt", Utc::now().to_rfc3339())?;
        self.engine.apply_partial_update(user_name, edits).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockRecordStore;
    use crate::update::UpdateExpression;

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let mut store = MockRecordStore::new();
        store.expect_put().times(0);

        let service = UserService::new(Arc::new(store));
        let err = service
            .create(CreateUserRequest {
                user_name: "alice".into(),
                email: "not-an-email".into(),
                user_role: "TenantAdmin".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_user_name() {
        let mut store = MockRecordStore::new();
        store.expect_put().times(0);

        let service = UserService::new(Arc::new(store));
        let err = service
            .create(CreateUserRequest {
                user_name: "   ".into(),
                email: "alice@acme.test".into(),
                user_role: "TenantAdmin".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_keys_by_trimmed_name() {
        let mut store = MockRecordStore::new();
        store
            .expect_put()
            .withf(|_, record, _| record.key(&USERS) == Some("alice"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = UserService::new(Arc::new(store));
        let user = service
            .create(CreateUserRequest {
                user_name: "  alice ".into(),
                email: "alice@acme.test".into(),
                user_role: "TenantAdmin".into(),
            })
            .await
            .unwrap();
        assert_eq!(user.key(&USERS), Some("alice"));
    }

    #[tokio::test]
    async fn test_create_duplicate_user_conflicts() {
        let mut store = MockRecordStore::new();
        store.expect_put().times(1).returning(|table, record, _| {
            Err(DomainError::RecordAlreadyExists {
                table: table.name,
                key: record.key(table).unwrap_or_default().to_string(),
            })
        });

        let service = UserService::new(Arc::new(store));
        let err = service
            .create(CreateUserRequest {
                user_name: "alice".into(),
                email: "alice@example.com".into(),
                user_role: "TenantAdmin".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::RecordAlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_without_fields_is_rejected() {
        let mut store = MockRecordStore::new();
        store.expect_update().times(0);

        let service = UserService::new(Arc::new(store));
        let err = service.update("alice", UpdateUserRequest::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_disable_sets_enabled_false() {
        let mut store = MockRecordStore::new();
        store
            .expect_update()
            .times(1)
            .withf(|table, key, expr: &UpdateExpression| {
                table.name == "users"
                    && key == "alice"
                    && expr
                        .clauses()
                        .iter()
                        .any(|c| c.name().as_str() == "enabled" && c.value() == &serde_json::json!(false))
            })
            .returning(|_, _, _| Ok(Record::new()));

        let service = UserService::new(Arc::new(store));
        service.disable("alice").await.unwrap();
    }
}
