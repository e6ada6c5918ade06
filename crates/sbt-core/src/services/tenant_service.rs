// ============================================================================
// SBT Core - Tenant Service
// File: crates/sbt-core/src/services/tenant_service.rs
// ============================================================================
//! Tenant CRUD with soft delete

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info};

use sbt_shared::{Page, Pagination};

use super::{edit_request, list_page, publish_best_effort};
use crate::domain::{DetailType, Record, TENANTS};
use crate::error::DomainError;
use crate::repositories::{EventPublisher, PutCondition, RecordStore};
use crate::update::{AttributeName, PartialUpdateEngine};

pub struct TenantService {
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn EventPublisher>,
    engine: PartialUpdateEngine,
}

impl TenantService {
    pub fn new(store: Arc<dyn RecordStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        let engine = PartialUpdateEngine::new(store.clone(), TENANTS);
        Self { store, publisher, engine }
    }

    /// Stores a new active tenant under a fresh `tenantId`.
    pub async fn create(&self, attributes: Map<String, Value>) -> Result<Record, DomainError> {
        info!("Request received to create new tenant");

        AttributeName::check_all(&attributes)?;
        let tenant = Record::create(&TENANTS, attributes);
        self.store
            .put(&TENANTS, tenant.clone(), PutCondition::KeyNotExists)
            .await
            .inspect_err(|e| error!("Failed to create tenant: {}", e))?;

        info!("Tenant created: {}", tenant.key(&TENANTS).unwrap_or_default());
        publish_best_effort(self.publisher.as_ref(), DetailType::Activate, tenant.clone().into_value()).await;
        Ok(tenant)
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<Page<Record>, DomainError> {
        info!("Request received to get all tenants");
        list_page(self.store.as_ref(), &TENANTS, pagination).await
    }

    pub async fn get(&self, tenant_id: &str) -> Result<Record, DomainError> {
        info!("Request received to get a tenant: {}", tenant_id);
        self.store
            .get(&TENANTS, tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANTS.name, tenant_id))
    }

    /// Partial update of caller attributes. `sbtaws_active` is not editable.
    pub async fn update(&self, tenant_id: &str, attributes: Map<String, Value>) -> Result<Record, DomainError> {
        info!("Request received to update tenant: {}", tenant_id);
        let request = edit_request(attributes)?;
        self.engine.apply_partial_update(tenant_id, request).await
    }

    /// Soft delete: flips `sbtaws_active` to false and announces deactivation.
    pub async fn delete(&self, tenant_id: &str) -> Result<Record, DomainError> {
        info!("Request received to delete tenant: {}", tenant_id);
        let tenant = self.engine.soft_delete(tenant_id).await?;
        publish_best_effort(self.publisher.as_ref(), DetailType::Deactivate, tenant.clone().into_value()).await;
        Ok(tenant)
    }
}
