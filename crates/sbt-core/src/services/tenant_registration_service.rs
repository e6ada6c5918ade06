// ============================================================================
// SBT Core - Tenant Registration Service
// File: crates/sbt-core/src/services/tenant_registration_service.rs
// Description: Registration records that drive tenant onboarding/offboarding
// ============================================================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use sbt_shared::{Page, Pagination};

use super::{check_edits, list_page, publish_best_effort, TenantService};
use crate::domain::{DetailType, Record, TENANTS, TENANT_REGISTRATIONS};
use crate::error::DomainError;
use crate::repositories::{EventPublisher, PutCondition, RecordStore};
use crate::update::{AttributeName, PartialUpdateEngine, UpdateRequest};

/// Body of create and update calls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(default)]
    pub tenant_data: Map<String, Value>,
    #[serde(default)]
    pub tenant_registration_data: Map<String, Value>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub tenant_registration_id: String,
    pub tenant_id: String,
    pub message: String,
}

/// Registration (and tenant, when it was touched) after an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationChange {
    pub tenant_registration: Record,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Record>,
}

pub struct TenantRegistrationService {
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn EventPublisher>,
    engine: PartialUpdateEngine,
    tenants: Arc<TenantService>,
}

impl TenantRegistrationService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        publisher: Arc<dyn EventPublisher>,
        tenants: Arc<TenantService>,
    ) -> Self {
        let engine = PartialUpdateEngine::new(store.clone(), TENANT_REGISTRATIONS);
        Self { store, publisher, engine, tenants }
    }

    /// Records the registration, provisions the tenant, links the two and
    /// announces onboarding.
    ///
    /// If tenant provisioning fails the registration stays behind without a
    /// `tenantId`; there is no rollback.
    pub async fn create(&self, request: RegistrationRequest) -> Result<RegistrationOutcome, DomainError> {
        AttributeName::check_all(&request.tenant_registration_data)?;
        AttributeName::check_all(&request.tenant_data)?;

        let registration = Record::create(&TENANT_REGISTRATIONS, request.tenant_registration_data.clone());
        let registration_id = registration
            .key(&TENANT_REGISTRATIONS)
            .unwrap_or_default()
            .to_string();
        info!("Creating tenant registration {}", registration_id);

        self.store
            .put(&TENANT_REGISTRATIONS, registration, PutCondition::KeyNotExists)
            .await
            .inspect_err(|e| error!("Error creating tenant registration: {}", e))?;

        let tenant = self
            .tenants
            .create(request.tenant_data.clone())
            .await
            .map_err(|e| upstream("Failed to create tenant", e))?;
        let tenant_id = tenant.key(&TENANTS).unwrap_or_default().to_string();

        let link = UpdateRequest::new().set(TENANTS.key_field, tenant_id.as_str())?;
        self.engine.apply_partial_update(&registration_id, link).await?;

        let mut detail = request.tenant_registration_data;
        detail.extend(request.tenant_data);
        detail.insert(TENANTS.key_field.to_string(), Value::from(tenant_id.as_str()));
        detail.insert(TENANT_REGISTRATIONS.key_field.to_string(), Value::from(registration_id.as_str()));
        publish_best_effort(self.publisher.as_ref(), DetailType::Onboarding, Value::Object(detail)).await;

        Ok(RegistrationOutcome {
            tenant_registration_id: registration_id,
            tenant_id,
            message: "Tenant registration initiated".to_string(),
        })
    }

    pub async fn get(&self, registration_id: &str) -> Result<Record, DomainError> {
        self.store
            .get(&TENANT_REGISTRATIONS, registration_id)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANT_REGISTRATIONS.name, registration_id))
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<Page<Record>, DomainError> {
        list_page(self.store.as_ref(), &TENANT_REGISTRATIONS, pagination).await
    }

    /// Applies registration edits (if any) and forwards tenant edits (if
    /// any) to the linked tenant.
    pub async fn update(
        &self,
        registration_id: &str,
        request: RegistrationRequest,
    ) -> Result<RegistrationChange, DomainError> {
        if request.tenant_data.is_empty() && request.tenant_registration_data.is_empty() {
            return Err(DomainError::validation(
                "Either tenantData or tenantRegistrationData must be provided",
            ));
        }
        check_edits(&request.tenant_registration_data)?;
        check_edits(&request.tenant_data)?;

        let registration = if request.tenant_registration_data.is_empty() {
            self.get(registration_id).await?
        } else {
            let edits = UpdateRequest::from_map(request.tenant_registration_data)?;
            self.engine.apply_partial_update(registration_id, edits).await?
        };

        let tenant_id = linked_tenant_id(&registration)?;
        let tenant = if request.tenant_data.is_empty() {
            None
        } else {
            let tenant = self
                .tenants
                .update(&tenant_id, request.tenant_data)
                .await
                .map_err(|e| upstream("Failed to update tenant", e))?;
            Some(tenant)
        };

        info!("Tenant registration {} updated", registration_id);
        Ok(RegistrationChange {
            tenant_registration: registration,
            tenant,
        })
    }

    /// Deactivates the linked tenant, then the registration, and announces
    /// offboarding.
    pub async fn delete(&self, registration_id: &str) -> Result<Record, DomainError> {
        let registration = self.get(registration_id).await?;
        let tenant_id = linked_tenant_id(&registration)?;

        let tenant = self
            .tenants
            .delete(&tenant_id)
            .await
            .map_err(|e| upstream("Failed to delete tenant", e))?;

        let deleted = self.engine.soft_delete(registration_id).await?;

        let mut detail = tenant.into_map();
        detail.extend(deleted.clone().into_map());
        publish_best_effort(self.publisher.as_ref(), DetailType::Offboarding, Value::Object(detail)).await;

        info!("Tenant registration {} deletion initiated", registration_id);
        Ok(deleted)
    }
}

fn linked_tenant_id(registration: &Record) -> Result<String, DomainError> {
    registration
        .get_str(TENANTS.key_field)
        .map(str::to_string)
        .ok_or_else(|| DomainError::validation("Tenant ID not found for this registration"))
}

fn upstream(context: &str, e: DomainError) -> DomainError {
    warn!("{}: {}", context, e);
    DomainError::UpstreamError(format!("{}: {}", context, e))
}
