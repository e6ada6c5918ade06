// ============================================================================
// SBT Core - Billing Service
// File: crates/sbt-core/src/services/billing_service.rs
// Description: Built-in billing provider fed by control plane events
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use sbt_shared::constants::ACTIVE_FLAG_ATTRIBUTE;

use super::find_first;
use crate::domain::{ControlPlaneEvent, DetailType, Record, BILLING_CUSTOMERS, BILLING_RECORDS, TENANTS};
use crate::error::DomainError;
use crate::repositories::{PutCondition, RecordStore};
use crate::update::{AttributeName, PartialUpdateEngine, UpdateRequest};

pub struct BillingService {
    store: Arc<dyn RecordStore>,
    customers: PartialUpdateEngine,
    records: PartialUpdateEngine,
}

impl BillingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let customers = PartialUpdateEngine::new(store.clone(), BILLING_CUSTOMERS);
        let records = PartialUpdateEngine::new(store.clone(), BILLING_RECORDS);
        Self { store, customers, records }
    }

    pub async fn create_customer(&self, tenant_id: &str, email: &str) -> Result<Record, DomainError> {
        let mut attributes = Map::new();
        attributes.insert("email".to_string(), Value::from(email));
        attributes.insert(TENANTS.key_field.to_string(), Value::from(tenant_id));

        let customer = Record::create(&BILLING_CUSTOMERS, attributes);
        self.store
            .put(&BILLING_CUSTOMERS, customer.clone(), PutCondition::KeyNotExists)
            .await?;

        info!(
            "Created customer {} for tenant {}",
            customer.key(&BILLING_CUSTOMERS).unwrap_or_default(),
            tenant_id
        );
        Ok(customer)
    }

    /// Deactivates the active customer linked to `tenant_id`.
    pub async fn delete_customer(&self, tenant_id: &str) -> Result<Record, DomainError> {
        let customer = find_first(self.store.as_ref(), &BILLING_CUSTOMERS, |r| {
            r.is_active() && r.get_str(TENANTS.key_field) == Some(tenant_id)
        })
        .await?
        .ok_or_else(|| {
            warn!("Customer not found for tenant {}", tenant_id);
            DomainError::not_found(BILLING_CUSTOMERS.name, tenant_id)
        })?;

        let customer_id = customer.key(&BILLING_CUSTOMERS).unwrap_or_default().to_string();
        let deleted = self.customers.soft_delete(&customer_id).await?;
        info!("Deleted customer {} for tenant {}", customer_id, tenant_id);
        Ok(deleted)
    }

    /// Writes the billing record for the current period. A second report in
    /// the same period merges into it, later values winning per metric.
    /// Reserved keys in `usage` are ignored.
    pub async fn record_usage(&self, tenant_id: &str, usage: Map<String, Value>) -> Result<Record, DomainError> {
        if tenant_id.trim().is_empty() {
            return Err(DomainError::validation("tenantId must not be empty"));
        }
        AttributeName::check_all(&usage)?;

        let mut usage = usage;
        for reserved in [
            TENANTS.key_field,
            BILLING_RECORDS.key_field,
            "billingPeriod",
            ACTIVE_FLAG_ATTRIBUTE,
        ] {
            usage.remove(reserved);
        }
        if usage.is_empty() {
            return Err(DomainError::validation("Usage must contain at least one metric"));
        }

        let period = Utc::now().timestamp().to_string();
        let key = format!("{}#{}", tenant_id, period);
        let mut record = Record::keyed(&BILLING_RECORDS, key.as_str(), usage.clone());
        record.insert(TENANTS.key_field, tenant_id);
        record.insert("billingPeriod", period);

        match self
            .store
            .put(&BILLING_RECORDS, record.clone(), PutCondition::KeyNotExists)
            .await
        {
            Ok(()) => {
                info!("Created billing record {}", key);
                Ok(record)
            }
            Err(DomainError::RecordAlreadyExists { .. }) => {
                let merged = self
                    .records
                    .apply_partial_update(&key, UpdateRequest::from_map(usage)?)
                    .await?;
                info!("Merged usage into billing record {}", key);
                Ok(merged)
            }
            Err(e) => Err(e),
        }
    }

    /// Onboarding creates a customer, offboarding removes it. Failures are
    /// logged; the event is not redelivered.
    pub async fn handle_event(&self, event: &ControlPlaneEvent) {
        let result = match event.detail_type {
            DetailType::Onboarding => self.on_onboarding(event).await,
            DetailType::Offboarding => self.on_offboarding(event).await,
            DetailType::Activate | DetailType::Deactivate => Ok(()),
        };
        if let Err(e) = result {
            error!("Billing failed to handle {} event: {}", event.detail_type, e);
        }
    }

    async fn on_onboarding(&self, event: &ControlPlaneEvent) -> Result<(), DomainError> {
        // Marketplace subscribers onboard before any tenant exists.
        let Some(tenant_id) = event.detail_str(TENANTS.key_field) else {
            info!("Skipping onboarding without {}", TENANTS.key_field);
            return Ok(());
        };
        let email = required_detail(event, "email")?;
        self.create_customer(tenant_id, email).await.map(|_| ())
    }

    async fn on_offboarding(&self, event: &ControlPlaneEvent) -> Result<(), DomainError> {
        let tenant_id = required_detail(event, TENANTS.key_field)?;
        self.delete_customer(tenant_id).await.map(|_| ())
    }
}

fn required_detail<'a>(event: &'a ControlPlaneEvent, name: &str) -> Result<&'a str, DomainError> {
    event
        .detail_str(name)
        .ok_or_else(|| DomainError::validation(format!("{} event detail is missing {}", event.detail_type, name)))
}
