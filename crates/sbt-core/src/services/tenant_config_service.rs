//! Tenant configuration lookups

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use super::find_first;
use crate::domain::{Record, TENANTS};
use crate::error::DomainError;
use crate::repositories::RecordStore;

pub const TENANT_CONFIG_ATTRIBUTE: &str = "tenantConfig";
pub const TENANT_NAME_ATTRIBUTE: &str = "tenantName";

pub struct TenantConfigService {
    store: Arc<dyn RecordStore>,
}

impl TenantConfigService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn by_tenant_id(&self, tenant_id: &str) -> Result<Value, DomainError> {
        info!("Looking up tenant config for id {}", tenant_id);
        let tenant = self.store.get(&TENANTS, tenant_id).await?;
        config_of(tenant, tenant_id)
    }

    pub async fn by_tenant_name(&self, tenant_name: &str) -> Result<Value, DomainError> {
        info!("Looking up tenant config for name {}", tenant_name);
        let tenant = find_first(self.store.as_ref(), &TENANTS, |r| {
            r.get_str(TENANT_NAME_ATTRIBUTE) == Some(tenant_name)
        })
        .await?;
        config_of(tenant, tenant_name)
    }

    pub async fn by_origin(&self, origin: &str) -> Result<Value, DomainError> {
        let tenant_name = tenant_name_from_origin(origin)?;
        self.by_tenant_name(&tenant_name).await
    }
}

fn config_of(tenant: Option<Record>, lookup: &str) -> Result<Value, DomainError> {
    tenant
        .and_then(|t| t.get(TENANT_CONFIG_ATTRIBUTE).cloned())
        .ok_or_else(|| {
            error!("No tenant details found for {}", lookup);
            DomainError::not_found(TENANTS.name, lookup)
        })
}

/// `https://acme.app.example.com:8443` is tenant `acme`.
pub fn tenant_name_from_origin(origin: &str) -> Result<String, DomainError> {
    let host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .ok_or_else(|| DomainError::validation("Origin header must include a scheme"))?;
    let host = host.split(['/', ':']).next().unwrap_or_default();
    match host.split('.').next() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(DomainError::validation("Unable to parse tenant name from Origin header")),
    }
}
