use std::sync::Arc;

use sbt_core::repositories::{EventPublisher, RecordStore};
use sbt_core::services::{
    BillingService, SubscriberService, TenantConfigService, TenantRegistrationService, TenantService, UserService,
};
use sbt_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub tenants: Arc<TenantService>,
    pub registrations: Arc<TenantRegistrationService>,
    pub users: Arc<UserService>,
    pub tenant_config: Arc<TenantConfigService>,
    pub billing: Arc<BillingService>,
    pub subscribers: Arc<SubscriberService>,
    pub jwt: Arc<JwtService>,
    pub sys_admin_role: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        publisher: Arc<dyn EventPublisher>,
        jwt: JwtService,
        sys_admin_role: impl Into<String>,
    ) -> Self {
        let tenants = Arc::new(TenantService::new(store.clone(), publisher.clone()));
        Self {
            registrations: Arc::new(TenantRegistrationService::new(
                store.clone(),
                publisher.clone(),
                tenants.clone(),
            )),
            subscribers: Arc::new(SubscriberService::new(store.clone(), publisher)),
            users: Arc::new(UserService::new(store.clone())),
            tenant_config: Arc::new(TenantConfigService::new(store.clone())),
            billing: Arc::new(BillingService::new(store.clone())),
            tenants,
            store,
            jwt: Arc::new(jwt),
            sys_admin_role: sys_admin_role.into(),
        }
    }
}
