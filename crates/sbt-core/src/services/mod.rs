//! Control plane services

pub mod tenant_service;
pub mod tenant_registration_service;
pub mod user_service;
pub mod tenant_config_service;
pub mod billing_service;
pub mod subscriber_service;

pub use tenant_service::TenantService;
pub use tenant_registration_service::{RegistrationChange, RegistrationOutcome, RegistrationRequest, TenantRegistrationService};
pub use user_service::{CreateUserRequest, UpdateUserRequest, UserService};
pub use tenant_config_service::TenantConfigService;
pub use billing_service::BillingService;
pub use subscriber_service::{SubscriberRequest, SubscriberService};

use serde_json::{Map, Value};
use tracing::{error, info};

use sbt_shared::constants::{ACTIVE_FLAG_ATTRIBUTE, MAX_PAGE_SIZE};
use sbt_shared::{Page, Pagination};

use crate::domain::{DetailType, Record, TableSpec};
use crate::error::DomainError;
use crate::repositories::{EventPublisher, RecordStore};
use crate::update::{AttributeName, UpdateRequest};

/// Checks caller-supplied edits. The lifecycle flag is only written by soft
/// delete, so an edit naming it is rejected.
pub(crate) fn check_edits(attributes: &Map<String, Value>) -> Result<(), DomainError> {
    AttributeName::check_all(attributes)?;
    if attributes.contains_key(ACTIVE_FLAG_ATTRIBUTE) {
        return Err(DomainError::validation(format!(
            "{} cannot be changed through an update",
            ACTIVE_FLAG_ATTRIBUTE
        )));
    }
    Ok(())
}

/// [`check_edits`] then conversion into an engine request.
pub(crate) fn edit_request(attributes: Map<String, Value>) -> Result<UpdateRequest, DomainError> {
    check_edits(&attributes)?;
    UpdateRequest::from_map(attributes)
}

/// Publishes an event after a committed write. A failure is logged and
/// swallowed; the write is not rolled back.
pub(crate) async fn publish_best_effort(publisher: &dyn EventPublisher, detail_type: DetailType, detail: Value) {
    match publisher.publish(detail_type, detail).await {
        Ok(()) => info!("Published {} event", detail_type),
        Err(e) => error!("Failed to publish {} event: {}", detail_type, e),
    }
}

/// One page of `table` according to the caller's pagination.
pub(crate) async fn list_page(
    store: &dyn RecordStore,
    table: &TableSpec,
    pagination: &Pagination,
) -> Result<Page<Record>, DomainError> {
    let limit = pagination
        .page_size()
        .ok_or_else(|| DomainError::validation("limit must be greater than zero"))?;
    store
        .scan(table, limit, pagination.start_key().map(str::to_string))
        .await
}

/// Walks `table` in key order and returns the first record matching `pred`.
pub(crate) async fn find_first<F>(
    store: &dyn RecordStore,
    table: &TableSpec,
    pred: F,
) -> Result<Option<Record>, DomainError>
where
    F: Fn(&Record) -> bool,
{
    let mut start_key = None;
    loop {
        let page = store.scan(table, MAX_PAGE_SIZE, start_key).await?;
        if let Some(found) = page.items.into_iter().find(|r| pred(r)) {
            return Ok(Some(found));
        }
        match page.next_token {
            Some(next) => start_key = Some(next),
            None => return Ok(None),
        }
    }
}
