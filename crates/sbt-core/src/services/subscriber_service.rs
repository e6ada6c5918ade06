// ============================================================================
// SBT Core - Subscriber Service
// File: crates/sbt-core/src/services/subscriber_service.rs
// Description: Marketplace buyers registering for the product
// ============================================================================

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Map;
use tracing::{error, info};
use validator::Validate;

use sbt_shared::{Page, Pagination};

use super::{list_page, publish_best_effort};
use crate::domain::{DetailType, Record, SUBSCRIBERS};
use crate::error::DomainError;
use crate::repositories::{EventPublisher, PutCondition, RecordStore};
use crate::update::PartialUpdateEngine;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRequest {
    #[validate(length(min = 1, max = 256, message = "Company name must be between 1 and 256 characters"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 256, message = "Contact person must be between 1 and 256 characters"))]
    pub contact_person: String,

    #[validate(length(min = 1, max = 64, message = "Contact phone must be between 1 and 64 characters"))]
    pub contact_phone: String,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
}

impl SubscriberRequest {
    fn trimmed(self) -> Self {
        Self {
            company_name: self.company_name.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
        }
    }
}

pub struct SubscriberService {
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn EventPublisher>,
    engine: PartialUpdateEngine,
}

impl SubscriberService {
    pub fn new(store: Arc<dyn RecordStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        let engine = PartialUpdateEngine::new(store.clone(), SUBSCRIBERS);
        Self { store, publisher, engine }
    }

    /// Stores the subscriber under a fresh `customerIdentifier` and announces
    /// onboarding with the stored item as detail.
    pub async fn register(&self, request: SubscriberRequest) -> Result<Record, DomainError> {
        let request = request.trimmed();
        request.validate()?;
        info!("Registering subscriber for {}", request.company_name);

        let mut subscriber = Record::create(&SUBSCRIBERS, Map::new());
        subscriber.insert("companyName", request.company_name);
        subscriber.insert("contactPerson", request.contact_person);
        subscriber.insert("contactPhone", request.contact_phone);
        subscriber.insert("contactEmail", request.contact_email);
        subscriber.insert("created", Utc::now().timestamp().to_string());

        self.store
            .put(&SUBSCRIBERS, subscriber.clone(), PutCondition::KeyNotExists)
            .await
            .inspect_err(|e| error!("Failed to register subscriber: {}", e))?;

        publish_best_effort(self.publisher.as_ref(), DetailType::Onboarding, subscriber.clone().into_value()).await;
        Ok(subscriber)
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<Page<Record>, DomainError> {
        list_page(self.store.as_ref(), &SUBSCRIBERS, pagination).await
    }

    pub async fn get(&self, customer_identifier: &str) -> Result<Record, DomainError> {
        self.store
            .get(&SUBSCRIBERS, customer_identifier)
            .await?
            .ok_or_else(|| DomainError::not_found(SUBSCRIBERS.name, customer_identifier))
    }

    /// Unsubscribe. Soft delete, no event.
    pub async fn delete(&self, customer_identifier: &str) -> Result<Record, DomainError> {
        info!("Deactivating subscriber {}", customer_identifier);
        self.engine.soft_delete(customer_identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockEventPublisher, MockRecordStore};
    use serde_json::Value;

    fn request(email: &str) -> SubscriberRequest {
        SubscriberRequest {
            company_name: " Acme ".into(),
            contact_person: "Jane".into(),
            contact_phone: "+1-555-0100".into(),
            contact_email: email.into(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_and_announces_onboarding() {
        let mut store = MockRecordStore::new();
        store
            .expect_put()
            .times(1)
            .withf(|table, record, condition| {
                table.name == "subscribers"
                    && *condition == PutCondition::KeyNotExists
                    && record.key(table).is_some()
                    && record.get_str("companyName") == Some("Acme")
                    && record.is_active()
            })
            .returning(|_, _, _| Ok(()));
        let mut publisher = MockEventPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .withf(|detail_type, detail: &Value| {
                *detail_type == DetailType::Onboarding
                    && detail["contactEmail"] == "buyer@acme.test"
                    && detail["customerIdentifier"].is_string()
            })
            .returning(|_, _| Ok(()));

        let service = SubscriberService::new(Arc::new(store), Arc::new(publisher));
        let subscriber = service.register(request("buyer@acme.test")).await.unwrap();
        assert!(subscriber.get_str("created").is_some());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let mut store = MockRecordStore::new();
        store.expect_put().times(0);
        let mut publisher = MockEventPublisher::new();
        publisher.expect_publish().times(0);

        let service = SubscriberService::new(Arc::new(store), Arc::new(publisher));
        let err = service.register(request("nope")).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_company() {
        let mut store = MockRecordStore::new();
        store.expect_put().times(0);

        let service = SubscriberService::new(Arc::new(store), Arc::new(MockEventPublisher::new()));
        let mut blank = request("buyer@acme.test");
        blank.company_name = "  ".into();
        let err = service.register(blank).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_get_missing_subscriber_is_not_found() {
        let mut store = MockRecordStore::new();
        store.expect_get().times(1).returning(|_, _| Ok(None));

        let service = SubscriberService::new(Arc::new(store), Arc::new(MockEventPublisher::new()));
        let err = service.get("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
