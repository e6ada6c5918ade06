//! Event publisher trait (port)

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DetailType;
use crate::error::DomainError;

/// Announces lifecycle transitions to other systems. The bus name and event
/// source are fixed by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, detail_type: DetailType, detail: Value) -> Result<(), DomainError>;
}
