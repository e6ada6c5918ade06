//! In-process control plane event bus

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use sbt_core::domain::{ControlPlaneEvent, DetailType};
use sbt_core::error::DomainError;
use sbt_core::repositories::EventPublisher;
use sbt_shared::config::EventSettings;

/// Fans control plane events out to in-process subscribers such as billing.
pub struct EventBus {
    bus_name: String,
    source: String,
    tx: broadcast::Sender<ControlPlaneEvent>,
}

impl EventBus {
    pub fn new(bus_name: impl Into<String>, source: impl Into<String>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            bus_name: bus_name.into(),
            source: source.into(),
            tx,
        }
    }

    pub fn from_settings(settings: &EventSettings) -> Self {
        Self::new(settings.bus_name.clone(), settings.source.clone(), settings.capacity)
    }

    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControlPlaneEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, detail_type: DetailType, detail: Value) -> Result<(), DomainError> {
        let event = ControlPlaneEvent::new(&self.bus_name, &self.source, detail_type, detail);
        match self.tx.send(event) {
            Ok(receivers) => debug!("Event {} delivered to {} subscribers", detail_type, receivers),
            Err(e) => warn!("Failed to publish event (maybe no subscribers): {}", e),
        }
        Ok(())
    }
}
