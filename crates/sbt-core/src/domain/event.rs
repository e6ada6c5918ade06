//! Control plane lifecycle events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle transition announced to other systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailType {
    Onboarding,
    Offboarding,
    Activate,
    Deactivate,
}

impl DetailType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailType::Onboarding => "Onboarding",
            DetailType::Offboarding => "Offboarding",
            DetailType::Activate => "Activate",
            DetailType::Deactivate => "Deactivate",
        }
    }
}

impl std::fmt::Display for DetailType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope put on the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneEvent {
    pub event_bus_name: String,
    pub source: String,
    pub detail_type: DetailType,
    pub detail: Value,
    pub time: DateTime<Utc>,
}

impl ControlPlaneEvent {
    pub fn new(bus: impl Into<String>, source: impl Into<String>, detail_type: DetailType, detail: Value) -> Self {
        Self {
            event_bus_name: bus.into(),
            source: source.into(),
            detail_type,
            detail,
            time: Utc::now(),
        }
    }

    pub fn detail_str(&self, name: &str) -> Option<&str> {
        self.detail.get(name).and_then(Value::as_str)
    }
}
