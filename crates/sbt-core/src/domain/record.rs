// ============================================================================
// SBT Core - Record Entity
// File: crates/sbt-core/src/domain/record.rs
// Description: Schemaless keyed record with a soft-delete lifecycle flag
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use sbt_shared::constants::ACTIVE_FLAG_ATTRIBUTE;

use super::table::TableSpec;

/// Lifecycle of a record as seen through the API.
///
/// Stored as the boolean `sbtaws_active` attribute. `Inactive` is terminal:
/// nothing in the control plane moves a record back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_flag(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }

    pub fn from_flag(active: bool) -> Self {
        if active {
            RecordStatus::Active
        } else {
            RecordStatus::Inactive
        }
    }
}

/// A uniquely keyed item in a table: attribute name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a brand-new record for `table`: a fresh UUID identifier and an
    /// active flag. Caller-supplied values for either attribute are replaced.
    pub fn create(table: &TableSpec, attributes: Map<String, Value>) -> Self {
        Self::keyed(table, Uuid::new_v4().to_string(), attributes)
    }

    /// Same as [`Record::create`] but with a caller-chosen identifier.
    pub fn keyed(table: &TableSpec, key: impl Into<String>, attributes: Map<String, Value>) -> Self {
        let mut record = Self(attributes);
        record.insert(table.key_field, key.into());
        record.set_status(RecordStatus::Active);
        record
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// The identifier stored under the table's key field.
    pub fn key(&self, table: &TableSpec) -> Option<&str> {
        self.get_str(table.key_field)
    }

    /// Absent or non-boolean flags read as active.
    pub fn status(&self) -> RecordStatus {
        match self.0.get(ACTIVE_FLAG_ATTRIBUTE) {
            Some(Value::Bool(flag)) => RecordStatus::from_flag(*flag),
            _ => RecordStatus::Active,
        }
    }

    pub fn set_status(&mut self, status: RecordStatus) {
        self.insert(ACTIVE_FLAG_ATTRIBUTE, status.as_flag());
    }

    pub fn is_active(&self) -> bool {
        self.status() == RecordStatus::Active
    }

    /// Overlays `other` onto this record; keys in `other` win.
    pub fn merge(&mut self, other: Map<String, Value>) {
        self.0.extend(other);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::TENANTS;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_create_assigns_fresh_key_and_active_flag() {
        let record = Record::create(
            &TENANTS,
            map(json!({"tenantId": "spoofed", "sbtaws_active": false, "name": "Acme"})),
        );

        let key = record.key(&TENANTS).unwrap();
        assert_ne!(key, "spoofed");
        assert!(Uuid::parse_str(key).is_ok());
        assert_eq!(record.status(), RecordStatus::Active);
        assert_eq!(record.get_str("name"), Some("Acme"));
    }

    #[test]
    fn test_status_defaults_to_active() {
        let record = Record::from(map(json!({"tenantId": "t1"})));
        assert!(record.is_active());

        let record = Record::from(map(json!({"tenantId": "t1", "sbtaws_active": "no"})));
        assert!(record.is_active());
    }

    #[test]
    fn test_set_status_inactive() {
        let mut record = Record::keyed(&TENANTS, "t1", Map::new());
        record.set_status(RecordStatus::Inactive);
        assert_eq!(record.get("sbtaws_active"), Some(&json!(false)));
        assert_eq!(record.status(), RecordStatus::Inactive);
    }

    #[test]
    fn test_serializes_transparently() {
        let record = Record::keyed(&TENANTS, "t1", map(json!({"name": "Acme"})));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"tenantId": "t1", "name": "Acme", "sbtaws_active": true}));
    }
}
