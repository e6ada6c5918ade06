// ============================================================================
// SBT Infrastructure - In-Memory Record Store
// File: crates/sbt-infrastructure/src/memory/record_store_impl.rs
// ============================================================================

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use sbt_core::domain::{Record, TableSpec};
use sbt_core::error::DomainError;
use sbt_core::repositories::{PutCondition, RecordStore, ScanPage};
use sbt_core::update::UpdateExpression;

type Table = BTreeMap<String, Record>;

/// Tables kept in process memory. Every write holds the lock for its whole
/// read-modify-write, so updates to disjoint fields never lose each other.
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `table`, active or not.
    pub fn len(&self, table: &TableSpec) -> usize {
        self.tables.read().get(table.name).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, table: &TableSpec) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, table: &TableSpec, key: &str) -> Result<Option<Record>, DomainError> {
        Ok(self
            .tables
            .read()
            .get(table.name)
            .and_then(|t| t.get(key))
            .cloned())
    }

    async fn put(&self, table: &TableSpec, record: Record, condition: PutCondition) -> Result<(), DomainError> {
        let key = record
            .key(table)
            .ok_or_else(|| DomainError::validation(format!("Record is missing {}", table.key_field)))?
            .to_string();

        let mut tables = self.tables.write();
        let rows = tables.entry(table.name).or_default();
        if condition == PutCondition::KeyNotExists && rows.contains_key(&key) {
            return Err(DomainError::RecordAlreadyExists { table: table.name, key });
        }
        debug!("Stored {} in {}", key, table.name);
        rows.insert(key, record);
        Ok(())
    }

    async fn update(
        &self,
        table: &TableSpec,
        key: &str,
        expression: &UpdateExpression,
    ) -> Result<Record, DomainError> {
        let mut tables = self.tables.write();
        let record = tables
            .get_mut(table.name)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| DomainError::not_found(table.name, key))?;

        expression.apply_to(record);
        Ok(record.clone())
    }

    async fn scan(
        &self,
        table: &TableSpec,
        limit: usize,
        start_key: Option<String>,
    ) -> Result<ScanPage, DomainError> {
        let tables = self.tables.read();
        let Some(rows) = tables.get(table.name) else {
            return Ok(ScanPage::new(Vec::new(), None));
        };

        let lower = match &start_key {
            Some(k) => Bound::Excluded(k.clone()),
            None => Bound::Unbounded,
        };
        let mut range = rows.range((lower, Bound::Unbounded));

        let items: Vec<Record> = range.by_ref().take(limit).map(|(_, r)| r.clone()).collect();
        let next_token = match range.next() {
            Some(_) => items.last().and_then(|r| r.key(table)).map(str::to_string),
            None => None,
        };
        Ok(ScanPage::new(items, next_token))
    }
}
