//! Key-value record store trait (port)

use async_trait::async_trait;

use sbt_shared::Page;

use crate::domain::{Record, TableSpec};
use crate::error::DomainError;
use crate::update::UpdateExpression;

pub type ScanPage = Page<Record>;

/// Precondition for [`RecordStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutCondition {
    /// Replace whatever is stored under the key.
    Overwrite,
    /// Fail with `RecordAlreadyExists` if the key is taken.
    KeyNotExists,
}

/// One table per resource kind, addressed by [`TableSpec`].
///
/// Implementations map a failed condition to `RecordNotFound` /
/// `RecordAlreadyExists` and every other failure to `StorageError`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, table: &TableSpec, key: &str) -> Result<Option<Record>, DomainError>;

    /// `record` must carry the table's key field.
    async fn put(&self, table: &TableSpec, record: Record, condition: PutCondition) -> Result<(), DomainError>;

    /// Applies every set-clause atomically, conditioned on `key` existing, and
    /// returns the whole record after the write.
    async fn update(
        &self,
        table: &TableSpec,
        key: &str,
        expression: &UpdateExpression,
    ) -> Result<Record, DomainError>;

    /// Up to `limit` records in key order, starting after `start_key`.
    /// `next_token` is set to the last returned key when more remain.
    async fn scan(
        &self,
        table: &TableSpec,
        limit: usize,
        start_key: Option<String>,
    ) -> Result<ScanPage, DomainError>;
}
