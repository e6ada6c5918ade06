//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Record {key} not found in {table}")]
    RecordNotFound { table: &'static str, key: String },

    #[error("Record {key} already exists in {table}")]
    RecordAlreadyExists { table: &'static str, key: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::ValidationError(message.into())
    }

    pub fn not_found(table: &'static str, key: impl Into<String>) -> Self {
        DomainError::RecordNotFound { table, key: key.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::RecordNotFound { .. })
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
