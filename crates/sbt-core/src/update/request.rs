//! Caller-facing update request

use serde_json::{Map, Value};

use super::expression::{AttributeName, UpdateExpression};
use crate::error::DomainError;

/// Attribute edits requested by a caller. May be empty and may still contain
/// the record identifier; [`PartialUpdateEngine`](super::PartialUpdateEngine)
/// deals with both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    fields: Vec<(AttributeName, Value)>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key of `map` must be a valid attribute name.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, DomainError> {
        let mut request = Self::new();
        for (name, value) in map {
            request.fields.push((AttributeName::parse(&name)?, value));
        }
        Ok(request)
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Result<Self, DomainError> {
        self.fields.push((AttributeName::parse(name)?, value.into()));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drops every edit targeting `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(n, _)| n.as_str() != name);
        self
    }

    pub fn into_expression(self) -> Result<UpdateExpression, DomainError> {
        self.fields
            .into_iter()
            .fold(UpdateExpression::builder(), |builder, (name, value)| builder.set(name, value))
            .build()
    }
}
