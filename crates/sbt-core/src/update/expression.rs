// ============================================================================
// SBT Core - Update Expression Builder
// File: crates/sbt-core/src/update/expression.rs
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::Record;
use crate::error::DomainError;

const MAX_ATTRIBUTE_NAME_LEN: usize = 255;

static ATTRIBUTE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").expect("attribute name pattern is valid")
});

/// A validated attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        if name.len() > MAX_ATTRIBUTE_NAME_LEN {
            return Err(DomainError::validation(format!(
                "Attribute name longer than {} characters",
                MAX_ATTRIBUTE_NAME_LEN
            )));
        }
        if !ATTRIBUTE_NAME.is_match(name) {
            return Err(DomainError::validation(format!("Invalid attribute name: {:?}", name)));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks every key of an attribute map.
    pub fn check_all(attributes: &Map<String, Value>) -> Result<(), DomainError> {
        attributes.keys().try_for_each(|name| Self::parse(name).map(|_| ()))
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `#fN = :vN` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    name: AttributeName,
    value: Value,
}

impl SetClause {
    pub fn name(&self) -> &AttributeName {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Non-empty list of set-clauses applied as one conditional write.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    clauses: Vec<SetClause>,
}

impl UpdateExpression {
    pub fn builder() -> UpdateExpressionBuilder {
        UpdateExpressionBuilder::default()
    }

    pub fn clauses(&self) -> &[SetClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Never true for a built expression.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn name_placeholder(index: usize) -> String {
        format!("#f{}", index)
    }

    fn value_placeholder(index: usize) -> String {
        format!(":v{}", index)
    }

    /// `SET #f0 = :v0, #f1 = :v1`
    pub fn statement(&self) -> String {
        let assignments: Vec<String> = (0..self.clauses.len())
            .map(|i| format!("{} = {}", Self::name_placeholder(i), Self::value_placeholder(i)))
            .collect();
        format!("SET {}", assignments.join(", "))
    }

    /// Applies every clause to `record` in order.
    pub fn apply_to(&self, record: &mut Record) {
        for clause in &self.clauses {
            record.insert(clause.name.as_str(), clause.value.clone());
        }
    }
}

#[derive(Debug, Default)]
pub struct UpdateExpressionBuilder {
    clauses: Vec<SetClause>,
}

impl UpdateExpressionBuilder {
    /// Adds an assignment. Setting the same name twice keeps one clause with
    /// the latest value.
    pub fn set(mut self, name: AttributeName, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.clauses.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.value = value,
            None => self.clauses.push(SetClause { name, value }),
        }
        self
    }

    pub fn build(self) -> Result<UpdateExpression, DomainError> {
        if self.clauses.is_empty() {
            return Err(DomainError::validation("Update expression has no set-clauses"));
        }
        Ok(UpdateExpression { clauses: self.clauses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> AttributeName {
        AttributeName::parse(s).unwrap()
    }

    #[test]
    fn test_statement_has_no_trailing_separator() {
        let expr = UpdateExpression::builder()
            .set(name("name"), "Acme Corp")
            .set(name("tier"), "gold")
            .build()
            .unwrap();

        assert_eq!(expr.statement(), "SET #f0 = :v0, #f1 = :v1");
        assert_eq!(expr.clauses()[1].name().as_str(), "tier");
        assert_eq!(expr.clauses()[0].value(), &json!("Acme Corp"));
    }

    #[test]
    fn test_single_clause_statement() {
        let expr = UpdateExpression::builder()
            .set(name("sbtaws_active"), false)
            .build()
            .unwrap();
        assert_eq!(expr.statement(), "SET #f0 = :v0");
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        let err = UpdateExpression::builder().build().unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[test]
    fn test_duplicate_name_keeps_last_value() {
        let expr = UpdateExpression::builder()
            .set(name("a"), 1)
            .set(name("a"), 2)
            .build()
            .unwrap();
        assert_eq!(expr.len(), 1);
        assert_eq!(expr.clauses()[0].value(), &json!(2));
    }

    #[test]
    fn test_attribute_name_validation() {
        assert!(AttributeName::parse("custom:userRole").is_ok());
        assert!(AttributeName::parse("tenant.config-v2").is_ok());
        assert!(AttributeName::parse("").is_err());
        assert!(AttributeName::parse("name = :x, admin").is_err());
        assert!(AttributeName::parse("9lives").is_err());
        assert!(AttributeName::parse(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_apply_to_overrides_fields() {
        let mut record = Record::new();
        record.insert("name", "Acme");
        record.insert("plan", "basic");

        UpdateExpression::builder()
            .set(name("name"), "Acme Corp")
            .build()
            .unwrap()
            .apply_to(&mut record);

        assert_eq!(record.get_str("name"), Some("Acme Corp"));
        assert_eq!(record.get_str("plan"), Some("basic"));
    }
}
