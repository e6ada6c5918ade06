//! Partial attribute updates
//!
//! [`UpdateRequest`] is what callers hand in: a possibly empty list of
//! attribute edits that may still carry the identifier. The engine strips the
//! identifier and turns the rest into an [`UpdateExpression`], which is never
//! empty and binds every name and value through placeholders.

pub mod expression;
pub mod request;
pub mod engine;

pub use expression::{AttributeName, SetClause, UpdateExpression, UpdateExpressionBuilder};
pub use request::UpdateRequest;
pub use engine::PartialUpdateEngine;
