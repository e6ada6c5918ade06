//! HTTP handlers

pub mod health;
pub mod tenants;
pub mod tenant_registrations;
pub mod users;
pub mod tenant_config;
pub mod billing;
pub mod subscribers;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

use crate::error::ApiError;

pub type JsonBody = Result<Json<Map<String, Value>>, JsonRejection>;

/// Unwraps a JSON object body, turning extractor rejections into 400s.
pub(crate) fn object_body(body: JsonBody) -> Result<Map<String, Value>, ApiError> {
    let Json(map) = body?;
    Ok(map)
}
