//! Usage ingestion for the built-in billing provider

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use sbt_core::domain::Record;

use super::{object_body, JsonBody};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/billing/usage
///
/// Body: `{"tenantId": "...", "<metric>": <value>, ...}`.
pub async fn record_usage(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let mut usage = object_body(body)?;
    let tenant_id = match usage.remove("tenantId") {
        Some(Value::String(id)) => id,
        _ => return Err(ApiError::BadRequest("tenantId is required".to_string())),
    };

    let record = state.billing.record_usage(&tenant_id, usage).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}
