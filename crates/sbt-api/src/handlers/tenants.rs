// ============================================================================
// SBT API - Tenant Handlers
// File: crates/sbt-api/src/handlers/tenants.rs
// ============================================================================
//! Tenant CRUD handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use sbt_core::domain::Record;
use sbt_shared::{Page, Pagination};

use super::{object_body, JsonBody};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/tenants
pub async fn create_tenant(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let tenant = state.tenants.create(object_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tenant))))
}

/// GET /api/v1/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<Record>>>, ApiError> {
    let Query(pagination) = query?;
    let page = state.tenants.list(&pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/v1/tenants/{tenant_id}
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let tenant = state.tenants.get(&tenant_id).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// PUT|PATCH /api/v1/tenants/{tenant_id}
pub async fn update_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    body: JsonBody,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let tenant = state.tenants.update(&tenant_id, object_body(body)?).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// DELETE /api/v1/tenants/{tenant_id}
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let tenant = state.tenants.delete(&tenant_id).await?;
    Ok(Json(ApiResponse::success(tenant)))
}
