//! Tenant configuration lookups (public)

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::ORIGIN, HeaderMap},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfigQuery {
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
}

/// GET /api/v1/tenant-config
///
/// Looks the tenant up by `tenantId`, then `tenantName`, then the host in the
/// `Origin` header.
pub async fn get_tenant_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<TenantConfigQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let Query(query) = query?;

    let config = if let Some(tenant_id) = non_empty(query.tenant_id) {
        state.tenant_config.by_tenant_id(&tenant_id).await?
    } else if let Some(tenant_name) = non_empty(query.tenant_name) {
        state.tenant_config.by_tenant_name(&tenant_name).await?
    } else {
        let origin = headers
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::BadRequest("Origin header missing!".to_string()))?;
        info!("Resolving tenant config from origin {}", origin);
        state.tenant_config.by_origin(origin).await?
    };

    Ok(Json(ApiResponse::success(config)))
}

/// GET /api/v1/tenant-config/{tenant_name}
pub async fn get_tenant_config_by_name(
    State(state): State<AppState>,
    Path(tenant_name): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let config = state.tenant_config.by_tenant_name(&tenant_name).await?;
    Ok(Json(ApiResponse::success(config)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
