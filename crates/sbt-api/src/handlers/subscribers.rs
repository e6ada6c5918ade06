//! Marketplace subscriber handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use sbt_core::domain::Record;
use sbt_core::services::SubscriberRequest;
use sbt_shared::{Page, Pagination};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/subscriber (public)
pub async fn register_subscriber(
    State(state): State<AppState>,
    body: Result<Json<SubscriberRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let Json(request) = body?;
    let subscriber = state.subscribers.register(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(subscriber))))
}

pub async fn list_subscribers(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<Record>>>, ApiError> {
    let Query(pagination) = query?;
    let page = state.subscribers.list(&pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_subscriber(
    State(state): State<AppState>,
    Path(customer_identifier): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let subscriber = state.subscribers.get(&customer_identifier).await?;
    Ok(Json(ApiResponse::success(subscriber)))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(customer_identifier): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let subscriber = state.subscribers.delete(&customer_identifier).await?;
    Ok(Json(ApiResponse::success(subscriber)))
}
