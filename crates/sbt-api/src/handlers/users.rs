//! User management handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use sbt_core::domain::Record;
use sbt_core::services::{CreateUserRequest, UpdateUserRequest};
use sbt_shared::{Page, Pagination};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Record>>), ApiError> {
    let Json(request) = body?;
    let user = state.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<Record>>>, ApiError> {
    let Query(pagination) = query?;
    let page = state.users.list(&pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let user = state.users.get(&user_name).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let Json(request) = body?;
    let user = state.users.update(&user_name, request).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn enable_user(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let user = state.users.enable(&user_name).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn disable_user(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let user = state.users.disable(&user_name).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let user = state.users.delete(&user_name).await?;
    Ok(Json(ApiResponse::success(user)))
}
