//! Tenant registration handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use sbt_core::domain::Record;
use sbt_core::services::{RegistrationChange, RegistrationOutcome, RegistrationRequest};
use sbt_shared::{Page, Pagination};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

type RegistrationBody = Result<Json<RegistrationRequest>, JsonRejection>;

pub async fn create_registration(
    State(state): State<AppState>,
    body: RegistrationBody,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationOutcome>>), ApiError> {
    let Json(request) = body?;
    let outcome = state.registrations.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(outcome))))
}

pub async fn list_registrations(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<Record>>>, ApiError> {
    let Query(pagination) = query?;
    let page = state.registrations.list(&pagination).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let registration = state.registrations.get(&registration_id).await?;
    Ok(Json(ApiResponse::success(registration)))
}

pub async fn update_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
    body: RegistrationBody,
) -> Result<Json<ApiResponse<RegistrationChange>>, ApiError> {
    let Json(request) = body?;
    let change = state.registrations.update(&registration_id, request).await?;
    Ok(Json(ApiResponse::success(change)))
}

pub async fn delete_registration(
    State(state): State<AppState>,
    Path(registration_id): Path<String>,
) -> Result<Json<ApiResponse<Record>>, ApiError> {
    let registration = state.registrations.delete(&registration_id).await?;
    Ok(Json(ApiResponse::success(registration)))
}
