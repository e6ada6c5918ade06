use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use sbt_core::domain::TENANTS;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Ready once the record store answers a one-item scan.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store.scan(&TENANTS, 1, None).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!("Readiness check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
