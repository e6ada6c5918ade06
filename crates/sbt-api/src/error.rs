//! HTTP error mapping

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use sbt_core::error::DomainError;
use sbt_security::JwtError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            e @ DomainError::RecordNotFound { .. } => ApiError::NotFound(e.to_string()),
            e @ DomainError::RecordAlreadyExists { .. } => ApiError::Conflict(e.to_string()),
            DomainError::StorageError(msg) => ApiError::InternalError(msg),
            DomainError::UpstreamError(msg) => ApiError::BadGateway(msg),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                ("BAD_REQUEST", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                ("UNAUTHORIZED", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                ("FORBIDDEN", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                ("NOT_FOUND", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                ("CONFLICT", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("INTERNAL_ERROR", "Unknown error during processing!".to_string())
            }
            ApiError::BadGateway(msg) => {
                tracing::error!("Upstream error: {}", msg);
                ("UPSTREAM_ERROR", msg)
            }
        };

        (status, Json(ApiResponse::<()>::error(code, &message))).into_response()
    }
}
