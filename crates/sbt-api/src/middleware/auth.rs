//! Bearer token authentication for control plane routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use sbt_security::{bearer_token, Principal};

use crate::error::ApiError;
use crate::state::AppState;

/// Validates the bearer token and admits only the system admin role. The
/// caller's [`Principal`] is left in the request extensions.
pub async fn require_sys_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| ApiError::Unauthorized("Malformed authorization header".to_string())))
        .transpose()?;

    let token = bearer_token(header)?;
    let principal = Principal::from(state.jwt.validate_token(token)?);

    if !principal.has_role(&state.sys_admin_role) {
        return Err(ApiError::Forbidden(format!(
            "Role {} is not allowed",
            principal.role.as_deref().unwrap_or("<none>")
        )));
    }

    debug!("Authenticated {}", principal.subject);
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
