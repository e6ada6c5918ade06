//! Route table

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::middleware::require_sys_admin;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/api/v1/tenant-config", get(handlers::tenant_config::get_tenant_config))
        .route(
            "/api/v1/tenant-config/{tenant_name}",
            get(handlers::tenant_config::get_tenant_config_by_name),
        )
        .route("/api/v1/subscriber", post(handlers::subscribers::register_subscriber));

    // System admin routes
    let protected_routes = Router::new()
        .route(
            "/api/v1/tenants",
            post(handlers::tenants::create_tenant).get(handlers::tenants::list_tenants),
        )
        .route(
            "/api/v1/tenants/{tenant_id}",
            get(handlers::tenants::get_tenant)
                .put(handlers::tenants::update_tenant)
                .patch(handlers::tenants::update_tenant)
                .delete(handlers::tenants::delete_tenant),
        )
        .route(
            "/api/v1/tenant-registrations",
            post(handlers::tenant_registrations::create_registration)
                .get(handlers::tenant_registrations::list_registrations),
        )
        .route(
            "/api/v1/tenant-registrations/{registration_id}",
            get(handlers::tenant_registrations::get_registration)
                .patch(handlers::tenant_registrations::update_registration)
                .delete(handlers::tenant_registrations::delete_registration),
        )
        .route(
            "/api/v1/users",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/api/v1/users/{user_name}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/api/v1/users/{user_name}/enable", put(handlers::users::enable_user))
        .route(
            "/api/v1/users/{user_name}/disable",
            axum::routing::delete(handlers::users::disable_user),
        )
        .route("/api/v1/billing/usage", post(handlers::billing::record_usage))
        .route("/api/v1/subscribers", get(handlers::subscribers::list_subscribers))
        .route(
            "/api/v1/subscribers/{customer_identifier}",
            get(handlers::subscribers::get_subscriber).delete(handlers::subscribers::delete_subscriber),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_sys_admin));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(false)))
}
