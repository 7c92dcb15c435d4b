//! Atrium API Gateway
//!
//! The entry point for all external API requests. Handles:
//! - Tenant resolution from the `X-Tenant-Id` header
//! - Session authentication against the external identity provider
//! - REST and GraphQL request routing
//! - Observability (logging, request ids)

pub mod graphql;
pub mod handlers;
pub mod middleware;

use atrium_common::auth::IdentityVerifier;
use atrium_common::config::AppConfig;
use atrium_common::db::{Repository, TenantPools};
use atrium_common::tenancy::directory::OrgDirectory;
use atrium_common::tenancy::{Service, TenantContext};
use atrium_common::Result;
use axum::{
    http::StatusCode,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_cookies::{CookieManagerLayer, Key};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pools: TenantPools,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub directory: Arc<dyn OrgDirectory>,
    pub cookie_key: Key,
    pub schema: graphql::AtriumSchema,
}

impl AppState {
    /// Repository over the tenant's platform database.
    pub async fn repository(&self, tenant: &TenantContext) -> Result<Repository> {
        self.pools
            .repository(&tenant.tenant_id, Service::Platform)
            .await
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Routes reachable without a session: health probes, session issuance,
    // and app resolution (the pre-login landing flow).
    let public_routes = Router::new()
        .route("/users/{user_id}/token", post(handlers::sessions::issue_token))
        .route("/users/{user_id}/logout", post(handlers::sessions::logout))
        .route("/app/{app_name}", post(handlers::apps::resolve_app));

    // Everything else requires a verified session bound to the tenant.
    let protected_routes = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users", post(handlers::users::create_user))
        .route("/users/{user_id}", get(handlers::users::get_user))
        .route("/users/{user_id}", patch(handlers::users::update_user))
        .route("/users/{user_id}", delete(handlers::users::delete_user))
        .route("/workspaces", get(handlers::workspaces::list_workspaces))
        .route("/workspaces", post(handlers::workspaces::create_workspace))
        .route("/workspaces/{workspace_id}", get(handlers::workspaces::get_workspace))
        .route("/workspaces/{workspace_id}", patch(handlers::workspaces::update_workspace))
        .route("/workspaces/{workspace_id}", delete(handlers::workspaces::delete_workspace))
        .route("/app-instances", get(handlers::app_instances::list_app_instances))
        .route("/app-instances", post(handlers::app_instances::create_app_instance))
        .route("/app-instances/{instance_id}", get(handlers::app_instances::get_app_instance))
        .route("/app-instances/{instance_id}", patch(handlers::app_instances::update_app_instance))
        .route("/app-instances/{instance_id}", delete(handlers::app_instances::delete_app_instance))
        .route("/audit-logs", get(handlers::audit_logs::list_audit_logs))
        .route("/audit-logs", post(handlers::audit_logs::create_audit_log))
        .route("/audit-logs/{audit_id}", get(handlers::audit_logs::get_audit_log))
        .route("/audit-logs/{audit_id}", patch(handlers::audit_logs::update_audit_log))
        .route("/audit-logs/{audit_id}", delete(handlers::audit_logs::delete_audit_log))
        .route("/themes", get(handlers::themes::list_themes))
        .route("/themes", post(handlers::themes::create_theme))
        .route("/themes/{theme_id}", get(handlers::themes::get_theme))
        .route("/themes/{theme_id}", patch(handlers::themes::update_theme))
        .route("/themes/{theme_id}", delete(handlers::themes::delete_theme))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    let api_routes = public_routes.merge(protected_routes);

    let graphql_route = Router::new()
        .route("/graphql", post(graphql::graphql_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    // Compose the app. The cookie manager sits outside the auth middleware
    // so cookie removals on rejected requests still reach the response.
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api/v1", api_routes)
        .merge(graphql_route)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}
