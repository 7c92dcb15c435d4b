//! App resolution
//!
//! The pre-login landing flow: given a tenant header and an app name,
//! resolve the organization, the app registration, and the org's instance
//! of that app. No instance means the org has not activated the app, and
//! the client is redirected to the login page.

use crate::AppState;
use atrium_common::db::models::AppInstance;
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::directory::AppRegistration;
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAppResponse {
    pub app: AppRegistration,
    pub instance: AppInstance,
}

/// Resolve an app for the requesting tenant.
pub async fn resolve_app(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(app_name): Path<String>,
) -> Result<Response> {
    let org = state
        .directory
        .org_by_tenant(&tenant.tenant_id)
        .ok_or_else(|| AppError::Validation {
            message: format!("no organization for tenant {}", tenant.tenant_id),
        })?;

    let app = state
        .directory
        .app_by_name(&app_name)
        .ok_or_else(|| AppError::Validation {
            message: format!("unknown app: {app_name}"),
        })?;

    let repo = state.repository(&tenant).await?;
    match repo
        .find_app_instance_by_org_and_name(&org.org_id, &app_name)
        .await?
    {
        Some(instance) => Ok(Json(ResolveAppResponse { app, instance }).into_response()),
        None => {
            debug!(org = %org.org_id, app = %app_name, "no instance, redirecting to login");
            Ok(Redirect::to("/login").into_response())
        }
    }
}
