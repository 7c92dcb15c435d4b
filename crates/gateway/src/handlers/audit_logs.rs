//! Account audit log CRUD handlers

use crate::AppState;
use atrium_common::db::models::{AccountAuditLog, CreateAccountAuditLog, UpdateAccountAuditLog};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_audit_logs(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<AccountAuditLog>>> {
    let repo = state.repository(&tenant).await?;
    Ok(Json(repo.list_audit_logs().await?))
}

pub async fn get_audit_log(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(audit_id): Path<String>,
) -> Result<Json<AccountAuditLog>> {
    let repo = state.repository(&tenant).await?;
    repo.find_audit_log(&audit_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "audit log",
            id: audit_id,
        })
}

pub async fn create_audit_log(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(input): Json<CreateAccountAuditLog>,
) -> Result<(StatusCode, Json<AccountAuditLog>)> {
    let repo = state.repository(&tenant).await?;
    let entry = repo.create_audit_log(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_audit_log(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(audit_id): Path<String>,
    Json(changes): Json<UpdateAccountAuditLog>,
) -> Result<Json<AccountAuditLog>> {
    let repo = state.repository(&tenant).await?;
    repo.update_audit_log(&audit_id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "audit log",
            id: audit_id,
        })
}

pub async fn delete_audit_log(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(audit_id): Path<String>,
) -> Result<StatusCode> {
    let repo = state.repository(&tenant).await?;
    if repo.delete_audit_log(&audit_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            resource: "audit log",
            id: audit_id,
        })
    }
}
