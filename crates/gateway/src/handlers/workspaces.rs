//! Workspace CRUD handlers

use crate::AppState;
use atrium_common::db::models::{CreateWorkspace, UpdateWorkspace, Workspace};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_workspaces(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<Workspace>>> {
    let repo = state.repository(&tenant).await?;
    Ok(Json(repo.list_workspaces().await?))
}

pub async fn get_workspace(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(workspace_id): Path<String>,
) -> Result<Json<Workspace>> {
    let repo = state.repository(&tenant).await?;
    repo.find_workspace(&workspace_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "workspace",
            id: workspace_id,
        })
}

pub async fn create_workspace(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(input): Json<CreateWorkspace>,
) -> Result<(StatusCode, Json<Workspace>)> {
    let repo = state.repository(&tenant).await?;
    let workspace = repo.create_workspace(input).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

pub async fn update_workspace(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(workspace_id): Path<String>,
    Json(changes): Json<UpdateWorkspace>,
) -> Result<Json<Workspace>> {
    let repo = state.repository(&tenant).await?;
    repo.update_workspace(&workspace_id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "workspace",
            id: workspace_id,
        })
}

pub async fn delete_workspace(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(workspace_id): Path<String>,
) -> Result<StatusCode> {
    let repo = state.repository(&tenant).await?;
    if repo.delete_workspace(&workspace_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            resource: "workspace",
            id: workspace_id,
        })
    }
}
