//! App instance CRUD handlers

use crate::AppState;
use atrium_common::db::models::{AppInstance, CreateAppInstance, UpdateAppInstance};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_app_instances(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<AppInstance>>> {
    let repo = state.repository(&tenant).await?;
    Ok(Json(repo.list_app_instances().await?))
}

pub async fn get_app_instance(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(instance_id): Path<String>,
) -> Result<Json<AppInstance>> {
    let repo = state.repository(&tenant).await?;
    repo.find_app_instance(&instance_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "app instance",
            id: instance_id,
        })
}

pub async fn create_app_instance(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(input): Json<CreateAppInstance>,
) -> Result<(StatusCode, Json<AppInstance>)> {
    let repo = state.repository(&tenant).await?;
    let instance = repo.create_app_instance(input).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

pub async fn update_app_instance(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(instance_id): Path<String>,
    Json(changes): Json<UpdateAppInstance>,
) -> Result<Json<AppInstance>> {
    let repo = state.repository(&tenant).await?;
    repo.update_app_instance(&instance_id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "app instance",
            id: instance_id,
        })
}

pub async fn delete_app_instance(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(instance_id): Path<String>,
) -> Result<StatusCode> {
    let repo = state.repository(&tenant).await?;
    if repo.delete_app_instance(&instance_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            resource: "app instance",
            id: instance_id,
        })
    }
}
