//! Theme CRUD handlers

use crate::AppState;
use atrium_common::db::models::{CreateTheme, Theme, UpdateTheme};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_themes(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<Theme>>> {
    let repo = state.repository(&tenant).await?;
    Ok(Json(repo.list_themes().await?))
}

pub async fn get_theme(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(theme_id): Path<String>,
) -> Result<Json<Theme>> {
    let repo = state.repository(&tenant).await?;
    repo.find_theme(&theme_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "theme",
            id: theme_id,
        })
}

pub async fn create_theme(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(input): Json<CreateTheme>,
) -> Result<(StatusCode, Json<Theme>)> {
    let repo = state.repository(&tenant).await?;
    let theme = repo.create_theme(input).await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

pub async fn update_theme(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(theme_id): Path<String>,
    Json(changes): Json<UpdateTheme>,
) -> Result<Json<Theme>> {
    let repo = state.repository(&tenant).await?;
    repo.update_theme(&theme_id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "theme",
            id: theme_id,
        })
}

pub async fn delete_theme(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(theme_id): Path<String>,
) -> Result<StatusCode> {
    let repo = state.repository(&tenant).await?;
    if repo.delete_theme(&theme_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            resource: "theme",
            id: theme_id,
        })
    }
}
