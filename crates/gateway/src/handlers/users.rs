//! User CRUD handlers

use crate::AppState;
use atrium_common::db::models::{CreateUser, UpdateUser, User};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_users(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<Json<Vec<User>>> {
    let repo = state.repository(&tenant).await?;
    Ok(Json(repo.list_users().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
) -> Result<Json<User>> {
    let repo = state.repository(&tenant).await?;
    repo.find_user(&user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "user",
            id: user_id,
        })
}

pub async fn create_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    let repo = state.repository(&tenant).await?;
    let user = repo.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
    Json(changes): Json<UpdateUser>,
) -> Result<Json<User>> {
    let repo = state.repository(&tenant).await?;
    repo.update_user(&user_id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound {
            resource: "user",
            id: user_id,
        })
}

pub async fn delete_user(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    let repo = state.repository(&tenant).await?;
    if repo.delete_user(&user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound {
            resource: "user",
            id: user_id,
        })
    }
}
