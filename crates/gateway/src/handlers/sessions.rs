//! Session issuance and logout
//!
//! The gateway never mints credentials. It accepts a provider-issued token,
//! verifies it, and parks it in the signed session cookie; logout revokes
//! the provider's refresh tokens and drops the cookie. Both endpoints clear
//! the cookie on every failure path.

use crate::AppState;
use atrium_common::auth::session;
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TenantContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenResponse {
    pub access_token: String,
}

/// Verify a provider token and start a session for the user.
pub async fn issue_token(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(user_id): Path<String>,
    cookies: Cookies,
    Json(payload): Json<IssueTokenRequest>,
) -> Result<Json<IssueTokenResponse>> {
    match start_session(&state, &tenant, &user_id, &cookies, &payload.access_token).await {
        Ok(()) => Ok(Json(IssueTokenResponse {
            access_token: payload.access_token,
        })),
        Err(err) => {
            session::clear(&cookies);
            Err(err)
        }
    }
}

async fn start_session(
    state: &AppState,
    tenant: &TenantContext,
    user_id: &str,
    cookies: &Cookies,
    token: &str,
) -> Result<()> {
    let claims = state.verifier.verify_token(token).await?;
    if claims.sub != user_id {
        return Err(AppError::Unauthorized {
            message: "token subject does not match user".to_string(),
        });
    }
    if claims.tenant != tenant.tenant_id {
        return Err(AppError::TenantMismatch);
    }

    session::issue(cookies, &state.cookie_key, token, &state.config.auth);
    info!(user = %user_id, tenant = %tenant.tenant_id, "session issued");
    Ok(())
}

/// End the session: revoke refresh tokens at the provider, drop the cookie.
///
/// Revocation only happens for the session's own subject. The caller's
/// token is verified and its `sub` must match the path user id.
pub async fn logout(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    cookies: Cookies,
) -> Result<StatusCode> {
    // The cookie is cleared regardless of what the provider says.
    let token = session::read(&cookies, &state.cookie_key);
    session::clear(&cookies);

    let Some(token) = token else {
        return Err(AppError::Unauthorized {
            message: "no active session".to_string(),
        });
    };

    let claims = state.verifier.verify_token(&token).await?;
    if claims.sub != user_id {
        return Err(AppError::Unauthorized {
            message: "session does not belong to user".to_string(),
        });
    }

    state.verifier.revoke_refresh_tokens(&user_id).await?;
    info!(user = %user_id, "session revoked");
    Ok(StatusCode::NO_CONTENT)
}
