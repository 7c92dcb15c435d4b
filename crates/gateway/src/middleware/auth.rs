//! Session authentication middleware
//!
//! A request passes through four states before it reaches a protected
//! handler: no credential, credential present, verified, tenant matched.
//! Any failed transition rejects the request, and every rejection clears
//! the session cookie so the client cannot retry with a credential the
//! gateway has already refused.

use crate::AppState;
use atrium_common::auth::{session, Claims};
use atrium_common::errors::{AppError, Result};
use atrium_common::tenancy::TENANT_HEADER;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;
use tracing::debug;

/// Require a verified session bound to the request's tenant.
///
/// On success the verified [`Claims`] are inserted into request extensions
/// for downstream handlers.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, &cookies, request.headers()).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => {
            session::clear(&cookies);
            err.into_response()
        }
    }
}

async fn authenticate(state: &AppState, cookies: &Cookies, headers: &HeaderMap) -> Result<Claims> {
    // NoCredential -> CredentialPresent
    let token = session::read(cookies, &state.cookie_key).ok_or(AppError::Unauthorized {
        message: "missing session".to_string(),
    })?;

    // CredentialPresent -> Verified
    let claims = state.verifier.verify_token(&token).await?;

    // Verified -> TenantMatched
    let tenant = headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingTenant)?;

    if claims.tenant != tenant {
        debug!(sub = %claims.sub, "session tenant does not match request tenant");
        return Err(AppError::TenantMismatch);
    }

    Ok(claims)
}
