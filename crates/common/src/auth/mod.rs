//! Authentication layer
//!
//! Atrium does not verify credentials itself; it wraps an external identity
//! provider behind [`IdentityVerifier`]. What this module owns:
//! - [`Claims`] as returned by the provider, including the tenant binding
//! - the reqwest-backed [`HttpIdentityVerifier`]
//! - signed session cookie helpers in [`session`]

pub mod session;

use crate::config::IdentityConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verified identity assertions from the provider.
///
/// `tenant` is the tenant the credential was minted for; the auth guard
/// cross-checks it against the request's declared tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id at the provider)
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Tenant binding
    pub tenant: String,
    /// Expiry as a unix timestamp, when the provider reports one
    #[serde(default)]
    pub exp: Option<i64>,
}

/// External identity-verification collaborator
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a token and return its claims. A token the provider rejects
    /// maps to [`AppError::InvalidCredential`]; a provider outage maps to
    /// [`AppError::ExternalService`].
    async fn verify_token(&self, token: &str) -> Result<Claims>;

    /// Revoke all refresh tokens for a user (logout)
    async fn revoke_refresh_tokens(&self, user_id: &str) -> Result<()>;
}

/// Identity provider client over HTTP
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    claims: Option<Claims>,
}

impl HttpIdentityVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("identity client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify_token(&self, token: &str) -> Result<Claims> {
        let resp = self
            .request("/v1/tokens:verify")
            .json(&VerifyRequest { token })
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                let body: VerifyResponse = resp.json().await?;
                body.claims.ok_or(AppError::InvalidCredential)
            }
            s if s.is_client_error() => Err(AppError::InvalidCredential),
            s => Err(AppError::ExternalService {
                message: format!("token verification returned {s}"),
            }),
        }
    }

    async fn revoke_refresh_tokens(&self, user_id: &str) -> Result<()> {
        let resp = self
            .request(&format!("/v1/users/{user_id}:revokeRefreshTokens"))
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(AppError::ExternalService {
                message: format!("refresh token revocation returned {}", resp.status()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_deserialize_minimal() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub":"u1","tenant":"acme-t1"}"#).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.tenant, "acme-t1");
        assert!(claims.email.is_none());
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let verifier = HttpIdentityVerifier::new(&IdentityConfig {
            base_url: "http://idp.local/".into(),
            api_key: None,
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(verifier.base_url, "http://idp.local");
    }
}
