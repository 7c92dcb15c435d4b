//! Tenant resolution and request-scoped tenant context
//!
//! Every tenant-scoped request carries an `X-Tenant-Id` header. The
//! [`TenantContext`] extractor rejects requests without it, and the
//! [`ServiceDirectory`] maps (tenant, service) pairs to backing-store URLs.
//! The context is a plain value threaded through the request's handling
//! path; it is never stored in process-wide state, so concurrently handled
//! requests cannot observe each other's tenant.

pub mod directory;

use crate::config::TenancyConfig;
use crate::errors::{AppError, Result};
use axum::{extract::FromRequestParts, http::request::Parts};
use std::fmt;
use std::str::FromStr;

/// Header naming the tenant on every tenant-scoped request
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Logical backing services a tenant may have a distinct store for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Platform,
    Jira,
    Gitlab,
    Jenkins,
    Sonarqube,
    Sonarscanner,
    Sonarcloud,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Platform => "platform",
            Service::Jira => "jira",
            Service::Gitlab => "gitlab",
            Service::Jenkins => "jenkins",
            Service::Sonarqube => "sonarqube",
            Service::Sonarscanner => "sonarscanner",
            Service::Sonarcloud => "sonarcloud",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "platform" => Ok(Service::Platform),
            "jira" => Ok(Service::Jira),
            "gitlab" => Ok(Service::Gitlab),
            "jenkins" => Ok(Service::Jenkins),
            "sonarqube" => Ok(Service::Sonarqube),
            "sonarscanner" => Ok(Service::Sonarscanner),
            "sonarcloud" => Ok(Service::Sonarcloud),
            other => Err(AppError::Validation {
                message: format!("unknown service: {other}"),
            }),
        }
    }
}

/// Resolves a (tenant, service) pair to a connection URL.
///
/// Failure is always a distinct [`AppError::ServiceNotFound`], never an
/// empty URL. Implementations must be safe to call from concurrently
/// handled requests.
pub trait ServiceDirectory: Send + Sync {
    fn service_url(&self, tenant_id: &str, service: Service) -> Result<String>;
}

/// Directory backed by static deployment configuration.
///
/// URLs come from [`TenancyConfig::services`], with `{tenant}` substituted
/// per call. A control-plane-backed implementation can replace this behind
/// the same trait without touching callers.
#[derive(Debug, Clone)]
pub struct ConfigServiceDirectory {
    config: TenancyConfig,
}

impl ConfigServiceDirectory {
    pub fn new(config: TenancyConfig) -> Self {
        Self { config }
    }
}

impl ServiceDirectory for ConfigServiceDirectory {
    fn service_url(&self, tenant_id: &str, service: Service) -> Result<String> {
        if tenant_id.trim().is_empty() {
            return Err(AppError::MissingTenant);
        }
        if let Some(tenants) = &self.config.tenants {
            if !tenants.iter().any(|t| t == tenant_id) {
                return Err(AppError::ServiceNotFound {
                    tenant: tenant_id.to_owned(),
                    service: service.as_str().to_owned(),
                });
            }
        }
        match self.config.services.get(service.as_str()) {
            Some(url) if !url.trim().is_empty() => Ok(url.replace("{tenant}", tenant_id)),
            _ => Err(AppError::ServiceNotFound {
                tenant: tenant_id.to_owned(),
                service: service.as_str().to_owned(),
            }),
        }
    }
}

/// Request-scoped tenant identity.
///
/// Created once per inbound request from the tenant header and dropped at
/// request end. Cheap to clone; passed explicitly to everything that needs
/// tenant-scoped resources.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(TenantContext::new)
            .ok_or(AppError::MissingTenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn directory() -> ConfigServiceDirectory {
        let mut services = HashMap::new();
        services.insert(
            "platform".to_string(),
            "sqlite://data/{tenant}-platform.db".to_string(),
        );
        services.insert("jira".to_string(), "sqlite://data/{tenant}-jira.db".to_string());
        ConfigServiceDirectory::new(TenancyConfig {
            services,
            tenants: None,
            directory_file: None,
        })
    }

    #[test]
    fn test_resolves_tenant_url() {
        let dir = directory();
        let url = dir.service_url("acme", Service::Platform).unwrap();
        assert_eq!(url, "sqlite://data/acme-platform.db");
    }

    #[test]
    fn test_unconfigured_service_fails() {
        let dir = directory();
        let err = dir.service_url("acme", Service::Gitlab).unwrap_err();
        assert!(matches!(err, AppError::ServiceNotFound { .. }));
    }

    #[test]
    fn test_unknown_tenant_fails_with_allow_list() {
        let mut services = HashMap::new();
        services.insert("platform".to_string(), "sqlite://p.db".to_string());
        let dir = ConfigServiceDirectory::new(TenancyConfig {
            services,
            tenants: Some(vec!["acme".to_string()]),
            directory_file: None,
        });
        assert!(dir.service_url("acme", Service::Platform).is_ok());
        let err = dir.service_url("intruder", Service::Platform).unwrap_err();
        assert!(matches!(err, AppError::ServiceNotFound { .. }));
    }

    #[test]
    fn test_empty_tenant_rejected() {
        let dir = directory();
        let err = dir.service_url("  ", Service::Platform).unwrap_err();
        assert!(matches!(err, AppError::MissingTenant));
    }

    #[test]
    fn test_service_round_trip() {
        for s in [
            Service::Platform,
            Service::Jira,
            Service::Gitlab,
            Service::Jenkins,
            Service::Sonarqube,
            Service::Sonarscanner,
            Service::Sonarcloud,
        ] {
            assert_eq!(s.as_str().parse::<Service>().unwrap(), s);
        }
        assert!("mongo".parse::<Service>().is_err());
    }

    /// Two tasks resolving different tenants concurrently must each observe
    /// only their own tenant's URL.
    #[tokio::test]
    async fn test_concurrent_resolution_is_isolated() {
        let dir = Arc::new(directory());

        let mut handles = Vec::new();
        for tenant in ["tenant-a", "tenant-b"] {
            let dir = dir.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..500 {
                    let url = dir.service_url(tenant, Service::Platform).unwrap();
                    assert!(url.contains(tenant), "cross-tenant leak: {url}");
                    tokio::task::yield_now().await;
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
    }
}
