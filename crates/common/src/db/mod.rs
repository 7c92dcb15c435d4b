//! Database layer
//!
//! Provides:
//! - SeaORM entity models
//! - Repository pattern for data access
//! - Per-tenant connection routing and pooling
//! - JSON column codec and schema provisioning

pub mod json;
pub mod models;
mod repository;
pub mod schema;

pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use crate::tenancy::{Service, ServiceDirectory};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Per-tenant connection pools, keyed by `(tenant, service)`.
///
/// Connections are opened lazily on first use and cached for the life of
/// the process. The directory decides which database URL a pair resolves
/// to; this type only manages the pools themselves.
#[derive(Clone)]
pub struct TenantPools {
    directory: Arc<dyn ServiceDirectory>,
    options: DatabaseConfig,
    pools: Arc<RwLock<HashMap<(String, Service), DatabaseConnection>>>,
}

impl TenantPools {
    pub fn new(directory: Arc<dyn ServiceDirectory>, options: DatabaseConfig) -> Self {
        Self {
            directory,
            options,
            pools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the pooled connection for a tenant's service database, opening
    /// it on first use.
    pub async fn acquire(&self, tenant_id: &str, service: Service) -> Result<DatabaseConnection> {
        let key = (tenant_id.to_owned(), service);

        if let Some(conn) = self.pools.read().await.get(&key) {
            return Ok(conn.clone());
        }

        // Resolve before taking the write lock; a bad tenant never holds
        // up connected ones.
        let url = self.directory.service_url(tenant_id, service)?;

        let mut pools = self.pools.write().await;
        // Another task may have connected while we waited for the lock.
        if let Some(conn) = pools.get(&key) {
            return Ok(conn.clone());
        }

        info!(tenant = %tenant_id, service = %service, "Opening tenant database connection");

        let mut opts = ConnectOptions::new(&url);
        opts.max_connections(self.options.max_connections)
            .min_connections(self.options.min_connections)
            .connect_timeout(Duration::from_secs(self.options.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.options.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect for tenant '{}': {}", tenant_id, e),
            })?;

        if self.options.auto_provision {
            schema::create_tables(&conn).await?;
        }

        pools.insert(key, conn.clone());
        Ok(conn)
    }

    /// Resolve a tenant's service database and wrap it in a repository.
    pub async fn repository(&self, tenant_id: &str, service: Service) -> Result<Repository> {
        let conn = self.acquire(tenant_id, service).await?;
        Ok(Repository::new(conn, self.options.statement_timeout()))
    }

    /// Number of tenant databases connected so far.
    pub async fn open_pools(&self) -> usize {
        self.pools.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, TenancyConfig};
    use crate::tenancy::ConfigServiceDirectory;

    fn pools() -> TenantPools {
        let mut services = HashMap::new();
        services.insert("platform".to_string(), "sqlite::memory:".to_string());
        let directory = ConfigServiceDirectory::new(TenancyConfig {
            services,
            tenants: None,
            directory_file: None,
        });
        let mut options = AppConfig::default().database;
        options.max_connections = 1;
        options.auto_provision = true;
        TenantPools::new(Arc::new(directory), options)
    }

    #[tokio::test]
    async fn test_acquire_caches_per_tenant() {
        let pools = pools();
        pools.acquire("acme", Service::Platform).await.unwrap();
        pools.acquire("acme", Service::Platform).await.unwrap();
        pools.acquire("globex", Service::Platform).await.unwrap();
        assert_eq!(pools.pools.read().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_pooled() {
        let pools = pools();
        let err = pools.acquire("acme", Service::Jira).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceNotFound { .. }));
        assert!(pools.pools.read().await.is_empty());
    }
}
