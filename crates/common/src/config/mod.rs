//! Configuration management for Atrium services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/<env>, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Per-tenant database pool configuration
    pub database: DatabaseConfig,

    /// Tenant/service URL directory configuration
    pub tenancy: TenancyConfig,

    /// Session and cookie configuration
    pub auth: AuthConfig,

    /// External identity provider configuration
    pub identity: IdentityConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Maximum number of connections per tenant pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections per tenant pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Upper bound for a single statement, in seconds
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,

    /// Create tables on first connection (development convenience)
    #[serde(default)]
    pub auto_provision: bool,
}

/// Maps logical service names to connection URLs.
///
/// URLs may contain a `{tenant}` placeholder which is substituted with the
/// resolved tenant id, e.g. `sqlite://data/{tenant}-platform.db`. This stands
/// in for a control-plane KV lookup; the shape of the lookup (tenant id +
/// service name in, URL out) is the stable contract.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TenancyConfig {
    /// service name -> connection URL (or URL template)
    #[serde(default)]
    pub services: HashMap<String, String>,

    /// Optional allow-list of known tenant ids. When set, any other tenant
    /// fails resolution.
    #[serde(default)]
    pub tenants: Option<Vec<String>>,

    /// Optional path to a JSON file seeding the org/app directory
    #[serde(default)]
    pub directory_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign the session cookie (at least 64 bytes)
    pub cookie_secret: String,

    /// Session cookie max-age in seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: u64,

    /// Set the Secure attribute on the session cookie
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Base URL of the identity verification service
    pub base_url: String,

    /// Optional API key sent with provider calls
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_identity_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    300
}
fn default_statement_timeout() -> u64 {
    5
}
fn default_session_max_age() -> u64 {
    3600
}
fn default_identity_timeout() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_service_name() -> String {
    "atrium".to_string()
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__TENANCY__SERVICES__PLATFORM=sqlite://data/{tenant}.db
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl DatabaseConfig {
    /// Get statement timeout as Duration
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }
}

impl AuthConfig {
    /// Get session max-age as Duration
    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            database: DatabaseConfig {
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
                statement_timeout_secs: default_statement_timeout(),
                auto_provision: false,
            },
            tenancy: TenancyConfig::default(),
            auth: AuthConfig {
                cookie_secret: String::new(),
                session_max_age_secs: default_session_max_age(),
                secure_cookies: false,
            },
            identity: IdentityConfig {
                base_url: "http://localhost:9099".to_string(),
                api_key: None,
                timeout_secs: default_identity_timeout(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: false,
                service_name: default_service_name(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.session_max_age_secs, 3600);
        assert_eq!(config.database.statement_timeout(), Duration::from_secs(5));
        assert!(config.tenancy.services.is_empty());
    }
}
