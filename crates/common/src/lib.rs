//! Atrium Common Library
//!
//! Shared code for the Atrium gateway including:
//! - Tenant resolution and request context
//! - Database models, repository pattern, and per-tenant pools
//! - Session and identity-provider authentication
//! - Error types and handling
//! - Configuration management

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod tenancy;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{Repository, TenantPools};
pub use errors::{AppError, Result};
pub use tenancy::{Service, ServiceDirectory, TenantContext};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
