//! API handlers module

pub mod app_instances;
pub mod apps;
pub mod audit_logs;
pub mod health;
pub mod sessions;
pub mod themes;
pub mod users;
pub mod workspaces;
