//! Schema provisioning
//!
//! Tenant databases are provisioned lazily on first connection when
//! `database.auto_provision` is set. The DDL is idempotent and portable
//! across SQLite and Postgres.

use crate::errors::{AppError, Result};
use sea_orm::{ConnectionTrait, DatabaseConnection};

const DDL: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        user_id TEXT PRIMARY KEY,
        org_id TEXT,
        username TEXT UNIQUE,
        email TEXT NOT NULL UNIQUE,
        platform_role TEXT,
        org_role TEXT,
        "groups" TEXT,
        my_workspace TEXT,
        workspaces TEXT,
        profile_settings TEXT,
        created_at TEXT,
        updated_at TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS workspaces (
        workspace_id TEXT PRIMARY KEY,
        org_id TEXT,
        name TEXT NOT NULL,
        parent_workspace_id TEXT,
        children TEXT,
        apps TEXT,
        workspace_acl TEXT,
        created_at TEXT,
        updated_at TEXT,
        workspace_order INTEGER
    )"#,
    r#"CREATE TABLE IF NOT EXISTS app_instances (
        instance_id TEXT PRIMARY KEY,
        app_id TEXT,
        workspace_id TEXT REFERENCES workspaces(workspace_id),
        org_id TEXT,
        name TEXT,
        tenant_db_identifier TEXT,
        instance_metadata TEXT,
        is_active BOOLEAN,
        status TEXT,
        created_at TEXT,
        updated_at TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS account_audit_logs (
        audit_id TEXT PRIMARY KEY,
        org_id TEXT,
        user_id TEXT REFERENCES users(user_id),
        event_category TEXT,
        event_type TEXT,
        event_description TEXT,
        event_metadata TEXT,
        old_state TEXT,
        new_state TEXT,
        client_ip TEXT,
        user_agent TEXT,
        created_at TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS themes (
        theme_id TEXT PRIMARY KEY,
        org_id TEXT,
        app_instance_id TEXT REFERENCES app_instances(instance_id),
        theme TEXT NOT NULL,
        created_at TEXT,
        updated_at TEXT
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_users_org ON users (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_workspaces_org ON workspaces (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_instances_org ON app_instances (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_app_instances_workspace ON app_instances (workspace_id)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_org ON account_audit_logs (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_user ON account_audit_logs (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_themes_instance ON themes (app_instance_id)",
];

/// Create all tables and indexes if they do not already exist.
pub async fn create_tables(conn: &DatabaseConnection) -> Result<()> {
    for statement in DDL {
        conn.execute_unprepared(statement)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Schema provisioning failed: {}", e),
            })?;
    }
    Ok(())
}
