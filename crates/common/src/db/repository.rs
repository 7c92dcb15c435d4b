//! Repository pattern for database operations
//!
//! One repository per resolved tenant connection. Every statement runs
//! under the configured statement timeout, and write inputs are validated
//! before touching the database.

use crate::db::json::encode_json;
use crate::db::models::*;
use crate::errors::{AppError, Result};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn validated<T: Validate>(input: &T) -> Result<()> {
    input.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
    })
}

/// Repository for data access operations against one tenant database
#[derive(Clone)]
pub struct Repository {
    conn: DatabaseConnection,
    statement_timeout: Duration,
}

impl Repository {
    /// Create a new repository over a resolved tenant connection
    pub fn new(conn: DatabaseConnection, statement_timeout: Duration) -> Self {
        Self {
            conn,
            statement_timeout,
        }
    }

    /// Run a database future under the statement timeout.
    async fn run<F, T>(&self, op: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.statement_timeout, op).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(AppError::DatabaseTimeout {
                elapsed_ms: self.statement_timeout.as_millis() as u64,
            }),
        }
    }

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.run(self.conn.execute_unprepared("SELECT 1"))
            .await
            .map_err(|e| match e {
                AppError::DatabaseTimeout { .. } => e,
                other => AppError::DatabaseConnection {
                    message: other.to_string(),
                },
            })?;
        Ok(())
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows = self
            .run(UserEntity::find().order_by_asc(UserColumn::UserId).all(&self.conn))
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    /// Find a user by ID
    pub async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = self
            .run(UserEntity::find_by_id(user_id).one(&self.conn))
            .await?;
        row.map(User::try_from).transpose()
    }

    /// Create a user with a server-generated ID
    pub async fn create_user(&self, input: CreateUser) -> Result<User> {
        validated(&input)?;
        let now = now_rfc3339();
        let row = UserActiveModel {
            user_id: Set(Uuid::new_v4().to_string()),
            org_id: Set(Some(input.org_id)),
            username: Set(Some(input.username)),
            email: Set(input.email),
            platform_role: Set(input.platform_role),
            org_role: Set(input.org_role),
            groups: Set(encode_json(input.groups.as_ref())?),
            my_workspace: Set(encode_json(input.my_workspace.as_ref())?),
            workspaces: Set(encode_json(input.workspaces.as_ref())?),
            profile_settings: Set(encode_json(input.profile_settings.as_ref())?),
            created_at: Set(Some(input.created_at.unwrap_or_else(|| now.clone()))),
            updated_at: Set(Some(input.updated_at.unwrap_or(now))),
        };
        let row = self.run(row.insert(&self.conn)).await?;
        User::try_from(row)
    }

    /// Apply a partial update; returns `None` when the user does not exist.
    pub async fn update_user(&self, user_id: &str, changes: UpdateUser) -> Result<Option<User>> {
        validated(&changes)?;
        let mut row = UserActiveModel {
            user_id: Unchanged(user_id.to_owned()),
            ..Default::default()
        };
        if let Some(org_id) = changes.org_id {
            row.org_id = Set(Some(org_id));
        }
        if let Some(username) = changes.username {
            row.username = Set(Some(username));
        }
        if let Some(email) = changes.email {
            row.email = Set(email);
        }
        if let Some(platform_role) = changes.platform_role {
            row.platform_role = Set(Some(platform_role));
        }
        if let Some(org_role) = changes.org_role {
            row.org_role = Set(Some(org_role));
        }
        if changes.groups.is_some() {
            row.groups = Set(encode_json(changes.groups.as_ref())?);
        }
        if changes.my_workspace.is_some() {
            row.my_workspace = Set(encode_json(changes.my_workspace.as_ref())?);
        }
        if changes.workspaces.is_some() {
            row.workspaces = Set(encode_json(changes.workspaces.as_ref())?);
        }
        if changes.profile_settings.is_some() {
            row.profile_settings = Set(encode_json(changes.profile_settings.as_ref())?);
        }
        row.updated_at = Set(Some(changes.updated_at.unwrap_or_else(now_rfc3339)));

        match self.run(row.update(&self.conn)).await {
            Ok(updated) => Ok(Some(User::try_from(updated)?)),
            Err(AppError::Database(DbErr::RecordNotUpdated)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a user; returns whether a row was removed.
    pub async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let result = self
            .run(UserEntity::delete_by_id(user_id).exec(&self.conn))
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Workspace Operations
    // ========================================================================

    /// List all workspaces
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let rows = self
            .run(
                WorkspaceEntity::find()
                    .order_by_asc(WorkspaceColumn::WorkspaceOrder)
                    .all(&self.conn),
            )
            .await?;
        rows.into_iter().map(Workspace::try_from).collect()
    }

    /// Find a workspace by ID
    pub async fn find_workspace(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        let row = self
            .run(WorkspaceEntity::find_by_id(workspace_id).one(&self.conn))
            .await?;
        row.map(Workspace::try_from).transpose()
    }

    /// Create a workspace with a server-generated ID
    pub async fn create_workspace(&self, input: CreateWorkspace) -> Result<Workspace> {
        validated(&input)?;
        let now = now_rfc3339();
        let row = WorkspaceActiveModel {
            workspace_id: Set(Uuid::new_v4().to_string()),
            org_id: Set(Some(input.org_id)),
            name: Set(input.name),
            parent_workspace_id: Set(input.parent_workspace_id),
            children: Set(encode_json(input.children.as_ref())?),
            apps: Set(encode_json(input.apps.as_ref())?),
            workspace_acl: Set(encode_json(input.workspace_acl.as_ref())?),
            created_at: Set(Some(input.created_at.unwrap_or_else(|| now.clone()))),
            updated_at: Set(Some(input.updated_at.unwrap_or(now))),
            workspace_order: Set(input.workspace_order),
        };
        let row = self.run(row.insert(&self.conn)).await?;
        Workspace::try_from(row)
    }

    /// Apply a partial update; returns `None` when the workspace does not exist.
    pub async fn update_workspace(
        &self,
        workspace_id: &str,
        changes: UpdateWorkspace,
    ) -> Result<Option<Workspace>> {
        validated(&changes)?;
        let mut row = WorkspaceActiveModel {
            workspace_id: Unchanged(workspace_id.to_owned()),
            ..Default::default()
        };
        if let Some(org_id) = changes.org_id {
            row.org_id = Set(Some(org_id));
        }
        if let Some(name) = changes.name {
            row.name = Set(name);
        }
        if let Some(parent) = changes.parent_workspace_id {
            row.parent_workspace_id = Set(Some(parent));
        }
        if changes.children.is_some() {
            row.children = Set(encode_json(changes.children.as_ref())?);
        }
        if changes.apps.is_some() {
            row.apps = Set(encode_json(changes.apps.as_ref())?);
        }
        if changes.workspace_acl.is_some() {
            row.workspace_acl = Set(encode_json(changes.workspace_acl.as_ref())?);
        }
        if let Some(order) = changes.workspace_order {
            row.workspace_order = Set(Some(order));
        }
        row.updated_at = Set(Some(changes.updated_at.unwrap_or_else(now_rfc3339)));

        match self.run(row.update(&self.conn)).await {
            Ok(updated) => Ok(Some(Workspace::try_from(updated)?)),
            Err(AppError::Database(DbErr::RecordNotUpdated)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a workspace; returns whether a row was removed.
    pub async fn delete_workspace(&self, workspace_id: &str) -> Result<bool> {
        let result = self
            .run(WorkspaceEntity::delete_by_id(workspace_id).exec(&self.conn))
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // App Instance Operations
    // ========================================================================

    /// List all app instances
    pub async fn list_app_instances(&self) -> Result<Vec<AppInstance>> {
        let rows = self
            .run(
                AppInstanceEntity::find()
                    .order_by_asc(AppInstanceColumn::InstanceId)
                    .all(&self.conn),
            )
            .await?;
        rows.into_iter().map(AppInstance::try_from).collect()
    }

    /// Find an app instance by ID
    pub async fn find_app_instance(&self, instance_id: &str) -> Result<Option<AppInstance>> {
        let row = self
            .run(AppInstanceEntity::find_by_id(instance_id).one(&self.conn))
            .await?;
        row.map(AppInstance::try_from).transpose()
    }

    /// Find the instance of a named app within an organization
    pub async fn find_app_instance_by_org_and_name(
        &self,
        org_id: &str,
        name: &str,
    ) -> Result<Option<AppInstance>> {
        let row = self
            .run(
                AppInstanceEntity::find()
                    .filter(AppInstanceColumn::OrgId.eq(org_id))
                    .filter(AppInstanceColumn::Name.eq(name))
                    .one(&self.conn),
            )
            .await?;
        row.map(AppInstance::try_from).transpose()
    }

    /// Find an instance of a registered app, optionally scoped to a workspace
    pub async fn find_app_instance_by_app_id(
        &self,
        app_id: &str,
        workspace_id: Option<&str>,
    ) -> Result<Option<AppInstance>> {
        let mut query = AppInstanceEntity::find().filter(AppInstanceColumn::AppId.eq(app_id));
        if let Some(workspace_id) = workspace_id {
            query = query.filter(AppInstanceColumn::WorkspaceId.eq(workspace_id));
        }
        let row = self.run(query.one(&self.conn)).await?;
        row.map(AppInstance::try_from).transpose()
    }

    /// Create an app instance with a server-generated ID
    pub async fn create_app_instance(&self, input: CreateAppInstance) -> Result<AppInstance> {
        validated(&input)?;
        let now = now_rfc3339();
        let row = AppInstanceActiveModel {
            instance_id: Set(Uuid::new_v4().to_string()),
            app_id: Set(Some(input.app_id)),
            workspace_id: Set(input.workspace_id),
            org_id: Set(Some(input.org_id)),
            name: Set(input.name),
            tenant_db_identifier: Set(input.tenant_db_identifier),
            instance_metadata: Set(encode_json(input.instance_metadata.as_ref())?),
            is_active: Set(input.is_active),
            status: Set(input.status),
            created_at: Set(Some(input.created_at.unwrap_or_else(|| now.clone()))),
            updated_at: Set(Some(input.updated_at.unwrap_or(now))),
        };
        let row = self.run(row.insert(&self.conn)).await?;
        AppInstance::try_from(row)
    }

    /// Apply a partial update; returns `None` when the instance does not exist.
    pub async fn update_app_instance(
        &self,
        instance_id: &str,
        changes: UpdateAppInstance,
    ) -> Result<Option<AppInstance>> {
        validated(&changes)?;
        let mut row = AppInstanceActiveModel {
            instance_id: Unchanged(instance_id.to_owned()),
            ..Default::default()
        };
        if let Some(app_id) = changes.app_id {
            row.app_id = Set(Some(app_id));
        }
        if let Some(org_id) = changes.org_id {
            row.org_id = Set(Some(org_id));
        }
        if let Some(workspace_id) = changes.workspace_id {
            row.workspace_id = Set(Some(workspace_id));
        }
        if let Some(name) = changes.name {
            row.name = Set(Some(name));
        }
        if let Some(identifier) = changes.tenant_db_identifier {
            row.tenant_db_identifier = Set(Some(identifier));
        }
        if changes.instance_metadata.is_some() {
            row.instance_metadata = Set(encode_json(changes.instance_metadata.as_ref())?);
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = Set(Some(is_active));
        }
        if let Some(status) = changes.status {
            row.status = Set(Some(status));
        }
        row.updated_at = Set(Some(changes.updated_at.unwrap_or_else(now_rfc3339)));

        match self.run(row.update(&self.conn)).await {
            Ok(updated) => Ok(Some(AppInstance::try_from(updated)?)),
            Err(AppError::Database(DbErr::RecordNotUpdated)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an app instance; returns whether a row was removed.
    pub async fn delete_app_instance(&self, instance_id: &str) -> Result<bool> {
        let result = self
            .run(AppInstanceEntity::delete_by_id(instance_id).exec(&self.conn))
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Audit Log Operations
    // ========================================================================

    /// List all audit log entries, newest first
    pub async fn list_audit_logs(&self) -> Result<Vec<AccountAuditLog>> {
        let rows = self
            .run(
                AccountAuditLogEntity::find()
                    .order_by_desc(AccountAuditLogColumn::CreatedAt)
                    .all(&self.conn),
            )
            .await?;
        rows.into_iter().map(AccountAuditLog::try_from).collect()
    }

    /// Find an audit log entry by ID
    pub async fn find_audit_log(&self, audit_id: &str) -> Result<Option<AccountAuditLog>> {
        let row = self
            .run(AccountAuditLogEntity::find_by_id(audit_id).one(&self.conn))
            .await?;
        row.map(AccountAuditLog::try_from).transpose()
    }

    /// Record an audit event. The caller may supply `audit_id` (for
    /// correlation with an upstream event); otherwise one is generated.
    pub async fn create_audit_log(
        &self,
        input: CreateAccountAuditLog,
    ) -> Result<AccountAuditLog> {
        validated(&input)?;
        let row = AccountAuditLogActiveModel {
            audit_id: Set(input
                .audit_id
                .unwrap_or_else(|| Uuid::new_v4().to_string())),
            org_id: Set(Some(input.org_id)),
            user_id: Set(input.user_id),
            event_category: Set(Some(input.event_category)),
            event_type: Set(input.event_type),
            event_description: Set(Some(input.event_description)),
            event_metadata: Set(encode_json(input.event_metadata.as_ref())?),
            old_state: Set(encode_json(input.old_state.as_ref())?),
            new_state: Set(encode_json(input.new_state.as_ref())?),
            client_ip: Set(input.client_ip),
            user_agent: Set(input.user_agent),
            created_at: Set(Some(input.created_at.unwrap_or_else(now_rfc3339))),
        };
        let row = self.run(row.insert(&self.conn)).await?;
        AccountAuditLog::try_from(row)
    }

    /// Apply a partial update; returns `None` when the entry does not exist.
    pub async fn update_audit_log(
        &self,
        audit_id: &str,
        changes: UpdateAccountAuditLog,
    ) -> Result<Option<AccountAuditLog>> {
        validated(&changes)?;
        let mut row = AccountAuditLogActiveModel {
            audit_id: Unchanged(audit_id.to_owned()),
            ..Default::default()
        };
        if let Some(org_id) = changes.org_id {
            row.org_id = Set(Some(org_id));
        }
        if let Some(user_id) = changes.user_id {
            row.user_id = Set(Some(user_id));
        }
        if let Some(category) = changes.event_category {
            row.event_category = Set(Some(category));
        }
        if let Some(event_type) = changes.event_type {
            row.event_type = Set(Some(event_type));
        }
        if let Some(description) = changes.event_description {
            row.event_description = Set(Some(description));
        }
        if changes.event_metadata.is_some() {
            row.event_metadata = Set(encode_json(changes.event_metadata.as_ref())?);
        }
        if changes.old_state.is_some() {
            row.old_state = Set(encode_json(changes.old_state.as_ref())?);
        }
        if changes.new_state.is_some() {
            row.new_state = Set(encode_json(changes.new_state.as_ref())?);
        }
        if let Some(ip) = changes.client_ip {
            row.client_ip = Set(Some(ip));
        }
        if let Some(agent) = changes.user_agent {
            row.user_agent = Set(Some(agent));
        }

        match self.run(row.update(&self.conn)).await {
            Ok(updated) => Ok(Some(AccountAuditLog::try_from(updated)?)),
            Err(AppError::Database(DbErr::RecordNotUpdated)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an audit log entry; returns whether a row was removed.
    pub async fn delete_audit_log(&self, audit_id: &str) -> Result<bool> {
        let result = self
            .run(AccountAuditLogEntity::delete_by_id(audit_id).exec(&self.conn))
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Theme Operations
    // ========================================================================

    /// List all themes
    pub async fn list_themes(&self) -> Result<Vec<Theme>> {
        let rows = self
            .run(
                ThemeEntity::find()
                    .order_by_asc(ThemeColumn::ThemeId)
                    .all(&self.conn),
            )
            .await?;
        rows.into_iter().map(Theme::try_from).collect()
    }

    /// Find a theme by ID
    pub async fn find_theme(&self, theme_id: &str) -> Result<Option<Theme>> {
        let row = self
            .run(ThemeEntity::find_by_id(theme_id).one(&self.conn))
            .await?;
        row.map(Theme::try_from).transpose()
    }

    /// Find the theme attached to an app instance
    pub async fn find_theme_by_app_instance(
        &self,
        instance_id: &str,
    ) -> Result<Option<Theme>> {
        let row = self
            .run(
                ThemeEntity::find()
                    .filter(ThemeColumn::AppInstanceId.eq(instance_id))
                    .one(&self.conn),
            )
            .await?;
        row.map(Theme::try_from).transpose()
    }

    /// Create a theme with a server-generated ID
    pub async fn create_theme(&self, input: CreateTheme) -> Result<Theme> {
        validated(&input)?;
        let now = now_rfc3339();
        let row = ThemeActiveModel {
            theme_id: Set(Uuid::new_v4().to_string()),
            org_id: Set(Some(input.org_id)),
            app_instance_id: Set(input.app_instance_id),
            theme: Set(input.theme),
            created_at: Set(Some(input.created_at.unwrap_or_else(|| now.clone()))),
            updated_at: Set(Some(input.updated_at.unwrap_or(now))),
        };
        let row = self.run(row.insert(&self.conn)).await?;
        Theme::try_from(row)
    }

    /// Apply a partial update; returns `None` when the theme does not exist.
    /// `updated_at` is always refreshed.
    pub async fn update_theme(
        &self,
        theme_id: &str,
        changes: UpdateTheme,
    ) -> Result<Option<Theme>> {
        validated(&changes)?;
        let mut row = ThemeActiveModel {
            theme_id: Unchanged(theme_id.to_owned()),
            ..Default::default()
        };
        if let Some(org_id) = changes.org_id {
            row.org_id = Set(Some(org_id));
        }
        if let Some(instance_id) = changes.app_instance_id {
            row.app_instance_id = Set(Some(instance_id));
        }
        if let Some(theme) = changes.theme {
            row.theme = Set(theme);
        }
        row.updated_at = Set(Some(changes.updated_at.unwrap_or_else(now_rfc3339)));

        match self.run(row.update(&self.conn)).await {
            Ok(updated) => Ok(Some(Theme::try_from(updated)?)),
            Err(AppError::Database(DbErr::RecordNotUpdated)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a theme; returns whether a row was removed.
    pub async fn delete_theme(&self, theme_id: &str) -> Result<bool> {
        let result = self
            .run(ThemeEntity::delete_by_id(theme_id).exec(&self.conn))
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use sea_orm::{ConnectOptions, Database};

    async fn repo() -> Repository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        // a second pooled connection would see an empty in-memory database
        opts.max_connections(1);
        let conn = Database::connect(opts).await.unwrap();
        create_tables(&conn).await.unwrap();
        Repository::new(conn, Duration::from_secs(5))
    }

    fn create_user_input(email: &str) -> CreateUser {
        CreateUser {
            org_id: "o1".into(),
            username: email.split('@').next().unwrap().into(),
            email: email.into(),
            platform_role: None,
            org_role: None,
            groups: Some(UserGroups {
                group_ids: vec!["g1".into()],
            }),
            my_workspace: None,
            workspaces: None,
            profile_settings: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_user_crud_round_trip() {
        let repo = repo().await;

        let created = repo.create_user(create_user_input("a@x.com")).await.unwrap();
        assert_eq!(created.org_id.as_deref(), Some("o1"));
        assert!(created.created_at.is_some());

        let found = repo.find_user(&created.user_id).await.unwrap().unwrap();
        assert_eq!(found.groups.as_ref().unwrap().group_ids, vec!["g1"]);

        let updated = repo
            .update_user(
                &created.user_id,
                UpdateUser {
                    org_role: Some("admin".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.org_role.as_deref(), Some("admin"));
        // untouched JSON column survives the partial update
        assert_eq!(updated.groups.as_ref().unwrap().group_ids, vec!["g1"]);

        assert!(repo.delete_user(&created.user_id).await.unwrap());
        assert!(!repo.delete_user(&created.user_id).await.unwrap());
        assert!(repo.find_user(&created.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let repo = repo().await;
        let outcome = repo
            .update_user(
                "nope",
                UpdateUser {
                    org_role: Some("admin".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let repo = repo().await;
        let mut input = create_user_input("a@x.com");
        input.email = "not-an-email".into();
        let err = repo.create_user(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_app_instance_lookup_by_org_and_name() {
        let repo = repo().await;
        repo.create_app_instance(CreateAppInstance {
            app_id: "app-board".into(),
            org_id: "o1".into(),
            workspace_id: None,
            name: Some("boards".into()),
            tenant_db_identifier: None,
            instance_metadata: None,
            is_active: Some(true),
            status: Some("active".into()),
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();

        let hit = repo
            .find_app_instance_by_org_and_name("o1", "boards")
            .await
            .unwrap();
        assert!(hit.is_some());
        let miss = repo
            .find_app_instance_by_org_and_name("o2", "boards")
            .await
            .unwrap();
        assert!(miss.is_none());

        let by_app = repo
            .find_app_instance_by_app_id("app-board", None)
            .await
            .unwrap();
        assert!(by_app.is_some());
        let scoped = repo
            .find_app_instance_by_app_id("app-board", Some("w-missing"))
            .await
            .unwrap();
        assert!(scoped.is_none());
    }

    #[tokio::test]
    async fn test_audit_log_honors_supplied_id() {
        let repo = repo().await;
        let entry = repo
            .create_audit_log(CreateAccountAuditLog {
                audit_id: Some("evt-1".into()),
                org_id: "o1".into(),
                event_category: "auth".into(),
                event_description: "login".into(),
                user_id: None,
                event_type: None,
                event_metadata: None,
                old_state: Some(JsonBlob(serde_json::json!({"active": false}))),
                new_state: Some(JsonBlob(serde_json::json!({"active": true}))),
                client_ip: None,
                user_agent: None,
                created_at: None,
            })
            .await
            .unwrap();
        assert_eq!(entry.audit_id, "evt-1");
        assert_eq!(entry.new_state.unwrap().0["active"], true);

        let generated = repo
            .create_audit_log(CreateAccountAuditLog {
                audit_id: None,
                org_id: "o1".into(),
                event_category: "auth".into(),
                event_description: "logout".into(),
                user_id: None,
                event_type: None,
                event_metadata: None,
                old_state: None,
                new_state: None,
                client_ip: None,
                user_agent: None,
                created_at: None,
            })
            .await
            .unwrap();
        assert!(!generated.audit_id.is_empty());
    }

    #[tokio::test]
    async fn test_theme_update_refreshes_updated_at() {
        let repo = repo().await;
        let theme = repo
            .create_theme(CreateTheme {
                org_id: "o1".into(),
                theme: r#"{"palette":"dark"}"#.into(),
                app_instance_id: None,
                created_at: Some("2026-01-01T00:00:00Z".into()),
                updated_at: Some("2026-01-01T00:00:00Z".into()),
            })
            .await
            .unwrap();

        let updated = repo
            .update_theme(
                &theme.theme_id,
                UpdateTheme {
                    theme: Some(r#"{"palette":"light"}"#.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.theme, r#"{"palette":"light"}"#);
        assert_ne!(updated.updated_at, theme.updated_at);
    }
}
