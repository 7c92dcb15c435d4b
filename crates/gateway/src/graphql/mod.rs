//! GraphQL surface
//!
//! Thin adapters over the repository. The schema itself is tenant-agnostic;
//! each request executes with the tenant's repository injected as request
//! data, so resolvers (including nested field resolvers on the models)
//! always read from the caller's database.

use crate::AppState;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use atrium_common::db::models::{
    AccountAuditLog, AppInstance, CreateAccountAuditLog, CreateAppInstance, CreateTheme,
    CreateUser, CreateWorkspace, Theme, UpdateAccountAuditLog, UpdateAppInstance, UpdateTheme,
    UpdateUser, UpdateWorkspace, User, Workspace,
};
use atrium_common::db::Repository;
use atrium_common::tenancy::TenantContext;
use atrium_common::Result;
use axum::extract::State;

pub type AtriumSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema. Done once at startup; per-request state arrives as
/// request data.
pub fn build_schema() -> AtriumSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).finish()
}

/// Execute a GraphQL request against the tenant's database.
pub async fn graphql_handler(
    State(state): State<AppState>,
    tenant: TenantContext,
    req: GraphQLRequest,
) -> Result<GraphQLResponse> {
    let repo = state.repository(&tenant).await?;
    let request = req.into_inner().data(repo);
    Ok(state.schema.execute(request).await.into())
}

fn repo<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Repository> {
    ctx.data::<Repository>()
}

/// Map a repository outcome across the GraphQL boundary, rendering errors
/// with their safe message and code extension.
fn gql<T>(outcome: Result<T>) -> async_graphql::Result<T> {
    outcome.map_err(|e| e.extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn ping(&self) -> &'static str {
        "pong"
    }

    async fn user(&self, ctx: &Context<'_>, user_id: String) -> async_graphql::Result<Option<User>> {
        gql(repo(ctx)?.find_user(&user_id).await)
    }

    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        gql(repo(ctx)?.list_users().await)
    }

    async fn workspace(
        &self,
        ctx: &Context<'_>,
        workspace_id: String,
    ) -> async_graphql::Result<Option<Workspace>> {
        gql(repo(ctx)?.find_workspace(&workspace_id).await)
    }

    async fn workspaces(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Workspace>> {
        gql(repo(ctx)?.list_workspaces().await)
    }

    async fn app_instance(
        &self,
        ctx: &Context<'_>,
        instance_id: String,
    ) -> async_graphql::Result<Option<AppInstance>> {
        gql(repo(ctx)?.find_app_instance(&instance_id).await)
    }

    async fn app_instances(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AppInstance>> {
        gql(repo(ctx)?.list_app_instances().await)
    }

    /// Instance of a registered app, optionally narrowed to one workspace
    async fn app_instance_by_app_id(
        &self,
        ctx: &Context<'_>,
        app_id: String,
        workspace_id: Option<String>,
    ) -> async_graphql::Result<Option<AppInstance>> {
        gql(repo(ctx)?
            .find_app_instance_by_app_id(&app_id, workspace_id.as_deref())
            .await)
    }

    async fn account_audit_log(
        &self,
        ctx: &Context<'_>,
        audit_id: String,
    ) -> async_graphql::Result<Option<AccountAuditLog>> {
        gql(repo(ctx)?.find_audit_log(&audit_id).await)
    }

    async fn account_audit_logs(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<AccountAuditLog>> {
        gql(repo(ctx)?.list_audit_logs().await)
    }

    async fn theme(
        &self,
        ctx: &Context<'_>,
        theme_id: String,
    ) -> async_graphql::Result<Option<Theme>> {
        gql(repo(ctx)?.find_theme(&theme_id).await)
    }

    async fn themes(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Theme>> {
        gql(repo(ctx)?.list_themes().await)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUser,
    ) -> async_graphql::Result<User> {
        gql(repo(ctx)?.create_user(input).await)
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        user_id: String,
        input: UpdateUser,
    ) -> async_graphql::Result<Option<User>> {
        gql(repo(ctx)?.update_user(&user_id, input).await)
    }

    async fn delete_user(&self, ctx: &Context<'_>, user_id: String) -> async_graphql::Result<bool> {
        gql(repo(ctx)?.delete_user(&user_id).await)
    }

    async fn create_workspace(
        &self,
        ctx: &Context<'_>,
        input: CreateWorkspace,
    ) -> async_graphql::Result<Workspace> {
        gql(repo(ctx)?.create_workspace(input).await)
    }

    async fn update_workspace(
        &self,
        ctx: &Context<'_>,
        workspace_id: String,
        input: UpdateWorkspace,
    ) -> async_graphql::Result<Option<Workspace>> {
        gql(repo(ctx)?.update_workspace(&workspace_id, input).await)
    }

    async fn delete_workspace(
        &self,
        ctx: &Context<'_>,
        workspace_id: String,
    ) -> async_graphql::Result<bool> {
        gql(repo(ctx)?.delete_workspace(&workspace_id).await)
    }

    async fn create_app_instance(
        &self,
        ctx: &Context<'_>,
        input: CreateAppInstance,
    ) -> async_graphql::Result<AppInstance> {
        gql(repo(ctx)?.create_app_instance(input).await)
    }

    async fn update_app_instance(
        &self,
        ctx: &Context<'_>,
        instance_id: String,
        input: UpdateAppInstance,
    ) -> async_graphql::Result<Option<AppInstance>> {
        gql(repo(ctx)?.update_app_instance(&instance_id, input).await)
    }

    async fn delete_app_instance(
        &self,
        ctx: &Context<'_>,
        instance_id: String,
    ) -> async_graphql::Result<bool> {
        gql(repo(ctx)?.delete_app_instance(&instance_id).await)
    }

    async fn create_account_audit_log(
        &self,
        ctx: &Context<'_>,
        input: CreateAccountAuditLog,
    ) -> async_graphql::Result<AccountAuditLog> {
        gql(repo(ctx)?.create_audit_log(input).await)
    }

    async fn update_account_audit_log(
        &self,
        ctx: &Context<'_>,
        audit_id: String,
        input: UpdateAccountAuditLog,
    ) -> async_graphql::Result<Option<AccountAuditLog>> {
        gql(repo(ctx)?.update_audit_log(&audit_id, input).await)
    }

    async fn delete_account_audit_log(
        &self,
        ctx: &Context<'_>,
        audit_id: String,
    ) -> async_graphql::Result<bool> {
        gql(repo(ctx)?.delete_audit_log(&audit_id).await)
    }

    async fn create_theme(
        &self,
        ctx: &Context<'_>,
        input: CreateTheme,
    ) -> async_graphql::Result<Theme> {
        gql(repo(ctx)?.create_theme(input).await)
    }

    async fn update_theme(
        &self,
        ctx: &Context<'_>,
        theme_id: String,
        input: UpdateTheme,
    ) -> async_graphql::Result<Option<Theme>> {
        gql(repo(ctx)?.update_theme(&theme_id, input).await)
    }

    async fn delete_theme(
        &self,
        ctx: &Context<'_>,
        theme_id: String,
    ) -> async_graphql::Result<bool> {
        gql(repo(ctx)?.delete_theme(&theme_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_common::db::schema::create_tables;
    use sea_orm::{ConnectOptions, Database};
    use std::time::Duration;

    async fn test_repo() -> Repository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let conn = Database::connect(opts).await.unwrap();
        create_tables(&conn).await.unwrap();
        Repository::new(conn, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_ping() {
        let schema = build_schema();
        let resp = schema
            .execute(async_graphql::Request::new("{ ping }").data(test_repo().await))
            .await;
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.to_string(), r#"{ping: "pong"}"#);
    }

    #[tokio::test]
    async fn test_create_and_query_user() {
        let schema = build_schema();
        let repo = test_repo().await;

        let create = r#"mutation {
            createUser(input: {orgId: "o1", username: "alice", email: "a@x.com"}) {
                userId
                email
            }
        }"#;
        let resp = schema
            .execute(async_graphql::Request::new(create).data(repo.clone()))
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);

        let resp = schema
            .execute(async_graphql::Request::new("{ users { email } }").data(repo))
            .await;
        assert!(resp.errors.is_empty());
        assert!(resp.data.to_string().contains("a@x.com"));
    }

    #[tokio::test]
    async fn test_missing_user_is_null() {
        let schema = build_schema();
        let resp = schema
            .execute(
                async_graphql::Request::new(r#"{ user(userId: "nope") { userId } }"#)
                    .data(test_repo().await),
            )
            .await;
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.to_string(), "{user: null}");
    }

    #[tokio::test]
    async fn test_nested_instance_workspace() {
        let schema = build_schema();
        let repo = test_repo().await;

        let ws = repo
            .create_workspace(atrium_common::db::models::CreateWorkspace {
                org_id: "o1".into(),
                name: "root".into(),
                parent_workspace_id: None,
                children: None,
                apps: None,
                workspace_acl: None,
                workspace_order: None,
                created_at: None,
                updated_at: None,
            })
            .await
            .unwrap();
        repo.create_app_instance(atrium_common::db::models::CreateAppInstance {
            app_id: "app-board".into(),
            org_id: "o1".into(),
            workspace_id: Some(ws.workspace_id.clone()),
            name: Some("boards".into()),
            tenant_db_identifier: None,
            instance_metadata: None,
            is_active: Some(true),
            status: None,
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();

        let query = r#"{
            appInstanceByAppId(appId: "app-board") {
                workspace { name }
                theme { themeId }
            }
        }"#;
        let resp = schema
            .execute(async_graphql::Request::new(query).data(repo))
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        let data = resp.data.to_string();
        assert!(data.contains(r#"name: "root""#));
        assert!(data.contains("theme: null"));
    }

    #[tokio::test]
    async fn test_validation_error_surfaces_safe_message() {
        let schema = build_schema();
        let create = r#"mutation {
            createUser(input: {orgId: "o1", username: "alice", email: "nope"}) {
                userId
            }
        }"#;
        let resp = schema
            .execute(async_graphql::Request::new(create).data(test_repo().await))
            .await;
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0].message.contains("validation failed"));
        // machine-readable code rides in the extensions
        assert!(format!("{:?}", resp.errors[0].extensions).contains("ValidationError"));
    }
}
