//! App instance entity
//!
//! An app instance is one deployment of a registered app inside an
//! organization, optionally bound to a workspace. `workspace_id`, when
//! non-null, must reference an existing workspace (enforced by the schema
//! foreign key).

use crate::db::json::decode_json;
use crate::db::repository::Repository;
use crate::errors::AppError;
use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub instance_id: String,

    pub app_id: Option<String>,

    pub workspace_id: Option<String>,

    pub org_id: Option<String>,

    pub name: Option<String>,

    pub tenant_db_identifier: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub instance_metadata: Option<String>,

    pub is_active: Option<bool>,

    pub status: Option<String>,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::WorkspaceId"
    )]
    Workspace,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "InstanceConfigInput")]
pub struct InstanceConfig {
    pub port: i32,
    pub log_level: String,
    pub max_connections: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "InstanceMetadataInput")]
pub struct InstanceMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub config: InstanceConfig,
}

/// Hydrated app instance as exposed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "AppInstance", complex)]
pub struct AppInstance {
    pub instance_id: String,
    pub app_id: Option<String>,
    pub workspace_id: Option<String>,
    pub org_id: Option<String>,
    pub name: Option<String>,
    pub tenant_db_identifier: Option<String>,
    pub instance_metadata: Option<InstanceMetadata>,
    pub is_active: Option<bool>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[ComplexObject]
impl AppInstance {
    /// The workspace this instance is bound to, if any
    async fn workspace(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<super::workspace::Workspace>> {
        let Some(workspace_id) = self.workspace_id.as_deref() else {
            return Ok(None);
        };
        let repo = ctx.data::<Repository>()?;
        repo.find_workspace(workspace_id)
            .await
            .map_err(|e| e.extend())
    }

    /// Theme attached to this instance, if any
    async fn theme(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<super::theme::Theme>> {
        let repo = ctx.data::<Repository>()?;
        repo.find_theme_by_app_instance(&self.instance_id)
            .await
            .map_err(|e| e.extend())
    }
}

impl TryFrom<Model> for AppInstance {
    type Error = AppError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        Ok(AppInstance {
            instance_id: row.instance_id,
            app_id: row.app_id,
            workspace_id: row.workspace_id,
            org_id: row.org_id,
            name: row.name,
            tenant_db_identifier: row.tenant_db_identifier,
            instance_metadata: decode_json(row.instance_metadata)?,
            is_active: row.is_active,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "CreateAppInstanceInput")]
pub struct CreateAppInstance {
    #[validate(length(min = 1))]
    pub app_id: String,
    #[validate(length(min = 1))]
    pub org_id: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tenant_db_identifier: Option<String>,
    #[serde(default)]
    pub instance_metadata: Option<InstanceMetadata>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "UpdateAppInstanceInput")]
pub struct UpdateAppInstance {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tenant_db_identifier: Option<String>,
    #[serde(default)]
    pub instance_metadata: Option<InstanceMetadata>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_hydration() {
        let row = Model {
            instance_id: "i1".into(),
            app_id: Some("a1".into()),
            workspace_id: None,
            org_id: Some("o1".into()),
            name: Some("boards".into()),
            tenant_db_identifier: None,
            instance_metadata: Some(
                r#"{"name":"boards","version":"1.2.0","config":{"port":8443,"logLevel":"info","maxConnections":32}}"#
                    .into(),
            ),
            is_active: Some(true),
            status: Some("active".into()),
            created_at: None,
            updated_at: None,
        };
        let instance = AppInstance::try_from(row).unwrap();
        let meta = instance.instance_metadata.unwrap();
        assert_eq!(meta.config.port, 8443);
        assert_eq!(meta.description, None);
    }
}
