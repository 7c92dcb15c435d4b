//! Workspace entity
//!
//! Workspaces form a tree via `parent_workspace_id`. Cycle prevention is
//! not enforced at this layer.

use crate::db::json::decode_json;
use crate::errors::AppError;
use async_graphql::{InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub workspace_id: String,

    pub org_id: Option<String>,

    pub name: String,

    pub parent_workspace_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub children: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub apps: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub workspace_acl: Option<String>,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,

    pub workspace_order: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::app_instance::Entity")]
    AppInstances,
}

impl Related<super::app_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppInstances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "WorkspaceChildrenInput")]
pub struct WorkspaceChildren {
    pub workspace_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "WorkspaceAppsInput")]
pub struct WorkspaceApps {
    pub app_ids: Vec<String>,
}

/// Per-role member lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "AclRoleInput")]
pub struct AclRole {
    pub user_id: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "WorkspaceAclInput")]
pub struct WorkspaceAcl {
    pub roles: AclRole,
}

/// Hydrated workspace as exposed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "Workspace")]
pub struct Workspace {
    pub workspace_id: String,
    pub org_id: Option<String>,
    pub name: String,
    pub parent_workspace_id: Option<String>,
    pub children: Option<WorkspaceChildren>,
    pub apps: Option<WorkspaceApps>,
    pub workspace_acl: Option<WorkspaceAcl>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub workspace_order: Option<i32>,
}

impl TryFrom<Model> for Workspace {
    type Error = AppError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        Ok(Workspace {
            workspace_id: row.workspace_id,
            org_id: row.org_id,
            name: row.name,
            parent_workspace_id: row.parent_workspace_id,
            children: decode_json(row.children)?,
            apps: decode_json(row.apps)?,
            workspace_acl: decode_json(row.workspace_acl)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            workspace_order: row.workspace_order,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "CreateWorkspaceInput")]
pub struct CreateWorkspace {
    #[validate(length(min = 1))]
    pub org_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub parent_workspace_id: Option<String>,
    #[serde(default)]
    pub children: Option<WorkspaceChildren>,
    #[serde(default)]
    pub apps: Option<WorkspaceApps>,
    #[serde(default)]
    pub workspace_acl: Option<WorkspaceAcl>,
    #[serde(default)]
    pub workspace_order: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "UpdateWorkspaceInput")]
pub struct UpdateWorkspace {
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_workspace_id: Option<String>,
    #[serde(default)]
    pub children: Option<WorkspaceChildren>,
    #[serde(default)]
    pub apps: Option<WorkspaceApps>,
    #[serde(default)]
    pub workspace_acl: Option<WorkspaceAcl>,
    #[serde(default)]
    pub workspace_order: Option<i32>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydration_with_acl() {
        let row = Model {
            workspace_id: "w1".into(),
            org_id: Some("o1".into()),
            name: "root".into(),
            parent_workspace_id: None,
            children: Some(r#"{"workspaceIds":["w2"]}"#.into()),
            apps: None,
            workspace_acl: Some(r#"{"roles":{"userId":["u1"]}}"#.into()),
            created_at: None,
            updated_at: None,
            workspace_order: Some(1),
        };
        let ws = Workspace::try_from(row).unwrap();
        assert_eq!(ws.children.unwrap().workspace_ids, vec!["w2"]);
        assert_eq!(ws.workspace_acl.unwrap().roles.user_id, vec!["u1"]);
        assert!(ws.apps.is_none());
    }
}
