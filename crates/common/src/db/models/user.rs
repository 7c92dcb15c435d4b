//! User entity
//!
//! JSON substructures (groups, workspace pointers, profile settings) are
//! stored as text columns on the row and hydrated into typed values.

use crate::db::json::decode_json;
use crate::errors::AppError;
use async_graphql::{InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    pub org_id: Option<String>,

    #[sea_orm(unique)]
    pub username: Option<String>,

    #[sea_orm(unique)]
    pub email: String,

    pub platform_role: Option<String>,

    pub org_role: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub groups: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub my_workspace: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub workspaces: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub profile_settings: Option<String>,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Group memberships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "UserGroupsInput")]
pub struct UserGroups {
    pub group_ids: Vec<String>,
}

/// Pointer to the user's personal workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "UserMyWorkspaceInput")]
pub struct UserMyWorkspace {
    pub workspace_id: String,
}

/// Workspaces the user belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "UserWorkspacesInput")]
pub struct UserWorkspaces {
    pub workspace_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "UserProfileSettingsInput")]
pub struct UserProfileSettings {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub notifications: Option<bool>,
}

/// Hydrated user as exposed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "User")]
pub struct User {
    pub user_id: String,
    pub org_id: Option<String>,
    pub username: Option<String>,
    pub email: String,
    pub platform_role: Option<String>,
    pub org_role: Option<String>,
    pub groups: Option<UserGroups>,
    pub my_workspace: Option<UserMyWorkspace>,
    pub workspaces: Option<UserWorkspaces>,
    pub profile_settings: Option<UserProfileSettings>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        Ok(User {
            user_id: row.user_id,
            org_id: row.org_id,
            username: row.username,
            email: row.email,
            platform_role: row.platform_role,
            org_role: row.org_role,
            groups: decode_json(row.groups)?,
            my_workspace: decode_json(row.my_workspace)?,
            workspaces: decode_json(row.workspaces)?,
            profile_settings: decode_json(row.profile_settings)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "CreateUserInput")]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub org_id: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub platform_role: Option<String>,
    #[serde(default)]
    pub org_role: Option<String>,
    #[serde(default)]
    pub groups: Option<UserGroups>,
    #[serde(default)]
    pub my_workspace: Option<UserMyWorkspace>,
    #[serde(default)]
    pub workspaces: Option<UserWorkspaces>,
    #[serde(default)]
    pub profile_settings: Option<UserProfileSettings>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "UpdateUserInput")]
pub struct UpdateUser {
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub platform_role: Option<String>,
    #[serde(default)]
    pub org_role: Option<String>,
    #[serde(default)]
    pub groups: Option<UserGroups>,
    #[serde(default)]
    pub my_workspace: Option<UserMyWorkspace>,
    #[serde(default)]
    pub workspaces: Option<UserWorkspaces>,
    #[serde(default)]
    pub profile_settings: Option<UserProfileSettings>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Model {
        Model {
            user_id: "u1".into(),
            org_id: Some("o1".into()),
            username: Some("alice".into()),
            email: "a@x.com".into(),
            platform_role: None,
            org_role: Some("member".into()),
            groups: Some(r#"{"groupIds":["g1","g2"]}"#.into()),
            my_workspace: None,
            workspaces: None,
            profile_settings: Some(r#"{"theme":"dark","notifications":true}"#.into()),
            created_at: Some("2026-01-01T00:00:00Z".into()),
            updated_at: None,
        }
    }

    #[test]
    fn test_hydration() {
        let user = User::try_from(row()).unwrap();
        assert_eq!(
            user.groups,
            Some(UserGroups {
                group_ids: vec!["g1".into(), "g2".into()]
            })
        );
        assert_eq!(
            user.profile_settings,
            Some(UserProfileSettings {
                theme: Some("dark".into()),
                notifications: Some(true),
            })
        );
        // NULL columns hydrate to None, never error
        assert!(user.my_workspace.is_none());
        assert!(user.workspaces.is_none());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let user = User::try_from(row()).unwrap();
        let wire = serde_json::to_value(&user).unwrap();
        assert_eq!(wire["userId"], "u1");
        assert_eq!(wire["groups"]["groupIds"][0], "g1");
        assert_eq!(wire["myWorkspace"], serde_json::Value::Null);
    }
}
