//! Account audit log entity
//!
//! Append-biased event trail. `old_state`/`new_state` are opaque snapshots
//! of whatever the event touched, stored verbatim.

use crate::db::json::decode_json;
use crate::db::models::JsonBlob;
use crate::db::repository::Repository;
use crate::errors::AppError;
use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub audit_id: String,

    pub org_id: Option<String>,

    pub user_id: Option<String>,

    pub event_category: Option<String>,

    pub event_type: Option<String>,

    pub event_description: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub event_metadata: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub old_state: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub new_state: Option<String>,

    pub client_ip: Option<String>,

    pub user_agent: Option<String>,

    pub created_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "EventMetadataInput")]
pub struct EventMetadata {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Hydrated audit log entry as exposed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "AccountAuditLog", complex)]
pub struct AccountAuditLog {
    pub audit_id: String,
    pub org_id: Option<String>,
    pub user_id: Option<String>,
    pub event_category: Option<String>,
    pub event_type: Option<String>,
    pub event_description: Option<String>,
    pub event_metadata: Option<EventMetadata>,
    pub old_state: Option<JsonBlob>,
    pub new_state: Option<JsonBlob>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Option<String>,
}

#[ComplexObject]
impl AccountAuditLog {
    /// The user the event concerns, if recorded and still present
    async fn user(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<super::user::User>> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(None);
        };
        let repo = ctx.data::<Repository>()?;
        repo.find_user(user_id).await.map_err(|e| e.extend())
    }
}

impl TryFrom<Model> for AccountAuditLog {
    type Error = AppError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        Ok(AccountAuditLog {
            audit_id: row.audit_id,
            org_id: row.org_id,
            user_id: row.user_id,
            event_category: row.event_category,
            event_type: row.event_type,
            event_description: row.event_description,
            event_metadata: decode_json(row.event_metadata)?,
            old_state: decode_json(row.old_state)?,
            new_state: decode_json(row.new_state)?,
            client_ip: row.client_ip,
            user_agent: row.user_agent,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "CreateAccountAuditLogInput")]
pub struct CreateAccountAuditLog {
    /// Generated server side when absent
    #[serde(default)]
    pub audit_id: Option<String>,
    #[validate(length(min = 1))]
    pub org_id: String,
    #[validate(length(min = 1))]
    pub event_category: String,
    #[validate(length(min = 1))]
    pub event_description: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_metadata: Option<EventMetadata>,
    #[serde(default)]
    pub old_state: Option<JsonBlob>,
    #[serde(default)]
    pub new_state: Option<JsonBlob>,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "UpdateAccountAuditLogInput")]
pub struct UpdateAccountAuditLog {
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub event_category: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_description: Option<String>,
    #[serde(default)]
    pub event_metadata: Option<EventMetadata>,
    #[serde(default)]
    pub old_state: Option<JsonBlob>,
    #[serde(default)]
    pub new_state: Option<JsonBlob>,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_snapshots_stay_opaque() {
        let row = Model {
            audit_id: "al1".into(),
            org_id: Some("o1".into()),
            user_id: Some("u1".into()),
            event_category: Some("auth".into()),
            event_type: Some("login".into()),
            event_description: Some("user logged in".into()),
            event_metadata: Some(r#"{"sessionId":"s1"}"#.into()),
            old_state: None,
            new_state: Some(r#"{"roles":["admin"],"count":3}"#.into()),
            client_ip: Some("10.0.0.9".into()),
            user_agent: None,
            created_at: None,
        };
        let entry = AccountAuditLog::try_from(row).unwrap();
        assert_eq!(
            entry.event_metadata.unwrap().session_id.as_deref(),
            Some("s1")
        );
        assert!(entry.old_state.is_none());
        let new_state = entry.new_state.unwrap();
        assert_eq!(new_state.0["count"], 3);
    }
}
