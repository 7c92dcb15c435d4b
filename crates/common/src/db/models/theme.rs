//! Theme entity
//!
//! The theme payload itself is an opaque JSON document chosen by the
//! frontend; it is stored verbatim and never interpreted server side.

use crate::db::repository::Repository;
use crate::errors::AppError;
use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, SimpleObject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "themes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub theme_id: String,

    pub org_id: Option<String>,

    pub app_instance_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub theme: String,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_instance::Entity",
        from = "Column::AppInstanceId",
        to = "super::app_instance::Column::InstanceId"
    )]
    AppInstance,
}

impl Related<super::app_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Theme as exposed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "Theme", complex)]
pub struct Theme {
    pub theme_id: String,
    pub org_id: Option<String>,
    pub app_instance_id: Option<String>,
    pub theme: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[ComplexObject]
impl Theme {
    /// The app instance this theme belongs to, if any
    async fn app_instance(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<super::app_instance::AppInstance>> {
        let Some(instance_id) = self.app_instance_id.as_deref() else {
            return Ok(None);
        };
        let repo = ctx.data::<Repository>()?;
        repo.find_app_instance(instance_id)
            .await
            .map_err(|e| e.extend())
    }
}

impl TryFrom<Model> for Theme {
    type Error = AppError;

    fn try_from(row: Model) -> Result<Self, Self::Error> {
        Ok(Theme {
            theme_id: row.theme_id,
            org_id: row.org_id,
            app_instance_id: row.app_instance_id,
            theme: row.theme,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "CreateThemeInput")]
pub struct CreateTheme {
    #[validate(length(min = 1))]
    pub org_id: String,
    #[validate(length(min = 1))]
    pub theme: String,
    #[serde(default)]
    pub app_instance_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "UpdateThemeInput")]
pub struct UpdateTheme {
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub app_instance_id: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
