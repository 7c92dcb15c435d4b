//! SeaORM entity models
//!
//! Each entity module carries the storage row (`Model`), the hydrated
//! wire-facing type, and the create/update inputs shared by the REST and
//! GraphQL surfaces.

use serde::{Deserialize, Serialize};

pub mod account_audit_log;
pub mod app_instance;
pub mod theme;
pub mod user;
pub mod workspace;

/// Opaque JSON document carried through unchanged.
///
/// Used for payloads the server never interprets, such as audit state
/// snapshots. On GraphQL it surfaces as an untyped scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonBlob(pub serde_json::Value);

async_graphql::scalar!(JsonBlob);

pub use user::{
    ActiveModel as UserActiveModel,
    Column as UserColumn,
    CreateUser,
    Entity as UserEntity,
    Model as UserRow,
    UpdateUser,
    User,
    UserGroups,
    UserMyWorkspace,
    UserProfileSettings,
    UserWorkspaces,
};

pub use workspace::{
    AclRole,
    ActiveModel as WorkspaceActiveModel,
    Column as WorkspaceColumn,
    CreateWorkspace,
    Entity as WorkspaceEntity,
    Model as WorkspaceRow,
    UpdateWorkspace,
    Workspace,
    WorkspaceAcl,
    WorkspaceApps,
    WorkspaceChildren,
};

pub use app_instance::{
    ActiveModel as AppInstanceActiveModel,
    AppInstance,
    Column as AppInstanceColumn,
    CreateAppInstance,
    Entity as AppInstanceEntity,
    InstanceConfig,
    InstanceMetadata,
    Model as AppInstanceRow,
    UpdateAppInstance,
};

pub use account_audit_log::{
    AccountAuditLog,
    ActiveModel as AccountAuditLogActiveModel,
    Column as AccountAuditLogColumn,
    CreateAccountAuditLog,
    Entity as AccountAuditLogEntity,
    EventMetadata,
    Model as AccountAuditLogRow,
    UpdateAccountAuditLog,
};

pub use theme::{
    ActiveModel as ThemeActiveModel,
    Column as ThemeColumn,
    CreateTheme,
    Entity as ThemeEntity,
    Model as ThemeRow,
    Theme,
    UpdateTheme,
};
