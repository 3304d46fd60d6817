//! Driving port for user administration reads.
//!
//! Inbound adapters call these use-cases to render listings and the
//! create/edit forms. Every operation takes the acting administrator so the
//! authorization gate is consulted before any store read.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Permission, PermissionId, Role, RoleId, User, UserId};

/// Role and permission catalogues presented by the create and edit forms.
#[derive(Debug, Clone, PartialEq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCatalog {
    /// Every role, with its permission set, for assignment pick lists.
    pub roles: Vec<Role>,
    /// Every permission, for direct-grant pick lists.
    pub permissions: Vec<Permission>,
}

/// Payload backing the edit form: the user, the catalogues, and the user's
/// current assignments so the form can pre-select them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditForm {
    /// The user being edited.
    pub user: User,
    /// Full role/permission catalogues.
    pub catalog: AccessCatalog,
    /// Ids of roles currently assigned to the user.
    pub assigned_role_ids: Vec<RoleId>,
    /// Ids of permissions currently granted directly to the user.
    pub assigned_permission_ids: Vec<PermissionId>,
    /// Union of role-derived and direct permission ids.
    pub effective_permission_ids: Vec<PermissionId>,
}

/// Read use-cases for the user administration surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminQuery: Send + Sync {
    /// All users the actor may see, in creation order.
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error>;

    /// A single user, subject to a per-record view check.
    async fn view_user(&self, actor: &Actor, id: &UserId) -> Result<User, Error>;

    /// Catalogues for the create form.
    async fn create_form(&self, actor: &Actor) -> Result<AccessCatalog, Error>;

    /// The edit form payload for one user.
    async fn edit_form(&self, actor: &Actor, id: &UserId) -> Result<EditForm, Error>;
}
