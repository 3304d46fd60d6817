//! Driving port for user administration mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Error, PermissionId, RoleId, User, UserId};

/// Input for the create use-case.
///
/// Raw strings by design: field validation is a service concern so the full
/// violation list can be collected in one pass rather than failing at the
/// first bad field during deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Submitted account name.
    pub name: String,
    /// Submitted email address.
    pub email: String,
    /// Roles to assign to the new account.
    pub role_ids: Vec<RoleId>,
    /// Permissions to grant directly to the new account.
    pub permission_ids: Vec<PermissionId>,
}

/// Input for the update use-case. Absent fields are left unchanged.
///
/// Role and permission assignments are deliberately not part of this
/// request; assignment changes happen only at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    /// Replacement account name, when provided.
    pub name: Option<String>,
    /// Replacement email address, when provided.
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Whether the request changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Mutation use-cases for the user administration surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdminCommand: Send + Sync {
    /// Create an account with a generated one-time password, assign the
    /// requested roles and permissions, and dispatch a welcome notification.
    async fn create_user(&self, actor: &Actor, request: CreateUserRequest)
    -> Result<User, Error>;

    /// Apply a partial update to name and/or email.
    async fn update_user(
        &self,
        actor: &Actor,
        id: &UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error>;

    /// Remove the account and its assignment links.
    async fn delete_user(&self, actor: &Actor, id: &UserId) -> Result<(), Error>;
}
