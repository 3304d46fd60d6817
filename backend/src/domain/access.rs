//! Roles, permissions, and the effective-permission computation.
//!
//! Roles and permissions are catalogued and managed outside this service;
//! here they are read-only values the admin service assigns to users and
//! presents to form views.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a role in the external access catalogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RoleId(pub i32);

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a permission in the external access catalogue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PermissionId(pub i32);

impl std::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An atomic capability grantable directly or through a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    id: PermissionId,
    name: String,
}

impl Permission {
    /// Build a permission from catalogue data.
    pub fn new(id: PermissionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Catalogue identifier.
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Stable permission name (e.g. `users.create`).
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A named bundle of permissions assignable to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    id: RoleId,
    name: String,
    permissions: Vec<Permission>,
}

impl Role {
    /// Build a role from catalogue data.
    pub fn new(id: RoleId, name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions,
        }
    }

    /// Catalogue identifier.
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Human-readable role name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Permissions granted by this role.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// A user's stored assignment ids: roles plus direct permission grants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAssignments {
    /// Roles assigned to the user.
    pub role_ids: Vec<RoleId>,
    /// Permissions granted directly, independent of any role.
    pub permission_ids: Vec<PermissionId>,
}

/// Union of direct grants and all role-derived permissions.
///
/// This is the effective permission set invariant: what a user may do is the
/// union of what its roles grant and what was granted directly. The result
/// is ordered and deduplicated.
pub fn effective_permissions(roles: &[Role], direct: &[Permission]) -> BTreeSet<Permission> {
    roles
        .iter()
        .flat_map(|role| role.permissions().iter())
        .chain(direct.iter())
        .cloned()
        .collect()
}
