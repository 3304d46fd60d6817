//! Port for the role/permission catalogue and user assignments.
//!
//! Roles and permissions are created and curated outside this service; the
//! store exposes read access to the catalogue plus the user↔role and
//! user↔permission assignment relations the admin service writes.

use async_trait::async_trait;

use crate::domain::{Permission, PermissionId, Role, RoleId, UserAssignments, UserId};

/// Errors raised by access store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessStoreError {
    /// Store connection could not be established.
    #[error("access store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("access store query failed: {message}")]
    Query { message: String },

    /// A referenced role does not exist in the catalogue.
    #[error("unknown role id: {id}")]
    UnknownRole { id: RoleId },

    /// A referenced permission does not exist in the catalogue.
    #[error("unknown permission id: {id}")]
    UnknownPermission { id: PermissionId },
}

impl AccessStoreError {
    /// Connection failure with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query failure with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// The given role id is not in the catalogue.
    pub fn unknown_role(id: RoleId) -> Self {
        Self::UnknownRole { id }
    }

    /// The given permission id is not in the catalogue.
    pub fn unknown_permission(id: PermissionId) -> Self {
        Self::UnknownPermission { id }
    }
}

/// Port for catalogue reads and assignment writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// All roles in the catalogue, each carrying its permission set.
    async fn list_roles(&self) -> Result<Vec<Role>, AccessStoreError>;

    /// All permissions in the catalogue.
    async fn list_permissions(&self) -> Result<Vec<Permission>, AccessStoreError>;

    /// Resolve the given role ids, failing with
    /// [`AccessStoreError::UnknownRole`] on the first id not in the catalogue.
    async fn find_roles(&self, ids: &[RoleId]) -> Result<Vec<Role>, AccessStoreError>;

    /// Resolve the given permission ids, failing with
    /// [`AccessStoreError::UnknownPermission`] on the first unknown id.
    async fn find_permissions(
        &self,
        ids: &[PermissionId],
    ) -> Result<Vec<Permission>, AccessStoreError>;

    /// Assign the given roles to a user. Already-assigned roles are kept.
    async fn assign_roles(&self, user_id: &UserId, ids: &[RoleId])
    -> Result<(), AccessStoreError>;

    /// Grant the given permissions directly to a user.
    async fn grant_permissions(
        &self,
        user_id: &UserId,
        ids: &[PermissionId],
    ) -> Result<(), AccessStoreError>;

    /// The user's stored role and direct-permission assignment ids.
    async fn assignments_for(&self, user_id: &UserId)
    -> Result<UserAssignments, AccessStoreError>;

    /// Drop every assignment link for the user.
    async fn clear_assignments(&self, user_id: &UserId) -> Result<(), AccessStoreError>;
}

/// In-memory catalogue and assignment store for tests and database-less
/// development wiring.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    assignments: std::sync::Mutex<Vec<(UserId, Assignment)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assignment {
    Role(RoleId),
    Permission(PermissionId),
}

impl InMemoryAccessStore {
    /// Create a store with the given fixed catalogue.
    pub fn new(roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self {
            roles,
            permissions,
            assignments: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Catalogue used by the database-less development wiring: an
    /// administrators role bundling the four user-management permissions.
    pub fn with_default_catalogue() -> Self {
        let permissions = vec![
            Permission::new(PermissionId(1), "users.view"),
            Permission::new(PermissionId(2), "users.create"),
            Permission::new(PermissionId(3), "users.update"),
            Permission::new(PermissionId(4), "users.delete"),
        ];
        let roles = vec![Role::new(
            RoleId(1),
            "administrators",
            permissions.clone(),
        )];
        Self::new(roles, permissions)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(UserId, Assignment)>> {
        self.assignments.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AccessStore for InMemoryAccessStore {
    async fn list_roles(&self) -> Result<Vec<Role>, AccessStoreError> {
        Ok(self.roles.clone())
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, AccessStoreError> {
        Ok(self.permissions.clone())
    }

    async fn find_roles(&self, ids: &[RoleId]) -> Result<Vec<Role>, AccessStoreError> {
        ids.iter()
            .map(|id| {
                self.roles
                    .iter()
                    .find(|role| role.id() == *id)
                    .cloned()
                    .ok_or_else(|| AccessStoreError::unknown_role(*id))
            })
            .collect()
    }

    async fn find_permissions(
        &self,
        ids: &[PermissionId],
    ) -> Result<Vec<Permission>, AccessStoreError> {
        ids.iter()
            .map(|id| {
                self.permissions
                    .iter()
                    .find(|permission| permission.id() == *id)
                    .cloned()
                    .ok_or_else(|| AccessStoreError::unknown_permission(*id))
            })
            .collect()
    }

    async fn assign_roles(
        &self,
        user_id: &UserId,
        ids: &[RoleId],
    ) -> Result<(), AccessStoreError> {
        self.find_roles(ids).await?;
        let mut assignments = self.lock();
        for id in ids {
            let entry = (*user_id, Assignment::Role(*id));
            if !assignments.contains(&entry) {
                assignments.push(entry);
            }
        }
        Ok(())
    }

    async fn grant_permissions(
        &self,
        user_id: &UserId,
        ids: &[PermissionId],
    ) -> Result<(), AccessStoreError> {
        self.find_permissions(ids).await?;
        let mut assignments = self.lock();
        for id in ids {
            let entry = (*user_id, Assignment::Permission(*id));
            if !assignments.contains(&entry) {
                assignments.push(entry);
            }
        }
        Ok(())
    }

    async fn assignments_for(
        &self,
        user_id: &UserId,
    ) -> Result<UserAssignments, AccessStoreError> {
        let assignments = self.lock();
        let mut result = UserAssignments::default();
        for (owner, assignment) in assignments.iter() {
            if owner != user_id {
                continue;
            }
            match assignment {
                Assignment::Role(id) => result.role_ids.push(*id),
                Assignment::Permission(id) => result.permission_ids.push(*id),
            }
        }
        Ok(result)
    }

    async fn clear_assignments(&self, user_id: &UserId) -> Result<(), AccessStoreError> {
        self.lock().retain(|(owner, _)| owner != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_roles_reports_first_unknown_id() {
        let store = InMemoryAccessStore::with_default_catalogue();
        let err = store
            .find_roles(&[RoleId(1), RoleId(42)])
            .await
            .expect_err("unknown role");
        assert_eq!(err, AccessStoreError::unknown_role(RoleId(42)));
    }

    #[tokio::test]
    async fn assignments_round_trip() {
        let store = InMemoryAccessStore::with_default_catalogue();
        let user_id = UserId::random();

        store
            .assign_roles(&user_id, &[RoleId(1)])
            .await
            .expect("assign role");
        store
            .grant_permissions(&user_id, &[PermissionId(4)])
            .await
            .expect("grant permission");

        let assignments = store.assignments_for(&user_id).await.expect("assignments");
        assert_eq!(assignments.role_ids, vec![RoleId(1)]);
        assert_eq!(assignments.permission_ids, vec![PermissionId(4)]);

        store.clear_assignments(&user_id).await.expect("clear");
        let cleared = store.assignments_for(&user_id).await.expect("assignments");
        assert_eq!(cleared, UserAssignments::default());
    }

    #[tokio::test]
    async fn repeated_assignment_is_idempotent() {
        let store = InMemoryAccessStore::with_default_catalogue();
        let user_id = UserId::random();

        store
            .assign_roles(&user_id, &[RoleId(1)])
            .await
            .expect("assign role");
        store
            .assign_roles(&user_id, &[RoleId(1)])
            .await
            .expect("assign role again");

        let assignments = store.assignments_for(&user_id).await.expect("assignments");
        assert_eq!(assignments.role_ids, vec![RoleId(1)]);
    }
}
