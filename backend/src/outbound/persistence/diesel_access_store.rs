//! PostgreSQL-backed `AccessStore` implementation using Diesel.
//!
//! Catalogue reads run inside a transaction so the role list and its
//! permission bundles observe one MVCC snapshot; assignment writes for a
//! single call share a transaction so they land all-or-nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AccessStore, AccessStoreError};
use crate::domain::{Permission, PermissionId, Role, RoleId, UserAssignments, UserId};

use super::models::{PermissionRow, RoleRow, UserPermissionRow, UserRoleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{permissions, role_permissions, roles, user_permissions, user_roles};

/// Diesel-backed implementation of the `AccessStore` port.
#[derive(Clone)]
pub struct DieselAccessStore {
    pool: DbPool,
}

impl DieselAccessStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccessStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccessStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> AccessStoreError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            AccessStoreError::connection(info.message().to_owned())
        }
        other => AccessStoreError::query(other.to_string()),
    }
}

fn permission_from_row(row: PermissionRow) -> Permission {
    Permission::new(PermissionId(row.id), row.name)
}

/// Load roles (optionally restricted to `ids`) together with their
/// permission bundles, inside the caller's connection/transaction.
async fn load_roles<C>(conn: &mut C, ids: Option<&[RoleId]>) -> Result<Vec<Role>, DieselError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let role_rows: Vec<RoleRow> = match ids {
        Some(ids) => {
            let raw: Vec<i32> = ids.iter().map(|id| id.0).collect();
            roles::table
                .filter(roles::id.eq_any(raw))
                .select(RoleRow::as_select())
                .order(roles::id.asc())
                .load(conn)
                .await?
        }
        None => {
            roles::table
                .select(RoleRow::as_select())
                .order(roles::id.asc())
                .load(conn)
                .await?
        }
    };

    let role_ids: Vec<i32> = role_rows.iter().map(|row| row.id).collect();
    let bundle: Vec<(i32, PermissionRow)> = role_permissions::table
        .inner_join(permissions::table)
        .filter(role_permissions::role_id.eq_any(&role_ids))
        .select((role_permissions::role_id, PermissionRow::as_select()))
        .order((role_permissions::role_id.asc(), permissions::id.asc()))
        .load(conn)
        .await?;

    let mut by_role: HashMap<i32, Vec<Permission>> = HashMap::new();
    for (role_id, row) in bundle {
        by_role.entry(role_id).or_default().push(permission_from_row(row));
    }

    Ok(role_rows
        .into_iter()
        .map(|row| {
            let bundled = by_role.remove(&row.id).unwrap_or_default();
            Role::new(RoleId(row.id), row.name, bundled)
        })
        .collect())
}

/// Fail with the first id in `requested` that did not resolve.
fn ensure_all_roles_found(requested: &[RoleId], found: &[Role]) -> Result<(), AccessStoreError> {
    for id in requested {
        if !found.iter().any(|role| role.id() == *id) {
            return Err(AccessStoreError::unknown_role(*id));
        }
    }
    Ok(())
}

fn ensure_all_permissions_found(
    requested: &[PermissionId],
    found: &[Permission],
) -> Result<(), AccessStoreError> {
    for id in requested {
        if !found.iter().any(|permission| permission.id() == *id) {
            return Err(AccessStoreError::unknown_permission(*id));
        }
    }
    Ok(())
}

impl DieselAccessStore {
    async fn load_permissions(
        &self,
        conn: &mut AsyncPgConnection,
        ids: Option<&[PermissionId]>,
    ) -> Result<Vec<Permission>, AccessStoreError> {
        let rows: Vec<PermissionRow> = match ids {
            Some(ids) => {
                let raw: Vec<i32> = ids.iter().map(|id| id.0).collect();
                permissions::table
                    .filter(permissions::id.eq_any(raw))
                    .select(PermissionRow::as_select())
                    .order(permissions::id.asc())
                    .load(conn)
                    .await
                    .map_err(map_diesel_error)?
            }
            None => {
                permissions::table
                    .select(PermissionRow::as_select())
                    .order(permissions::id.asc())
                    .load(conn)
                    .await
                    .map_err(map_diesel_error)?
            }
        };
        Ok(rows.into_iter().map(permission_from_row).collect())
    }
}

#[async_trait]
impl AccessStore for DieselAccessStore {
    async fn list_roles(&self) -> Result<Vec<Role>, AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| async move { load_roles(conn, None).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        self.load_permissions(&mut conn, None).await
    }

    async fn find_roles(&self, ids: &[RoleId]) -> Result<Vec<Role>, AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = conn
            .transaction(|conn| async move { load_roles(conn, Some(ids)).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)?;
        ensure_all_roles_found(ids, &found)?;
        Ok(found)
    }

    async fn find_permissions(
        &self,
        ids: &[PermissionId],
    ) -> Result<Vec<Permission>, AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = self.load_permissions(&mut conn, Some(ids)).await?;
        ensure_all_permissions_found(ids, &found)?;
        Ok(found)
    }

    async fn assign_roles(
        &self,
        user_id: &UserId,
        ids: &[RoleId],
    ) -> Result<(), AccessStoreError> {
        self.find_roles(ids).await?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRoleRow> = ids
            .iter()
            .map(|id| UserRoleRow {
                user_id: *user_id.as_uuid(),
                role_id: id.0,
            })
            .collect();
        diesel::insert_into(user_roles::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn grant_permissions(
        &self,
        user_id: &UserId,
        ids: &[PermissionId],
    ) -> Result<(), AccessStoreError> {
        self.find_permissions(ids).await?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserPermissionRow> = ids
            .iter()
            .map(|id| UserPermissionRow {
                user_id: *user_id.as_uuid(),
                permission_id: id.0,
            })
            .collect();
        diesel::insert_into(user_permissions::table)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn assignments_for(
        &self,
        user_id: &UserId,
    ) -> Result<UserAssignments, AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuid = *user_id.as_uuid();
        let (role_ids, permission_ids) = conn
            .transaction(|conn| {
                async move {
                    let role_ids: Vec<i32> = user_roles::table
                        .filter(user_roles::user_id.eq(uuid))
                        .select(user_roles::role_id)
                        .order(user_roles::role_id.asc())
                        .load(conn)
                        .await?;
                    let permission_ids: Vec<i32> = user_permissions::table
                        .filter(user_permissions::user_id.eq(uuid))
                        .select(user_permissions::permission_id)
                        .order(user_permissions::permission_id.asc())
                        .load(conn)
                        .await?;
                    Ok::<_, DieselError>((role_ids, permission_ids))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(UserAssignments {
            role_ids: role_ids.into_iter().map(RoleId).collect(),
            permission_ids: permission_ids.into_iter().map(PermissionId).collect(),
        })
    }

    async fn clear_assignments(&self, user_id: &UserId) -> Result<(), AccessStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuid = *user_id.as_uuid();
        conn.transaction(|conn| {
            async move {
                diesel::delete(user_roles::table.filter(user_roles::user_id.eq(uuid)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    user_permissions::table.filter(user_permissions::user_id.eq(uuid)),
                )
                .execute(conn)
                .await?;
                Ok::<_, DieselError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: i32, name: &str) -> Role {
        Role::new(RoleId(id), name, Vec::new())
    }

    #[test]
    fn missing_role_id_is_reported_first() {
        let found = vec![role(1, "administrators")];
        let err = ensure_all_roles_found(&[RoleId(1), RoleId(7), RoleId(9)], &found)
            .expect_err("unknown role");
        assert_eq!(err, AccessStoreError::unknown_role(RoleId(7)));
    }

    #[test]
    fn complete_role_resolution_passes() {
        let found = vec![role(1, "administrators"), role(2, "auditors")];
        ensure_all_roles_found(&[RoleId(2), RoleId(1)], &found).expect("all resolved");
    }

    #[test]
    fn missing_permission_id_is_reported() {
        let found = vec![Permission::new(PermissionId(1), "users.view")];
        let err = ensure_all_permissions_found(&[PermissionId(1), PermissionId(3)], &found)
            .expect_err("unknown permission");
        assert_eq!(err, AccessStoreError::unknown_permission(PermissionId(3)));
    }
}
