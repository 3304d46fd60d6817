//! PostgreSQL-backed `UserStore` implementation using Diesel.
//!
//! The `users.email` unique constraint is the authoritative uniqueness
//! check: a concurrent insert racing past the service's pre-check surfaces
//! here as [`UserStoreError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{EmailAddress, PasswordHash, User, UserId, UserName};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserStore` port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserStoreError::connection(message)
        }
    }
}

/// Map a Diesel error, translating a unique violation into the duplicate
/// email signal for the address being written.
fn map_write_error(error: DieselError, email: &EmailAddress) -> UserStoreError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(
            constraint = info.constraint_name().unwrap_or("<unknown>"),
            "unique violation on users write"
        );
        return UserStoreError::duplicate_email(email.as_ref());
    }
    map_read_error(error)
}

fn map_read_error(error: DieselError) -> UserStoreError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserStoreError::connection(info.message().to_owned())
        }
        other => UserStoreError::query(other.to_string()),
    }
}

/// Convert a database row to a domain user.
///
/// The row was validated on the way in, so a failure here means the stored
/// data no longer satisfies the domain invariants.
fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let name = UserName::new(row.name)
        .map_err(|err| UserStoreError::query(format!("stored user name invalid: {err}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserStoreError::query(format!("stored user email invalid: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        PasswordHash::new(row.password_hash),
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = UserChangeset {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            updated_at: user.updated_at(),
        };
        let affected = diesel::update(users::table.find(user.id().as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        if affected == 0 {
            return Err(UserStoreError::query("user row missing for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(())
    }
}
