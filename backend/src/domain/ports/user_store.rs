//! Port for user account persistence.
//!
//! The user store is the single writer of record for user rows. Email
//! uniqueness is enforced here, race-free under concurrent inserts, so the
//! service's pre-check is a courtesy and the store's [`UserStoreError::DuplicateEmail`]
//! is the authoritative signal.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

/// Persistence errors raised by user store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },

    /// The email address is already taken by another user.
    #[error("email address is already in use: {email}")]
    DuplicateEmail { email: String },
}

impl UserStoreError {
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

    /// Unique-constraint violation on the given email.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Port for user account storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user record.
    ///
    /// Fails with [`UserStoreError::DuplicateEmail`] when another user
    /// already holds the email address; the check and the write are atomic.
    async fn insert(&self, user: &User) -> Result<(), UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError>;

    /// List all users in creation order (oldest first, id as tiebreaker).
    async fn list(&self) -> Result<Vec<User>, UserStoreError>;

    /// Overwrite an existing user record.
    ///
    /// Subject to the same email-uniqueness enforcement as [`UserStore::insert`].
    async fn update(&self, user: &User) -> Result<(), UserStoreError>;

    /// Hard-delete a user record. Deleting an absent id is a no-op.
    async fn delete(&self, id: &UserId) -> Result<(), UserStoreError>;
}

/// In-memory store for tests and database-less development wiring.
///
/// Enforces the same email-uniqueness contract as the SQL adapter, with a
/// single mutex standing in for the unique constraint.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(UserStoreError::duplicate_email(user.email().as_ref()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.email() == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserStoreError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let mut listed = users.clone();
        listed.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(listed)
    }

    async fn update(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        if users
            .iter()
            .any(|u| u.email() == user.email() && u.id() != user.id())
        {
            return Err(UserStoreError::duplicate_email(user.email().as_ref()));
        }
        match users.iter_mut().find(|u| u.id() == user.id()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(UserStoreError::query("user row missing for update")),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.retain(|u| u.id() != id);
        Ok(())
    }
}
