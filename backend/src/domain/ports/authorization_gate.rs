//! Port for the authorization policy engine.
//!
//! The gate decides whether an actor may perform an action on a user
//! resource. Its internal policy (role hierarchies, ownership rules) is an
//! external concern; the service only forwards actor, action, and target and
//! maps a denial to `Forbidden` before touching any store. Listing is the
//! one scoped operation: the gate may filter the result set rather than
//! allow or deny the call outright.

use async_trait::async_trait;

use crate::domain::{Actor, User, UserId};

/// Action an actor attempts on the user resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Enumerate user accounts.
    List,
    /// Read a single user account.
    View,
    /// Create a new user account.
    Create,
    /// Modify an existing user account.
    Update,
    /// Remove a user account.
    Delete,
}

impl UserAction {
    /// Stable lowercase name used in policy lookups and log records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of an authorization check: the user class as a whole (for create
/// and list) or one specific user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTarget {
    /// Any user / the user resource class (not-yet-persisted targets).
    AnyUser,
    /// One specific existing user.
    User(UserId),
}

/// Errors raised by gate adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The actor is not permitted to perform the action.
    #[error("denied: {reason}")]
    Denied { reason: String },

    /// The policy engine could not be consulted.
    #[error("authorization gate unavailable: {message}")]
    Unavailable { message: String },
}

impl GateError {
    /// Denial with the given policy reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    /// Gate backend failure with the given message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Port consulted before every service operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    /// Allow or deny `actor` performing `action` on `target`.
    async fn authorize(
        &self,
        actor: &Actor,
        action: UserAction,
        target: &UserTarget,
    ) -> Result<(), GateError>;

    /// Scope a listing to the users the actor may see.
    ///
    /// Called after [`AuthorizationGate::authorize`] has allowed
    /// [`UserAction::List`]; the default policy is usually all-or-nothing
    /// but per-record scoping is the gate's prerogative.
    async fn filter_listing(
        &self,
        actor: &Actor,
        users: Vec<User>,
    ) -> Result<Vec<User>, GateError>;
}

/// Gate that allows every action. Development and test wiring only.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAllGate;

#[async_trait]
impl AuthorizationGate for PermitAllGate {
    async fn authorize(
        &self,
        _actor: &Actor,
        _action: UserAction,
        _target: &UserTarget,
    ) -> Result<(), GateError> {
        Ok(())
    }

    async fn filter_listing(
        &self,
        _actor: &Actor,
        users: Vec<User>,
    ) -> Result<Vec<User>, GateError> {
        Ok(users)
    }
}

/// Gate that denies every action, for exercising the forbidden paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAllGate;

#[async_trait]
impl AuthorizationGate for DenyAllGate {
    async fn authorize(
        &self,
        _actor: &Actor,
        action: UserAction,
        _target: &UserTarget,
    ) -> Result<(), GateError> {
        Err(GateError::denied(format!(
            "policy denies {action} on users"
        )))
    }

    async fn filter_listing(
        &self,
        _actor: &Actor,
        _users: Vec<User>,
    ) -> Result<Vec<User>, GateError> {
        Ok(Vec::new())
    }
}
