//! Authorization gate backed by stored assignments.
//!
//! Policy is data, not code: an actor may perform a user-management action
//! when its effective permission set (direct grants plus role-derived
//! grants, read through the access store) contains the permission named
//! after the action. Listing visibility is all-or-nothing under this
//! policy, so the scoping hook passes listings through unchanged.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    AccessStore, AccessStoreError, AuthorizationGate, GateError, UserAction, UserTarget,
};
use crate::domain::{Actor, Permission, User, effective_permissions};

/// Permission names consulted per action.
fn required_permission(action: UserAction) -> &'static str {
    match action {
        UserAction::List | UserAction::View => "users.view",
        UserAction::Create => "users.create",
        UserAction::Update => "users.update",
        UserAction::Delete => "users.delete",
    }
}

/// Gate granting actions to actors whose effective permissions cover them.
pub struct AssignmentBackedGate<A> {
    access: Arc<A>,
}

impl<A> AssignmentBackedGate<A> {
    /// Create a gate reading policy data from the given access store.
    pub fn new(access: Arc<A>) -> Self {
        Self { access }
    }
}

fn map_access_error(error: AccessStoreError) -> GateError {
    GateError::unavailable(error.to_string())
}

impl<A> AssignmentBackedGate<A>
where
    A: AccessStore,
{
    async fn effective_for(&self, actor: &Actor) -> Result<BTreeSet<Permission>, GateError> {
        let assignments = self
            .access
            .assignments_for(actor.id())
            .await
            .map_err(map_access_error)?;
        let roles = self
            .access
            .find_roles(&assignments.role_ids)
            .await
            .map_err(map_access_error)?;
        let direct = self
            .access
            .find_permissions(&assignments.permission_ids)
            .await
            .map_err(map_access_error)?;
        Ok(effective_permissions(&roles, &direct))
    }
}

#[async_trait]
impl<A> AuthorizationGate for AssignmentBackedGate<A>
where
    A: AccessStore,
{
    async fn authorize(
        &self,
        actor: &Actor,
        action: UserAction,
        _target: &UserTarget,
    ) -> Result<(), GateError> {
        let required = required_permission(action);
        let effective = self.effective_for(actor).await?;
        if effective.iter().any(|permission| permission.name() == required) {
            Ok(())
        } else {
            Err(GateError::denied(format!(
                "requires the {required} permission"
            )))
        }
    }

    async fn filter_listing(
        &self,
        _actor: &Actor,
        users: Vec<User>,
    ) -> Result<Vec<User>, GateError> {
        Ok(users)
    }
}
