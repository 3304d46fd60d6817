//! User administration domain service.
//!
//! Implements the driving ports by composing the driven ports: authorize
//! via the gate first, validate, then orchestrate stores, the password
//! primitives, and the welcome notifier. The service holds no state between
//! invocations; the stores remain the sources of truth.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::domain::ports::{
    AccessCatalog, AccessStore, AccessStoreError, AuthorizationGate, CreateUserRequest, EditForm,
    GateError, PasswordGenerator, PasswordGeneratorError, PasswordHasher, PasswordHasherError,
    UpdateUserRequest, UserAction, UserAdminCommand, UserAdminQuery, UserStore, UserStoreError,
    UserTarget, WelcomeNotifier,
};
use crate::domain::user_validation::{FIELD_EMAIL, validate_create, validate_update};
use crate::domain::{
    Actor, EmailAddress, Error, FieldViolation, User, UserCreatedEvent, UserId,
    effective_permissions,
};

/// Orchestrator for the user administration use-cases.
pub struct UserAdminService<S, A, G, P, H, N> {
    users: Arc<S>,
    access: Arc<A>,
    gate: Arc<G>,
    passwords: Arc<P>,
    hasher: Arc<H>,
    notifier: Arc<N>,
}

impl<S, A, G, P, H, N> UserAdminService<S, A, G, P, H, N> {
    /// Create a service over the given collaborators.
    pub fn new(
        users: Arc<S>,
        access: Arc<A>,
        gate: Arc<G>,
        passwords: Arc<P>,
        hasher: Arc<H>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            users,
            access,
            gate,
            passwords,
            hasher,
            notifier,
        }
    }
}

fn email_taken_violation() -> FieldViolation {
    FieldViolation::new(FIELD_EMAIL, "taken", "email is already in use")
}

fn map_gate_error(error: GateError) -> Error {
    match error {
        GateError::Denied { reason } => Error::forbidden(reason),
        GateError::Unavailable { message } => {
            Error::service_unavailable(format!("authorization gate unavailable: {message}"))
        }
    }
}

fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        // The store's unique constraint is the authoritative uniqueness
        // check; surface it exactly like the pre-check does.
        UserStoreError::DuplicateEmail { .. } => Error::validation(vec![email_taken_violation()]),
    }
}

fn map_access_store_error(error: AccessStoreError) -> Error {
    match error {
        AccessStoreError::Connection { message } => {
            Error::service_unavailable(format!("access store unavailable: {message}"))
        }
        AccessStoreError::Query { message } => {
            Error::internal(format!("access store error: {message}"))
        }
        AccessStoreError::UnknownRole { id } => Error::not_found(format!("role {id} not found")),
        AccessStoreError::UnknownPermission { id } => {
            Error::not_found(format!("permission {id} not found"))
        }
    }
}

/// Mapping for catalogue reads made on behalf of stored assignments: an
/// unknown id here is stale stored state, not bad caller input.
fn map_stale_assignment_error(error: AccessStoreError) -> Error {
    match error {
        AccessStoreError::UnknownRole { id } => {
            Error::internal(format!("assignment references missing role {id}"))
        }
        AccessStoreError::UnknownPermission { id } => {
            Error::internal(format!("assignment references missing permission {id}"))
        }
        other => map_access_store_error(other),
    }
}

fn map_generator_error(error: PasswordGeneratorError) -> Error {
    Error::internal(format!("password generation failed: {error}"))
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

impl<S, A, G, P, H, N> UserAdminService<S, A, G, P, H, N>
where
    S: UserStore,
    A: AccessStore,
    G: AuthorizationGate,
    P: PasswordGenerator,
    H: PasswordHasher,
    N: WelcomeNotifier,
{
    /// Consult the gate, mapping a denial to `Forbidden` before any store
    /// access so an unauthorized actor learns nothing about the target.
    async fn authorize(
        &self,
        actor: &Actor,
        action: UserAction,
        target: &UserTarget,
    ) -> Result<(), Error> {
        self.gate
            .authorize(actor, action, target)
            .await
            .map_err(map_gate_error)
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Reject an email already held by a user other than `exempt`.
    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        exempt: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_store_error)?;
        match existing {
            Some(user) if Some(user.id()) != exempt => {
                Err(Error::validation(vec![email_taken_violation()]))
            }
            _ => Ok(()),
        }
    }

    async fn load_catalog(&self) -> Result<AccessCatalog, Error> {
        let roles = self
            .access
            .list_roles()
            .await
            .map_err(map_access_store_error)?;
        let permissions = self
            .access
            .list_permissions()
            .await
            .map_err(map_access_store_error)?;
        Ok(AccessCatalog { roles, permissions })
    }
}

#[async_trait]
impl<S, A, G, P, H, N> UserAdminQuery for UserAdminService<S, A, G, P, H, N>
where
    S: UserStore,
    A: AccessStore,
    G: AuthorizationGate,
    P: PasswordGenerator,
    H: PasswordHasher,
    N: WelcomeNotifier,
{
    async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, Error> {
        self.authorize(actor, UserAction::List, &UserTarget::AnyUser)
            .await?;
        let users = self.users.list().await.map_err(map_user_store_error)?;
        self.gate
            .filter_listing(actor, users)
            .await
            .map_err(map_gate_error)
    }

    async fn view_user(&self, actor: &Actor, id: &UserId) -> Result<User, Error> {
        self.authorize(actor, UserAction::View, &UserTarget::User(*id))
            .await?;
        self.fetch_user(id).await
    }

    async fn create_form(&self, actor: &Actor) -> Result<AccessCatalog, Error> {
        self.authorize(actor, UserAction::Create, &UserTarget::AnyUser)
            .await?;
        self.load_catalog().await
    }

    async fn edit_form(&self, actor: &Actor, id: &UserId) -> Result<EditForm, Error> {
        self.authorize(actor, UserAction::Update, &UserTarget::User(*id))
            .await?;
        let user = self.fetch_user(id).await?;
        let catalog = self.load_catalog().await?;

        let assignments = self
            .access
            .assignments_for(id)
            .await
            .map_err(map_access_store_error)?;
        let assigned_roles = self
            .access
            .find_roles(&assignments.role_ids)
            .await
            .map_err(map_stale_assignment_error)?;
        let direct_permissions = self
            .access
            .find_permissions(&assignments.permission_ids)
            .await
            .map_err(map_stale_assignment_error)?;
        let effective_permission_ids = effective_permissions(&assigned_roles, &direct_permissions)
            .into_iter()
            .map(|permission| permission.id())
            .collect();

        Ok(EditForm {
            user,
            catalog,
            assigned_role_ids: assignments.role_ids,
            assigned_permission_ids: assignments.permission_ids,
            effective_permission_ids,
        })
    }
}

#[async_trait]
impl<S, A, G, P, H, N> UserAdminCommand for UserAdminService<S, A, G, P, H, N>
where
    S: UserStore,
    A: AccessStore,
    G: AuthorizationGate,
    P: PasswordGenerator,
    H: PasswordHasher,
    N: WelcomeNotifier,
{
    async fn create_user(
        &self,
        actor: &Actor,
        request: CreateUserRequest,
    ) -> Result<User, Error> {
        self.authorize(actor, UserAction::Create, &UserTarget::AnyUser)
            .await?;

        let validated = validate_create(&request).map_err(Error::validation)?;
        self.ensure_email_free(&validated.email, None).await?;

        // Resolve assignment ids before any write so an unknown id cannot
        // leave a user row behind.
        if !request.role_ids.is_empty() {
            self.access
                .find_roles(&request.role_ids)
                .await
                .map_err(map_access_store_error)?;
        }
        if !request.permission_ids.is_empty() {
            self.access
                .find_permissions(&request.permission_ids)
                .await
                .map_err(map_access_store_error)?;
        }

        let initial_password = self.passwords.generate().map_err(map_generator_error)?;
        let password_hash = self
            .hasher
            .hash(initial_password.reveal())
            .map_err(map_hasher_error)?;

        let now = Utc::now();
        let user = User::new(
            UserId::random(),
            validated.name,
            validated.email,
            password_hash,
            now,
            now,
        );
        // A concurrent create racing past the pre-check lands here as
        // DuplicateEmail and maps onto the same email violation.
        self.users.insert(&user).await.map_err(map_user_store_error)?;

        if !request.role_ids.is_empty() {
            self.access
                .assign_roles(user.id(), &request.role_ids)
                .await
                .map_err(map_access_store_error)?;
        }
        if !request.permission_ids.is_empty() {
            self.access
                .grant_permissions(user.id(), &request.permission_ids)
                .await
                .map_err(map_access_store_error)?;
        }

        let event = UserCreatedEvent {
            user: user.clone(),
            initial_password,
        };
        // Fire-and-forget: a failed dispatch must not fail the creation,
        // but it must be observable.
        if let Err(error) = self.notifier.notify(&event).await {
            warn!(user_id = %user.id(), %error, "welcome notification dispatch failed");
        }

        Ok(user)
    }

    async fn update_user(
        &self,
        actor: &Actor,
        id: &UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error> {
        self.authorize(actor, UserAction::Update, &UserTarget::User(*id))
            .await?;
        let user = self.fetch_user(id).await?;

        let validated = validate_update(&request).map_err(Error::validation)?;
        if let Some(email) = &validated.email {
            self.ensure_email_free(email, Some(user.id())).await?;
        }

        let updated = user.with_changes(validated.name, validated.email, Utc::now());
        self.users
            .update(&updated)
            .await
            .map_err(map_user_store_error)?;
        Ok(updated)
    }

    async fn delete_user(&self, actor: &Actor, id: &UserId) -> Result<(), Error> {
        self.authorize(actor, UserAction::Delete, &UserTarget::User(*id))
            .await?;
        self.fetch_user(id).await?;

        self.access
            .clear_assignments(id)
            .await
            .map_err(map_access_store_error)?;
        self.users.delete(id).await.map_err(map_user_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DenyAllGate, FixturePasswordGenerator, FixturePasswordHasher, InMemoryAccessStore,
        InMemoryUserStore, MockAccessStore, MockAuthorizationGate, MockPasswordGenerator,
        MockUserStore, MockWelcomeNotifier, NotifyError, PermitAllGate,
        RecordingWelcomeNotifier,
    };
    use crate::domain::{
        ErrorCode, PasswordHash, Permission, PermissionId, Role, RoleId, UserName,
    };
    use serde_json::Value;

    type FixtureService<S, A, G, N> =
        UserAdminService<S, A, G, FixturePasswordGenerator, FixturePasswordHasher, N>;

    fn service<S, A, G, N>(users: S, access: A, gate: G, notifier: N) -> FixtureService<S, A, G, N> {
        UserAdminService::new(
            Arc::new(users),
            Arc::new(access),
            Arc::new(gate),
            Arc::new(FixturePasswordGenerator),
            Arc::new(FixturePasswordHasher),
            Arc::new(notifier),
        )
    }

    fn actor() -> Actor {
        Actor::new(UserId::random())
    }

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            ..CreateUserRequest::default()
        }
    }

    fn stored_user(name: &str, email: &str) -> User {
        User::new(
            UserId::random(),
            UserName::new(name).expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
            PasswordHash::new("$fixture$stored"),
            Utc::now(),
            Utc::now(),
        )
    }

    fn violation_codes(error: &Error) -> Vec<(String, String)> {
        error
            .details()
            .and_then(|details| details.get("violations"))
            .and_then(Value::as_array)
            .map(|violations| {
                violations
                    .iter()
                    .map(|v| {
                        (
                            v.get("field").and_then(Value::as_str).unwrap_or("").to_owned(),
                            v.get("code").and_then(Value::as_str).unwrap_or("").to_owned(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn create_user_persists_hashes_and_notifies() {
        let service = service(
            InMemoryUserStore::new(),
            InMemoryAccessStore::with_default_catalogue(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let created = service
            .create_user(&actor(), create_request("Jane Doe", "jane@example.com"))
            .await
            .expect("create succeeds");

        assert_eq!(created.name().as_ref(), "Jane Doe");
        assert_eq!(created.email().as_ref(), "jane@example.com");

        let fetched = service
            .view_user(&actor(), created.id())
            .await
            .expect("view succeeds");
        assert_eq!(fetched.email(), created.email());

        let events = service.notifier.recorded();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.user.id(), created.id());
        assert_eq!(event.initial_password.reveal().chars().count(), 8);
        // Stored hash must never equal the generated plaintext.
        assert_ne!(
            fetched.password_hash().as_str(),
            event.initial_password.reveal()
        );
    }

    #[tokio::test]
    async fn create_user_assigns_requested_roles_and_permissions() {
        let access = Arc::new(InMemoryAccessStore::with_default_catalogue());
        let service = UserAdminService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::clone(&access),
            Arc::new(PermitAllGate),
            Arc::new(FixturePasswordGenerator),
            Arc::new(FixturePasswordHasher),
            Arc::new(RecordingWelcomeNotifier::new()),
        );

        let mut request = create_request("Jane Doe", "jane@example.com");
        request.role_ids = vec![RoleId(1)];
        request.permission_ids = vec![PermissionId(4)];

        let created = service
            .create_user(&actor(), request)
            .await
            .expect("create succeeds");

        let assignments = access
            .assignments_for(created.id())
            .await
            .expect("assignments");
        assert_eq!(assignments.role_ids, vec![RoleId(1)]);
        assert_eq!(assignments.permission_ids, vec![PermissionId(4)]);
    }

    #[tokio::test]
    async fn create_user_rejects_unknown_role_before_persisting() {
        // No expectation on insert: resolving the unknown role must happen
        // before any user row is written.
        let mut users = MockUserStore::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let mut access = MockAccessStore::new();
        access
            .expect_find_roles()
            .times(1)
            .returning(|_| Err(AccessStoreError::unknown_role(RoleId(42))));

        let service = service(users, access, PermitAllGate, RecordingWelcomeNotifier::new());
        let mut request = create_request("Jane Doe", "jane@example.com");
        request.role_ids = vec![RoleId(42)];

        let error = service
            .create_user(&actor(), request)
            .await
            .expect_err("unknown role");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn create_user_collects_all_field_violations() {
        let service = service(
            MockUserStore::new(),
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let error = service
            .create_user(&actor(), create_request("", "not-an-email"))
            .await
            .expect_err("two violations");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            violation_codes(&error),
            vec![
                ("name".to_owned(), "required".to_owned()),
                ("email".to_owned(), "invalid".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn create_user_rejects_taken_email_without_writing() {
        let users = InMemoryUserStore::new();
        let existing = stored_user("Jane Doe", "jane@example.com");
        users.insert(&existing).await.expect("seed user");

        let service = service(
            users,
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let error = service
            .create_user(&actor(), create_request("Impostor", "jane@example.com"))
            .await
            .expect_err("email taken");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            violation_codes(&error),
            vec![("email".to_owned(), "taken".to_owned())]
        );
        let listed = service.users.list().await.expect("list");
        assert_eq!(listed.len(), 1, "no second record must exist");
    }

    #[tokio::test]
    async fn create_user_maps_store_level_duplicate_to_email_violation() {
        // The pre-check passes (race window) and the store's unique
        // constraint fires on insert.
        let mut users = MockUserStore::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        users
            .expect_insert()
            .times(1)
            .returning(|_| Err(UserStoreError::duplicate_email("jane@example.com")));

        let service = service(
            users,
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let error = service
            .create_user(&actor(), create_request("Jane Doe", "jane@example.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(
            violation_codes(&error),
            vec![("email".to_owned(), "taken".to_owned())]
        );
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_email_yield_exactly_one_user() {
        let service = Arc::new(service(
            InMemoryUserStore::new(),
            InMemoryAccessStore::with_default_catalogue(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        ));

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_user(&actor(), create_request("Jane A", "jane@example.com"))
                    .await
            })
        };
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_user(&actor(), create_request("Jane B", "jane@example.com"))
                    .await
            })
        };

        let outcomes = [
            first.await.expect("task completes"),
            second.await.expect("task completes"),
        ];
        let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
        assert_eq!(successes, 1, "exactly one create may win");

        let listed = service.users.list().await.expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn create_user_succeeds_when_notification_dispatch_fails() {
        let mut notifier = MockWelcomeNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_| Err(NotifyError::dispatch("smtp relay refused connection")));

        let service = service(
            InMemoryUserStore::new(),
            InMemoryAccessStore::with_default_catalogue(),
            PermitAllGate,
            notifier,
        );

        let created = service
            .create_user(&actor(), create_request("Jane Doe", "jane@example.com"))
            .await
            .expect("creation still succeeds");
        assert_eq!(created.email().as_ref(), "jane@example.com");
    }

    #[tokio::test]
    async fn denied_actor_gets_forbidden_and_causes_no_mutation() {
        // Mock stores with zero expectations double as "no side effect"
        // assertions: any store call would panic the test.
        let service = service(
            MockUserStore::new(),
            MockAccessStore::new(),
            DenyAllGate,
            RecordingWelcomeNotifier::new(),
        );
        let actor = actor();
        let id = UserId::random();

        let list_err = service.list_users(&actor).await.expect_err("forbidden");
        let view_err = service.view_user(&actor, &id).await.expect_err("forbidden");
        let create_err = service
            .create_user(&actor, create_request("Jane", "jane@example.com"))
            .await
            .expect_err("forbidden");
        let update_err = service
            .update_user(&actor, &id, UpdateUserRequest::default())
            .await
            .expect_err("forbidden");
        let delete_err = service.delete_user(&actor, &id).await.expect_err("forbidden");

        for error in [list_err, view_err, create_err, update_err, delete_err] {
            assert_eq!(error.code(), ErrorCode::Forbidden);
            // Denials must not disclose whether the target exists.
            assert!(!error.message().contains("not found"));
        }
        assert!(service.notifier.recorded().is_empty());
    }

    #[tokio::test]
    async fn update_user_with_name_only_keeps_email() {
        let users = InMemoryUserStore::new();
        let existing = stored_user("Jane Doe", "jane@example.com");
        users.insert(&existing).await.expect("seed user");

        let service = service(
            users,
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let updated = service
            .update_user(
                &actor(),
                existing.id(),
                UpdateUserRequest {
                    name: Some("Janet Doe".to_owned()),
                    email: None,
                },
            )
            .await
            .expect("update succeeds");

        assert_eq!(updated.name().as_ref(), "Janet Doe");
        assert_eq!(updated.email().as_ref(), "jane@example.com");
    }

    #[tokio::test]
    async fn update_user_allows_resubmitting_own_email() {
        let users = InMemoryUserStore::new();
        let existing = stored_user("Jane Doe", "jane@example.com");
        users.insert(&existing).await.expect("seed user");

        let service = service(
            users,
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let updated = service
            .update_user(
                &actor(),
                existing.id(),
                UpdateUserRequest {
                    name: None,
                    email: Some("jane@example.com".to_owned()),
                },
            )
            .await
            .expect("own email is not a conflict");
        assert_eq!(updated.email().as_ref(), "jane@example.com");
    }

    #[tokio::test]
    async fn update_user_rejects_email_held_by_another_user() {
        let users = InMemoryUserStore::new();
        let jane = stored_user("Jane", "jane@example.com");
        let john = stored_user("John", "john@example.com");
        users.insert(&jane).await.expect("seed jane");
        users.insert(&john).await.expect("seed john");

        let service = service(
            users,
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let error = service
            .update_user(
                &actor(),
                john.id(),
                UpdateUserRequest {
                    name: None,
                    email: Some("jane@example.com".to_owned()),
                },
            )
            .await
            .expect_err("email taken");
        assert_eq!(
            violation_codes(&error),
            vec![("email".to_owned(), "taken".to_owned())]
        );
    }

    #[tokio::test]
    async fn update_user_reports_missing_target() {
        let service = service(
            InMemoryUserStore::new(),
            MockAccessStore::new(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let error = service
            .update_user(&actor(), &UserId::random(), UpdateUserRequest::default())
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_user_removes_record_and_assignments() {
        let users = InMemoryUserStore::new();
        let access = Arc::new(InMemoryAccessStore::with_default_catalogue());
        let existing = stored_user("Jane Doe", "jane@example.com");
        users.insert(&existing).await.expect("seed user");
        access
            .assign_roles(existing.id(), &[RoleId(1)])
            .await
            .expect("seed assignment");

        let service = UserAdminService::new(
            Arc::new(users),
            Arc::clone(&access),
            Arc::new(PermitAllGate),
            Arc::new(FixturePasswordGenerator),
            Arc::new(FixturePasswordHasher),
            Arc::new(RecordingWelcomeNotifier::new()),
        );
        let id = *existing.id();

        service.delete_user(&actor(), &id).await.expect("delete");

        let error = service
            .view_user(&actor(), &id)
            .await
            .expect_err("record is gone");
        assert_eq!(error.code(), ErrorCode::NotFound);
        let assignments = access.assignments_for(&id).await.expect("assignments");
        assert!(assignments.role_ids.is_empty());
    }

    #[tokio::test]
    async fn list_users_applies_gate_scoping() {
        let users = InMemoryUserStore::new();
        let jane = stored_user("Jane", "jane@example.com");
        let john = stored_user("John", "john@example.com");
        users.insert(&jane).await.expect("seed jane");
        users.insert(&john).await.expect("seed john");
        let jane_id = *jane.id();

        let mut gate = MockAuthorizationGate::new();
        gate.expect_authorize().times(1).returning(|_, _, _| Ok(()));
        gate.expect_filter_listing()
            .times(1)
            .returning(move |_, users| {
                Ok(users.into_iter().filter(|u| *u.id() == jane_id).collect())
            });

        let service = service(users, MockAccessStore::new(), gate, RecordingWelcomeNotifier::new());

        let listed = service.list_users(&actor()).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name().as_ref(), "Jane");
    }

    #[tokio::test]
    async fn create_form_returns_full_catalogues() {
        let service = service(
            MockUserStore::new(),
            InMemoryAccessStore::with_default_catalogue(),
            PermitAllGate,
            RecordingWelcomeNotifier::new(),
        );

        let catalog = service.create_form(&actor()).await.expect("catalog");
        assert_eq!(catalog.roles.len(), 1);
        assert_eq!(catalog.permissions.len(), 4);
        assert_eq!(catalog.roles[0].permissions().len(), 4);
    }

    #[tokio::test]
    async fn edit_form_preselects_assignments_and_unions_permissions() {
        let users = InMemoryUserStore::new();
        let existing = stored_user("Jane Doe", "jane@example.com");
        users.insert(&existing).await.expect("seed user");

        let reviewer_perm = Permission::new(PermissionId(10), "reports.view");
        let access = InMemoryAccessStore::new(
            vec![Role::new(
                RoleId(1),
                "administrators",
                vec![
                    Permission::new(PermissionId(1), "users.view"),
                    Permission::new(PermissionId(2), "users.create"),
                ],
            )],
            vec![
                Permission::new(PermissionId(1), "users.view"),
                Permission::new(PermissionId(2), "users.create"),
                reviewer_perm.clone(),
            ],
        );
        access
            .assign_roles(existing.id(), &[RoleId(1)])
            .await
            .expect("assign role");
        access
            .grant_permissions(existing.id(), &[PermissionId(10)])
            .await
            .expect("grant permission");

        let service = service(users, access, PermitAllGate, RecordingWelcomeNotifier::new());

        let form = service
            .edit_form(&actor(), existing.id())
            .await
            .expect("edit form");

        assert_eq!(form.user.id(), existing.id());
        assert_eq!(form.assigned_role_ids, vec![RoleId(1)]);
        assert_eq!(form.assigned_permission_ids, vec![PermissionId(10)]);
        assert_eq!(
            form.effective_permission_ids,
            vec![PermissionId(1), PermissionId(2), PermissionId(10)]
        );
        assert_eq!(form.catalog.permissions.len(), 3);
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_internal_error() {
        let mut users = MockUserStore::new();
        users.expect_find_by_email().times(1).returning(|_| Ok(None));

        let mut passwords = MockPasswordGenerator::new();
        passwords
            .expect_generate()
            .times(1)
            .returning(|| Err(PasswordGeneratorError::entropy("os rng unavailable")));

        let service = UserAdminService::new(
            Arc::new(users),
            Arc::new(MockAccessStore::new()),
            Arc::new(PermitAllGate),
            Arc::new(passwords),
            Arc::new(FixturePasswordHasher),
            Arc::new(RecordingWelcomeNotifier::new()),
        );

        let error = service
            .create_user(&actor(), create_request("Jane Doe", "jane@example.com"))
            .await
            .expect_err("entropy failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
