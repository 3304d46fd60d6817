//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (stores, gate, security primitives, notifier) are consumed
//! by the admin service; driving ports (query, command, login) are what
//! inbound adapters call. Each port ships a fixture implementation for tests
//! and database-less wiring; mocks are generated for crate-internal tests.

mod access_store;
mod authorization_gate;
mod login_service;
mod password_generator;
mod password_hasher;
mod user_admin_command;
mod user_admin_query;
mod user_store;
mod welcome_notifier;

#[cfg(test)]
pub use access_store::MockAccessStore;
pub use access_store::{AccessStore, AccessStoreError, InMemoryAccessStore};
#[cfg(test)]
pub use authorization_gate::MockAuthorizationGate;
pub use authorization_gate::{
    AuthorizationGate, DenyAllGate, GateError, PermitAllGate, UserAction, UserTarget,
};
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use password_generator::MockPasswordGenerator;
pub use password_generator::{FixturePasswordGenerator, PasswordGenerator, PasswordGeneratorError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_admin_command::MockUserAdminCommand;
pub use user_admin_command::{CreateUserRequest, UpdateUserRequest, UserAdminCommand};
#[cfg(test)]
pub use user_admin_query::MockUserAdminQuery;
pub use user_admin_query::{AccessCatalog, EditForm, UserAdminQuery};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{InMemoryUserStore, UserStore, UserStoreError};
#[cfg(test)]
pub use welcome_notifier::MockWelcomeNotifier;
pub use welcome_notifier::{NotifyError, RecordingWelcomeNotifier, WelcomeNotifier};
