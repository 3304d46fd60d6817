//! Domain entities, ports, and the user administration service.
//!
//! Everything in this module is transport and storage agnostic: entities
//! enforce their own invariants, ports describe the collaborators the
//! service depends on, and adapters live under `inbound`/`outbound`.

pub mod access;
pub mod auth;
pub mod error;
pub mod ports;
pub mod user;
pub mod user_admin_service;
pub mod user_events;
pub mod user_validation;

pub use self::access::{
    Permission, PermissionId, Role, RoleId, UserAssignments, effective_permissions,
};
pub use self::auth::{Actor, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, FieldViolation};
pub use self::user::{
    EMAIL_MAX, EmailAddress, PasswordHash, USER_NAME_MAX, User, UserFieldError, UserId, UserName,
};
pub use self::user_admin_service::UserAdminService;
pub use self::user_events::{INITIAL_PASSWORD_LEN, InitialPassword, UserCreatedEvent};

/// Convenient result alias for service and adapter signatures.
pub type ApiResult<T> = Result<T, Error>;
