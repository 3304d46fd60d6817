//! Authenticated actor identity and login credentials.

use crate::domain::UserId;

/// The authenticated entity attempting an operation.
///
/// Adapters establish the actor (here, from the session cookie) and every
/// service operation forwards it to the authorization gate. The domain makes
/// no assumption about what makes an actor privileged; that is gate policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
}

impl Actor {
    /// Wrap an authenticated user id as an actor.
    pub fn new(id: UserId) -> Self {
        Self { id }
    }

    /// Identifier of the authenticated user.
    pub fn id(&self) -> &UserId {
        &self.id
    }
}

/// Validation errors for submitted login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyUsername,
    EmptyPassword,
}

impl std::fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Shape-validated login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw request parts.
    pub fn try_from_parts(
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<Self, LoginValidationError> {
        let username = username.as_ref();
        let password = password.as_ref();
        if username.trim().is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Submitted username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Submitted password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

// Keep submitted passwords out of debug output.
impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
