//! Port for initial-password generation.

use crate::domain::InitialPassword;

/// Errors raised by password generator adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordGeneratorError {
    /// The entropy source failed.
    #[error("password entropy source failed: {message}")]
    Entropy { message: String },
}

impl PasswordGeneratorError {
    /// Entropy source failure with the given message.
    pub fn entropy(message: impl Into<String>) -> Self {
        Self::Entropy {
            message: message.into(),
        }
    }
}

/// Port producing one-time initial passwords.
///
/// Output is [`crate::domain::INITIAL_PASSWORD_LEN`] characters drawn from
/// a cryptographically adequate source and never reused across calls. The
/// service hashes the value once and forwards the plaintext only to the
/// welcome notifier.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordGenerator: Send + Sync {
    /// Generate a fresh random password.
    fn generate(&self) -> Result<InitialPassword, PasswordGeneratorError>;
}

/// Fixed-output generator for tests and examples.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordGenerator;

impl PasswordGenerator for FixturePasswordGenerator {
    fn generate(&self) -> Result<InitialPassword, PasswordGeneratorError> {
        Ok(InitialPassword::new("fixture1"))
    }
}
