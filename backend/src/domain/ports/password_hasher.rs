//! Port for one-way password hashing.

use crate::domain::PasswordHash;

/// Errors raised by password hasher adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// The hashing primitive failed.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

impl PasswordHasherError {
    /// Hashing failure with the given message.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Port turning a plaintext password into a stored hash.
///
/// The hash is written once at account creation and never compared against
/// plaintext inside this service; verification belongs to the login flow of
/// the surrounding system.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash the given plaintext.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;
}

/// Transparent, reversible stand-in hasher for tests.
///
/// Prefixes rather than hashes, so assertions can distinguish the stored
/// value from the plaintext without pulling a KDF into unit tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("$fixture${plaintext}")))
    }
}
