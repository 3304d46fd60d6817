//! Domain events emitted by the user administration service.
//!
//! Events stay transport agnostic so outbound adapters can map them to mail
//! jobs, queue payloads, or log records without re-encoding domain logic.

use std::fmt;

use crate::domain::User;

/// Length of generated initial passwords.
pub const INITIAL_PASSWORD_LEN: usize = 8;

/// Plaintext password generated once at account creation.
///
/// Write-once by contract: the service hashes it, hands it to the welcome
/// notifier, and drops it. It is deliberately not `Clone`-happy data — the
/// wrapper keeps it out of `Debug` output and log records.
#[derive(Clone, PartialEq, Eq)]
pub struct InitialPassword(String);

impl InitialPassword {
    /// Wrap a freshly generated plaintext password.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(plaintext.into())
    }

    /// Reveal the plaintext, for hashing and notification dispatch only.
    pub fn reveal(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for InitialPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitialPassword(<redacted>)")
    }
}

/// Event emitted after a user record has been persisted.
///
/// Carries the only copy of the plaintext initial password; the stored user
/// record holds just the hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCreatedEvent {
    /// The persisted user.
    pub user: User,
    /// Generated plaintext password for the welcome notification.
    pub initial_password: InitialPassword,
}
