//! Welcome notification adapter.
//!
//! Structured-log implementation of the notifier port, standing in until a
//! mail transport is wired behind it. The log record identifies the account
//! but never the generated password; the plaintext exists only inside the
//! event handed to the real delivery channel.

use async_trait::async_trait;
use tracing::info;

use crate::domain::UserCreatedEvent;
use crate::domain::ports::{NotifyError, WelcomeNotifier};

/// Notifier that records the dispatch in the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWelcomeNotifier;

impl LogWelcomeNotifier {
    /// Create a new log-backed notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WelcomeNotifier for LogWelcomeNotifier {
    async fn notify(&self, event: &UserCreatedEvent) -> Result<(), NotifyError> {
        info!(
            user_id = %event.user.id(),
            email = %event.user.email(),
            "welcome notification dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EmailAddress, InitialPassword, PasswordHash, User, UserId, UserName,
    };
    use chrono::Utc;

    #[tokio::test]
    async fn dispatch_always_succeeds() {
        let event = UserCreatedEvent {
            user: User::new(
                UserId::random(),
                UserName::new("Jane Doe").expect("valid name"),
                EmailAddress::new("jane@example.com").expect("valid email"),
                PasswordHash::new("$fixture$hash"),
                Utc::now(),
                Utc::now(),
            ),
            initial_password: InitialPassword::new("s3cretpw"),
        };

        LogWelcomeNotifier::new()
            .notify(&event)
            .await
            .expect("log dispatch cannot fail");
    }
}
