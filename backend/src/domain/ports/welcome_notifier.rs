//! Port for the out-of-band welcome notification.
//!
//! Dispatch is fire-and-forget from the caller's point of view: the service
//! logs a failed dispatch and still reports the creation as successful.
//! Delivery guarantees (retries, at-least-once) live behind this port.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::UserCreatedEvent;

/// Errors raised by notifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The notification could not be handed to the delivery channel.
    #[error("welcome notification dispatch failed: {message}")]
    Dispatch { message: String },
}

impl NotifyError {
    /// Dispatch failure with the given message.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }
}

/// Port receiving the user-created event with its one-time password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WelcomeNotifier: Send + Sync {
    /// Hand the event to the delivery channel.
    async fn notify(&self, event: &UserCreatedEvent) -> Result<(), NotifyError>;
}

/// Notifier that records every event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingWelcomeNotifier {
    events: Mutex<Vec<UserCreatedEvent>>,
}

impl RecordingWelcomeNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in dispatch order.
    pub fn recorded(&self) -> Vec<UserCreatedEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl WelcomeNotifier for RecordingWelcomeNotifier {
    async fn notify(&self, event: &UserCreatedEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Ok(())
    }
}
