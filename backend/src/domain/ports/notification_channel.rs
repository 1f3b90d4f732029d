//! Port for the outbound text-message channel.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing a message to the channel.
    pub enum NotificationError {
        /// The provider could not be reached.
        Transport { message: String } => "notification transport failed: {message}",
        /// The provider refused the message.
        Rejected { status: u16, message: String } =>
            "notification rejected with status {status}: {message}",
        /// The send did not finish within the configured timeout.
        Timeout { seconds: u64 } => "notification timed out after {seconds}s",
    }
}

/// Sends a text body from one normalised phone number to another.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver `body` to `to`, sent from `from`.
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<(), NotificationError>;
}

/// Fixture channel that accepts every message and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationChannel;

#[async_trait]
impl NotificationChannel for FixtureNotificationChannel {
    async fn send(&self, _to: &str, _from: &str, _body: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
