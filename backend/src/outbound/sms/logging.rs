//! Channel that writes messages to the log instead of sending them.
//!
//! Wired when no SMS provider credentials are configured, so local runs
//! exercise the full alert path without a provider account.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotificationChannel, NotificationError};

/// Logs each message at `info` and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationChannel;

#[async_trait]
impl NotificationChannel for LoggingNotificationChannel {
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<(), NotificationError> {
        info!(to, from, body, "sms delivery skipped; no provider configured");
        Ok(())
    }
}
