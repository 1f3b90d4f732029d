//! Text-message adapters for the notification channel port.

mod logging;
mod twilio;

pub use logging::LoggingNotificationChannel;
pub use twilio::{
    DEFAULT_TWILIO_API_BASE, TwilioCredentials, TwilioSetupError, TwilioSmsChannel,
};
