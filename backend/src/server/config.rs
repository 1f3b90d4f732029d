//! Server configuration derived from [`AppSettings`].

use std::sync::Arc;
use std::time::Duration;

use buddy_backend::domain::AlertDispatcherConfig;
use buddy_backend::domain::ports::NotificationChannel;
use buddy_backend::outbound::sms::{LoggingNotificationChannel, TwilioSetupError, TwilioSmsChannel};
use buddy_backend::settings::AppSettings;
use tracing::{info, warn};
use url::Url;

/// Everything the server needs beyond the repositories.
pub struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) scan_interval: Duration,
    pub(crate) dispatcher: AlertDispatcherConfig,
    pub(crate) channel: Arc<dyn NotificationChannel>,
}

impl ServerConfig {
    /// Resolve settings, choosing Twilio when credentials are present and the
    /// logging channel otherwise.
    ///
    /// # Errors
    /// Returns [`TwilioSetupError`] when the API base is not a URL or the HTTP
    /// client cannot be built.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, TwilioSetupError> {
        let dispatcher = settings.dispatcher_config();
        let channel: Arc<dyn NotificationChannel> = match settings.twilio_credentials() {
            Some(credentials) => {
                let api_base = Url::parse(settings.twilio_api_base())?;
                info!(api_base = %api_base, "sending alerts through Twilio");
                Arc::new(TwilioSmsChannel::new(
                    &api_base,
                    credentials,
                    settings.sms_timeout(),
                )?)
            }
            None => {
                warn!("Twilio credentials not configured; alerts will only be logged");
                Arc::new(LoggingNotificationChannel)
            }
        };
        if dispatcher.from_number.is_empty() {
            warn!("no sender number configured for alerts");
        }
        Ok(Self {
            bind_addr: settings.bind_addr().to_owned(),
            scan_interval: settings.scan_interval(),
            dispatcher,
            channel,
        })
    }
}
