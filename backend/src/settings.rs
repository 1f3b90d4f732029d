//! Application settings loaded via OrthoConfig.
//!
//! Values layer from defaults, a configuration file, `BUDDY_*` environment
//! variables and command-line flags. Absent optional values fall back to the
//! defaults exposed by the accessor methods.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::AlertDispatcherConfig;
use crate::outbound::sms::{DEFAULT_TWILIO_API_BASE, TwilioCredentials};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 86_400;
const DEFAULT_COUNTRY_CODE: &str = "+1";
const DEFAULT_TRIP_URL_BASE: &str = "http://localhost:8080/trips";
const DEFAULT_ALERT_CONCURRENCY: usize = 4;
const DEFAULT_SMS_TIMEOUT_SECS: u64 = 10;

/// Server, scheduler and notification settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BUDDY")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Seconds between overdue check-in scans.
    pub check_in_scan_interval_secs: Option<u64>,
    /// Number alerts are sent from.
    pub sms_from_number: Option<String>,
    /// Country code applied to contact numbers entered without one.
    pub sms_country_code: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    /// Override for the Twilio REST endpoint.
    pub twilio_api_base: Option<String>,
    /// Base URL of the trip viewer linked from panic alerts.
    pub trip_url_base: Option<String>,
    /// Concurrent SMS sends allowed across all alerts.
    pub alert_max_concurrency: Option<usize>,
    /// Upper bound on a single SMS send.
    pub sms_timeout_secs: Option<u64>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field(
                "check_in_scan_interval_secs",
                &self.check_in_scan_interval_secs,
            )
            .field("sms_from_number", &self.sms_from_number)
            .field("sms_country_code", &self.sms_country_code)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field(
                "twilio_auth_token",
                &self.twilio_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .field("twilio_api_base", &self.twilio_api_base)
            .field("trip_url_base", &self.trip_url_base)
            .field("alert_max_concurrency", &self.alert_max_concurrency)
            .field("sms_timeout_secs", &self.sms_timeout_secs)
            .finish()
    }
}

impl AppSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(
            self.check_in_scan_interval_secs
                .unwrap_or(DEFAULT_SCAN_INTERVAL_SECS),
        )
    }

    pub fn sms_timeout(&self) -> Duration {
        Duration::from_secs(self.sms_timeout_secs.unwrap_or(DEFAULT_SMS_TIMEOUT_SECS))
    }

    pub fn twilio_api_base(&self) -> &str {
        self.twilio_api_base
            .as_deref()
            .unwrap_or(DEFAULT_TWILIO_API_BASE)
    }

    /// Twilio credentials when both the SID and the token are set.
    pub fn twilio_credentials(&self) -> Option<TwilioCredentials> {
        match (&self.twilio_account_sid, &self.twilio_auth_token) {
            (Some(account_sid), Some(auth_token)) => Some(TwilioCredentials {
                account_sid: account_sid.clone(),
                auth_token: auth_token.clone(),
            }),
            _ => None,
        }
    }

    pub fn dispatcher_config(&self) -> AlertDispatcherConfig {
        AlertDispatcherConfig {
            from_number: self.sms_from_number.clone().unwrap_or_default(),
            default_country_code: self
                .sms_country_code
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_owned()),
            trip_url_base: self
                .trip_url_base
                .clone()
                .unwrap_or_else(|| DEFAULT_TRIP_URL_BASE.to_owned()),
            max_concurrent_sends: self
                .alert_max_concurrency
                .unwrap_or(DEFAULT_ALERT_CONCURRENCY),
            send_timeout: self.sms_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 10] = [
        "BUDDY_BIND_ADDR",
        "BUDDY_CHECK_IN_SCAN_INTERVAL_SECS",
        "BUDDY_SMS_FROM_NUMBER",
        "BUDDY_SMS_COUNTRY_CODE",
        "BUDDY_TWILIO_ACCOUNT_SID",
        "BUDDY_TWILIO_AUTH_TOKEN",
        "BUDDY_TWILIO_API_BASE",
        "BUDDY_TRIP_URL_BASE",
        "BUDDY_ALERT_MAX_CONCURRENCY",
        "BUDDY_SMS_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("buddy-backend")])
            .expect("config should load")
    }

    /// Every key unset except the given overrides.
    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.scan_interval(), Duration::from_secs(86_400));
        assert!(settings.twilio_credentials().is_none());

        let dispatcher = settings.dispatcher_config();
        assert_eq!(dispatcher.default_country_code, "+1");
        assert_eq!(dispatcher.max_concurrent_sends, 4);
        assert_eq!(dispatcher.send_timeout, Duration::from_secs(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BUDDY_BIND_ADDR", "127.0.0.1:9090"),
            ("BUDDY_CHECK_IN_SCAN_INTERVAL_SECS", "60"),
            ("BUDDY_SMS_FROM_NUMBER", "+12065550199"),
            ("BUDDY_TWILIO_ACCOUNT_SID", "AC123"),
            ("BUDDY_TWILIO_AUTH_TOKEN", "hunter2"),
            ("BUDDY_ALERT_MAX_CONCURRENCY", "8"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(settings.scan_interval(), Duration::from_secs(60));
        let credentials = settings.twilio_credentials().expect("credentials");
        assert_eq!(credentials.account_sid, "AC123");
        assert_eq!(settings.dispatcher_config().from_number, "+12065550199");
        assert_eq!(settings.dispatcher_config().max_concurrent_sends, 8);
        assert!(!format!("{settings:?}").contains("hunter2"));
    }

    #[rstest]
    fn token_without_sid_leaves_twilio_disabled() {
        let _guard = lock_env(env_with(&[("BUDDY_TWILIO_AUTH_TOKEN", "hunter2")]));

        assert!(load_from_empty_args().twilio_credentials().is_none());
    }
}
