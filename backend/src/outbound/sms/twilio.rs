//! Reqwest-backed Twilio Messages adapter.
//!
//! Owns transport details only: form encoding, basic auth, timeout and
//! mapping of provider responses onto [`NotificationError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{NotificationChannel, NotificationError};

/// Public Twilio REST endpoint.
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Account credentials for the Messages API.
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Error body returned by the Twilio API.
#[derive(Debug, Deserialize)]
struct TwilioErrorDto {
    message: Option<String>,
    code: Option<u32>,
}

/// Sends messages through `POST /2010-04-01/Accounts/{sid}/Messages.json`.
pub struct TwilioSmsChannel {
    client: Client,
    messages_url: Url,
    credentials: TwilioCredentials,
    timeout: Duration,
}

impl TwilioSmsChannel {
    /// Build a channel against `api_base` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// base URL cannot hold the messages path.
    pub fn new(
        api_base: &Url,
        credentials: TwilioCredentials,
        timeout: Duration,
    ) -> Result<Self, TwilioSetupError> {
        let client = Client::builder().timeout(timeout).build()?;
        let messages_url = messages_url(api_base, &credentials.account_sid)?;
        Ok(Self {
            client,
            messages_url,
            credentials,
            timeout,
        })
    }
}

/// Failures while constructing the Twilio channel.
#[derive(Debug, thiserror::Error)]
pub enum TwilioSetupError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid Twilio API base: {0}")]
    Url(#[from] url::ParseError),
}

fn messages_url(api_base: &Url, account_sid: &str) -> Result<Url, url::ParseError> {
    let base = api_base.as_str().trim_end_matches('/');
    Url::parse(&format!(
        "{base}/2010-04-01/Accounts/{account_sid}/Messages.json"
    ))
}

#[async_trait]
impl NotificationChannel for TwilioSmsChannel {
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .map_err(|error| self.map_transport_error(error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| self.map_transport_error(error))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

impl TwilioSmsChannel {
    fn map_transport_error(&self, error: reqwest::Error) -> NotificationError {
        if error.is_timeout() {
            NotificationError::timeout(self.timeout.as_secs())
        } else {
            NotificationError::transport(error.to_string())
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotificationError {
    let message = match serde_json::from_slice::<TwilioErrorDto>(body) {
        Ok(TwilioErrorDto {
            message: Some(message),
            code: Some(code),
        }) => format!("{message} (code {code})"),
        Ok(TwilioErrorDto {
            message: Some(message),
            code: None,
        }) => message,
        _ => body_preview(body),
    };
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        NotificationError::transport(format!("status {}: {message}", status.as_u16()))
    } else {
        NotificationError::rejected(status.as_u16(), message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
