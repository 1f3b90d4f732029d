//! Alert Dispatcher: fans a message out to every contact of a user.
//!
//! Sends run concurrently up to a shared semaphore limit and never hold a
//! user lock. Each send is bounded by a timeout; timeouts and channel errors
//! are recorded per contact and never abort the rest of the fan-out.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{info, warn};

use super::account_service::user_not_found;
use super::ports::{NotificationChannel, NotificationError};
use super::{Alert, Contact, ContactId, Error, Repositories, TripId, User, UserId};

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDispatcherConfig {
    /// Number the messages are sent from.
    pub from_number: String,
    /// Country code applied to contact numbers entered without one.
    pub default_country_code: String,
    /// Base URL of the trip viewer linked from panic messages.
    pub trip_url_base: String,
    /// Concurrent channel sends allowed across all dispatches.
    pub max_concurrent_sends: usize,
    /// Upper bound on a single channel send.
    pub send_timeout: Duration,
}

impl Default for AlertDispatcherConfig {
    fn default() -> Self {
        Self {
            from_number: String::new(),
            default_country_code: "+1".to_owned(),
            trip_url_base: "http://localhost:8080/trips".to_owned(),
            max_concurrent_sends: 4,
            send_timeout: Duration::from_secs(10),
        }
    }
}

/// A contact the channel failed to reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailure {
    pub contact_id: ContactId,
    pub reason: String,
}

/// Per-contact outcome of one dispatch, in contact order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub sent: Vec<ContactId>,
    pub failed: Vec<DeliveryFailure>,
}

impl DispatchReport {
    /// True when every contact was reached.
    #[must_use]
    pub fn all_sent(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Alert fan-out service.
#[derive(Clone)]
pub struct AlertDispatcher {
    repos: Repositories,
    channel: Arc<dyn NotificationChannel>,
    permits: Arc<Semaphore>,
    config: Arc<AlertDispatcherConfig>,
}

impl AlertDispatcher {
    pub fn new(
        repos: Repositories,
        channel: Arc<dyn NotificationChannel>,
        config: AlertDispatcherConfig,
    ) -> Self {
        Self {
            repos,
            channel,
            permits: Arc::new(Semaphore::new(config.max_concurrent_sends.max(1))),
            config: Arc::new(config),
        }
    }

    /// Alert every contact of `user_id`.
    ///
    /// Fails with `no_contacts` when the user has none. A panic alert also
    /// requires the trip to exist and belong to the user.
    pub async fn dispatch(&self, user_id: UserId, alert: Alert) -> Result<DispatchReport, Error> {
        let user = self
            .repos
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;
        if let Alert::Panic { trip_id } = alert {
            self.ensure_trip_owner(user_id, trip_id).await?;
        }

        let contacts = self.repos.contacts.list_for_user(&user_id).await?;
        if contacts.is_empty() {
            return Err(Error::no_contacts(format!(
                "{} has no emergency contacts to alert",
                user.username()
            )));
        }

        let report = self.fan_out(&user, &alert, &contacts).await;
        info!(
            user_id = %user_id,
            alert = alert.kind(),
            sent = report.sent.len(),
            failed = report.failed.len(),
            "alert dispatched"
        );
        Ok(report)
    }

    /// Panic alert for `trip_id`.
    pub async fn panic(&self, user_id: UserId, trip_id: TripId) -> Result<DispatchReport, Error> {
        self.dispatch(user_id, Alert::Panic { trip_id }).await
    }

    async fn ensure_trip_owner(&self, user_id: UserId, trip_id: TripId) -> Result<(), Error> {
        match self.repos.trips.find_by_id(&trip_id).await? {
            Some(trip) if trip.user_id() == user_id => Ok(()),
            _ => Err(Error::not_found(format!(
                "trip {trip_id} not found for user {user_id}"
            ))),
        }
    }

    async fn fan_out(&self, user: &User, alert: &Alert, contacts: &[Contact]) -> DispatchReport {
        let body = alert.render(user, &self.config.trip_url_base);
        let outcomes = join_all(
            contacts
                .iter()
                .map(|contact| self.deliver(contact, body.as_str())),
        )
        .await;

        let mut report = DispatchReport::default();
        for (contact, outcome) in contacts.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.sent.push(contact.id()),
                Err(reason) => {
                    warn!(
                        user_id = %user.id(),
                        contact_id = %contact.id(),
                        alert = alert.kind(),
                        %reason,
                        "alert delivery failed"
                    );
                    report.failed.push(DeliveryFailure {
                        contact_id: contact.id(),
                        reason,
                    });
                }
            }
        }
        report
    }

    async fn deliver(&self, contact: &Contact, body: &str) -> Result<(), String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| "alert dispatcher is shutting down".to_owned())?;
        let to = contact
            .phone()
            .normalized(&self.config.default_country_code);
        let send = self.channel.send(&to, &self.config.from_number, body);
        match timeout(self.config.send_timeout, send).await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(_) => Err(NotificationError::timeout(self.config.send_timeout.as_secs()).to_string()),
        }
    }
}

#[cfg(test)]
#[path = "alert_dispatcher_tests.rs"]
mod tests;
