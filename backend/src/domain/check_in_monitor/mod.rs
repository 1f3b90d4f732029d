//! Check-In Monitor: finds users who missed their check-in and alerts their
//! contacts.
//!
//! The enforcement window is a fixed [`OVERDUE_WINDOW_HOURS`]. A user's own
//! `check_in_period` only appears in the message text.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{Alert, AlertDispatcher, Error, ErrorCode, Repositories, UserId};

mod scheduler;

pub use scheduler::CheckInScheduler;

/// Hours without a check-in after which a user is overdue.
pub const OVERDUE_WINDOW_HOURS: i64 = 24;

/// A user whose alert could not be dispatched at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub user_id: UserId,
    pub reason: String,
}

/// Summary of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Users whose contacts were alerted (possibly partially).
    pub alerted: Vec<UserId>,
    /// Overdue users with no contacts.
    pub skipped_without_contacts: Vec<UserId>,
    /// Individual contact deliveries that failed across all users.
    pub failed_deliveries: usize,
    /// Users whose dispatch failed outright.
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Overdue users found by the scan.
    #[must_use]
    pub fn overdue(&self) -> usize {
        self.alerted.len() + self.skipped_without_contacts.len() + self.failures.len()
    }
}

/// Runs a single overdue scan.
#[derive(Clone)]
pub struct CheckInMonitor {
    repos: Repositories,
    dispatcher: AlertDispatcher,
    clock: Arc<dyn Clock>,
}

impl CheckInMonitor {
    pub fn new(repos: Repositories, dispatcher: AlertDispatcher, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            dispatcher,
            clock,
        }
    }

    /// Alert the contacts of every overdue user.
    ///
    /// Only a failure to query overdue users is returned as an error;
    /// per-user and per-contact failures are collected in the report.
    pub async fn scan(&self) -> Result<ScanReport, Error> {
        let threshold = self.clock.utc() - TimeDelta::hours(OVERDUE_WINDOW_HOURS);
        let overdue = self.repos.users.find_overdue_check_ins(threshold).await?;
        if overdue.is_empty() {
            debug!(%threshold, "check-in scan found no overdue users");
            return Ok(ScanReport::default());
        }

        let mut report = ScanReport::default();
        for user in overdue {
            let user_id = user.id();
            match self.dispatcher.dispatch(user_id, Alert::OverdueCheckIn).await {
                Ok(dispatch) => {
                    report.failed_deliveries += dispatch.failed.len();
                    report.alerted.push(user_id);
                }
                Err(err) if err.code() == ErrorCode::NoContacts => {
                    debug!(user_id = %user_id, "overdue user has no contacts; skipping");
                    report.skipped_without_contacts.push(user_id);
                }
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "overdue alert failed");
                    report.failures.push(ScanFailure {
                        user_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            overdue = report.overdue(),
            alerted = report.alerted.len(),
            skipped = report.skipped_without_contacts.len(),
            failed_deliveries = report.failed_deliveries,
            failures = report.failures.len(),
            "check-in scan finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests;
