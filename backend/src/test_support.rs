//! Test doubles shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so
//! integration tests under `tests/` can reach it.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{NotificationChannel, NotificationError};

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_hours(&self, hours: i64) {
        *self.lock_clock() += TimeDelta::hours(hours);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A message handed to [`RecordingNotificationChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub from: String,
    pub body: String,
}

/// Channel that records every send and fails for scripted numbers.
#[derive(Default)]
pub struct RecordingNotificationChannel {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `number` fail.
    pub fn fail_for(&self, number: impl Into<String>) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(number.into());
    }

    /// Messages accepted so far, in send order. Failed sends are excluded.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recipients of accepted messages.
    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|message| message.to).collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingNotificationChannel {
    async fn send(&self, to: &str, from: &str, body: &str) -> Result<(), NotificationError> {
        let fails = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(to);
        if fails {
            return Err(NotificationError::rejected(
                400_u16,
                format!("scripted failure for {to}"),
            ));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentMessage {
                to: to.to_owned(),
                from: from.to_owned(),
                body: body.to_owned(),
            });
        Ok(())
    }
}
