//! Trip lifecycle.
//!
//! A trip starts `ONGOING` and tracking. It may move between `ONGOING` and
//! `PANIC` freely; `CANCEL` and `COMPLETE` are final and stop tracking.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GeoPoint, TripId, UserId};

/// Trip status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Ongoing,
    Panic,
    Cancel,
    Complete,
}

impl TripStatus {
    /// Terminal trips accept no further updates.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancel | Self::Complete)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ONGOING",
            Self::Panic => "PANIC",
            Self::Cancel => "CANCEL",
            Self::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trip status '{0}'")]
pub struct UnknownTripStatus(pub String);

impl FromStr for TripStatus {
    type Err = UnknownTripStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ONGOING" => Ok(Self::Ongoing),
            "PANIC" => Ok(Self::Panic),
            "CANCEL" => Ok(Self::Cancel),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(UnknownTripStatus(other.to_owned())),
        }
    }
}

/// Where the user is heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub name: Option<String>,
    pub address: String,
    pub point: GeoPoint,
}

/// Rejected trip transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripTransitionError {
    #[error("cannot update {status} trips")]
    Terminal { status: TripStatus },
}

/// A change submitted for an active trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripUpdate {
    pub current_location: Option<GeoPoint>,
    pub status: Option<TripStatus>,
}

/// Trip owned by a single user.
///
/// ## Invariants
/// - `is_tracking` is false once `status` is terminal.
/// - Terminal trips never change again.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: TripId,
    user_id: UserId,
    destination: Destination,
    current_location: Option<GeoPoint>,
    status: TripStatus,
    is_tracking: bool,
    last_update: DateTime<Utc>,
}

impl Trip {
    /// Begin tracking a new trip.
    #[must_use]
    pub fn start(
        id: TripId,
        user_id: UserId,
        destination: Destination,
        current_location: Option<GeoPoint>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            destination,
            current_location,
            status: TripStatus::Ongoing,
            is_tracking: true,
            last_update: now,
        }
    }

    /// Apply `update` at `now`.
    ///
    /// Moving to `CANCEL` or `COMPLETE` stops tracking. A rejected update
    /// leaves the trip untouched.
    ///
    /// # Examples
    /// ```
    /// use buddy_backend::domain::{
    ///     Destination, GeoPoint, Trip, TripId, TripStatus, TripUpdate, UserId,
    /// };
    /// use chrono::Utc;
    ///
    /// let destination = Destination {
    ///     name: None,
    ///     address: "Pike Place".to_owned(),
    ///     point: GeoPoint::parse("47.6097", "-122.3422").expect("valid point"),
    /// };
    /// let mut trip = Trip::start(TripId::random(), UserId::random(), destination, None, Utc::now());
    /// trip.apply_update(
    ///     TripUpdate { status: Some(TripStatus::Complete), ..TripUpdate::default() },
    ///     Utc::now(),
    /// )
    /// .expect("ongoing trips accept updates");
    /// assert!(!trip.is_tracking());
    /// assert!(trip.apply_update(TripUpdate::default(), Utc::now()).is_err());
    /// ```
    pub fn apply_update(
        &mut self,
        update: TripUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), TripTransitionError> {
        if self.status.is_terminal() {
            return Err(TripTransitionError::Terminal {
                status: self.status,
            });
        }
        if let Some(location) = update.current_location {
            self.current_location = Some(location);
        }
        if let Some(status) = update.status {
            self.status = status;
            if status.is_terminal() {
                self.is_tracking = false;
            }
        }
        self.last_update = now;
        Ok(())
    }

    pub fn id(&self) -> TripId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn current_location(&self) -> Option<&GeoPoint> {
        self.current_location.as_ref()
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
}
