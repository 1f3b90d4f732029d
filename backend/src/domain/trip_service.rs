//! Trip State Machine: creation, progress updates and deletion.
//!
//! A user has at most one tracking trip. Creation and updates run under the
//! owner's lock so two concurrent creates cannot both pass the check.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::account_service::user_not_found;
use super::{
    Destination, Error, GeoPoint, Repositories, Trip, TripId, TripStatus, TripUpdate, UserId,
    UserLocks,
};

/// Raw input for starting a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripPlan {
    pub destination_name: Option<String>,
    pub destination_address: Option<String>,
    pub destination_latitude: Option<String>,
    pub destination_longitude: Option<String>,
    pub current_latitude: Option<String>,
    pub current_longitude: Option<String>,
}

/// Raw input for a progress update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripProgress {
    pub current_latitude: Option<String>,
    pub current_longitude: Option<String>,
    pub status: Option<String>,
}

/// Trip lifecycle service.
#[derive(Clone)]
pub struct TripService {
    repos: Repositories,
    locks: UserLocks,
    clock: Arc<dyn Clock>,
}

impl TripService {
    pub fn new(repos: Repositories, locks: UserLocks, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            locks,
            clock,
        }
    }

    /// Start a trip in `ONGOING` with tracking on.
    pub async fn create(&self, user_id: UserId, plan: TripPlan) -> Result<Trip, Error> {
        let (destination, current) = parse_plan(plan)?;

        let _guard = self.locks.lock(user_id).await;
        if self.repos.users.find_by_id(&user_id).await?.is_none() {
            return Err(user_not_found(user_id));
        }
        if let Some(active) = self.repos.trips.find_active_for_user(&user_id).await? {
            return Err(
                Error::conflict("a trip is already underway; cannot create another trip")
                    .with_details(json!({ "activeTripId": active.id() })),
            );
        }

        let trip = Trip::start(TripId::random(), user_id, destination, current, self.clock.utc());
        self.repos.trips.save(&trip).await?;
        info!(user_id = %user_id, trip_id = %trip.id(), "trip started");
        Ok(trip)
    }

    /// Fetch one trip.
    pub async fn get(&self, trip_id: TripId) -> Result<Trip, Error> {
        self.repos
            .trips
            .find_by_id(&trip_id)
            .await?
            .ok_or_else(|| trip_not_found(trip_id))
    }

    /// Record progress and optionally change status.
    ///
    /// Terminal trips reject every update with `invalid_state`.
    pub async fn update(&self, trip_id: TripId, progress: TripProgress) -> Result<Trip, Error> {
        let update = parse_progress(progress)?;

        let owner = self.get(trip_id).await?.user_id();
        let _guard = self.locks.lock(owner).await;
        let mut trip = self.get(trip_id).await?;
        let previous = trip.status();
        trip.apply_update(update, self.clock.utc())
            .map_err(|err| Error::invalid_state(err.to_string()))?;
        self.repos.trips.save(&trip).await?;

        if trip.status() != previous {
            info!(
                trip_id = %trip_id,
                from = %previous,
                to = %trip.status(),
                tracking = trip.is_tracking(),
                "trip status changed"
            );
        }
        Ok(trip)
    }

    /// Delete a trip regardless of status.
    pub async fn delete(&self, trip_id: TripId) -> Result<Trip, Error> {
        let trip = self.get(trip_id).await?;
        if !self.repos.trips.delete(&trip_id).await? {
            return Err(trip_not_found(trip_id));
        }
        info!(trip_id = %trip_id, user_id = %trip.user_id(), "trip deleted");
        Ok(trip)
    }
}

fn parse_plan(plan: TripPlan) -> Result<(Destination, Option<GeoPoint>), Error> {
    let TripPlan {
        destination_name,
        destination_address,
        destination_latitude,
        destination_longitude,
        current_latitude,
        current_longitude,
    } = plan;

    let (Some(address), Some(latitude), Some(longitude)) =
        (destination_address, destination_latitude, destination_longitude)
    else {
        return Err(Error::invalid_request(
            "destination address, latitude and longitude are required",
        ));
    };
    let address = address.trim().to_owned();
    if address.is_empty() {
        return Err(Error::invalid_request("destination address must not be blank"));
    }
    let destination = Destination {
        name: destination_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty()),
        address,
        point: GeoPoint::parse(&latitude, &longitude)
            .map_err(|err| Error::invalid_request(err.to_string()))?,
    };
    let current = parse_point(current_latitude, current_longitude)?;
    Ok((destination, current))
}

fn parse_progress(progress: TripProgress) -> Result<TripUpdate, Error> {
    let status = progress
        .status
        .as_deref()
        .map(str::parse::<TripStatus>)
        .transpose()
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    Ok(TripUpdate {
        current_location: parse_point(progress.current_latitude, progress.current_longitude)?,
        status,
    })
}

fn parse_point(
    latitude: Option<String>,
    longitude: Option<String>,
) -> Result<Option<GeoPoint>, Error> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) => GeoPoint::parse(&latitude, &longitude)
            .map(Some)
            .map_err(|err| Error::invalid_request(err.to_string())),
        _ => Err(Error::invalid_request(
            "current latitude and longitude must be supplied together",
        )),
    }
}

fn trip_not_found(trip_id: TripId) -> Error {
    Error::not_found(format!("trip {trip_id} not found"))
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
