//! Port for trip persistence.

use async_trait::async_trait;

use crate::domain::{Trip, TripId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trip repository adapters.
    pub enum TripRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trip repository query failed: {message}",
    }
}

/// Port for reading and writing trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert or replace a trip.
    async fn save(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// Fetch a trip by id.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError>;

    /// The user's trip with tracking switched on, if any.
    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Trip>, TripRepositoryError>;

    /// All trips owned by `user_id`.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Trip>, TripRepositoryError>;

    /// Remove a trip. Returns `false` when no such trip existed.
    async fn delete(&self, id: &TripId) -> Result<bool, TripRepositoryError>;

    /// Remove every trip owned by `user_id`, returning how many went.
    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, TripRepositoryError>;
}

/// Fixture implementation for tests that never reach trip storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripRepository;

#[async_trait]
impl TripRepository for FixtureTripRepository {
    async fn save(&self, _trip: &Trip) -> Result<(), TripRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(None)
    }

    async fn find_active_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Trip>, TripRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &TripId) -> Result<bool, TripRepositoryError> {
        Ok(false)
    }

    async fn delete_for_user(&self, _user_id: &UserId) -> Result<usize, TripRepositoryError> {
        Ok(0)
    }
}
