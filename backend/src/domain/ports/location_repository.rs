//! Port for significant location persistence.

use async_trait::async_trait;

use crate::domain::{LocationId, SignificantLocation, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "location repository query failed: {message}",
    }
}

/// Port for reading and writing a user's significant locations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Insert or replace a location.
    async fn save(&self, location: &SignificantLocation) -> Result<(), LocationRepositoryError>;

    /// Fetch a location by id.
    async fn find_by_id(
        &self,
        id: &LocationId,
    ) -> Result<Option<SignificantLocation>, LocationRepositoryError>;

    /// All locations owned by `user_id`, oldest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SignificantLocation>, LocationRepositoryError>;

    /// Remove a location. Returns `false` when no such location existed.
    async fn delete(&self, id: &LocationId) -> Result<bool, LocationRepositoryError>;

    /// Remove every location owned by `user_id`, returning how many went.
    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, LocationRepositoryError>;
}

/// Fixture implementation for tests that never reach location storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLocationRepository;

#[async_trait]
impl LocationRepository for FixtureLocationRepository {
    async fn save(&self, _location: &SignificantLocation) -> Result<(), LocationRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &LocationId,
    ) -> Result<Option<SignificantLocation>, LocationRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<SignificantLocation>, LocationRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &LocationId) -> Result<bool, LocationRepositoryError> {
        Ok(false)
    }

    async fn delete_for_user(&self, _user_id: &UserId) -> Result<usize, LocationRepositoryError> {
        Ok(0)
    }
}
