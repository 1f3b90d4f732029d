//! Location Registry: each user's significant locations.

use serde_json::json;
use tracing::info;

use super::account_service::user_not_found;
use super::{
    Error, LocationFields, LocationId, LocationValidationError, Repositories,
    SignificantLocation, UserId, UserLocks,
};

/// Significant location CRUD with per-user duplicate rejection.
#[derive(Clone)]
pub struct LocationRegistry {
    repos: Repositories,
    locks: UserLocks,
}

impl LocationRegistry {
    pub fn new(repos: Repositories, locks: UserLocks) -> Self {
        Self { repos, locks }
    }

    /// Locations owned by `user_id`; empty when there are none.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<SignificantLocation>, Error> {
        self.ensure_user(user_id).await?;
        Ok(self.repos.locations.list_for_user(&user_id).await?)
    }

    /// Fetch one location.
    pub async fn get(&self, location_id: LocationId) -> Result<SignificantLocation, Error> {
        self.repos
            .locations
            .find_by_id(&location_id)
            .await?
            .ok_or_else(|| location_not_found(location_id))
    }

    /// Save a location unless the user already has one at the same address
    /// or with the same coordinate text.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: LocationFields,
    ) -> Result<SignificantLocation, Error> {
        let location =
            SignificantLocation::create(LocationId::random(), user_id, fields).map_err(invalid)?;

        let _guard = self.locks.lock(user_id).await;
        self.ensure_user(user_id).await?;
        let existing = self.repos.locations.list_for_user(&user_id).await?;
        if let Some(duplicate) = existing.iter().find(|saved| saved.duplicates(&location)) {
            return Err(Error::conflict(
                "check-in location has already been saved to this account",
            )
            .with_details(json!({ "existingLocationId": duplicate.id() })));
        }

        self.repos.locations.save(&location).await?;
        info!(user_id = %user_id, location_id = %location.id(), "saved significant location");
        Ok(location)
    }

    /// Edit the supplied fields. The edited location must not duplicate any
    /// of the owner's other locations.
    pub async fn update(
        &self,
        location_id: LocationId,
        fields: LocationFields,
    ) -> Result<SignificantLocation, Error> {
        let owner = self.get(location_id).await?.user_id();
        let _guard = self.locks.lock(owner).await;
        let mut location = self.get(location_id).await?;
        location.apply(fields).map_err(invalid)?;

        let existing = self.repos.locations.list_for_user(&owner).await?;
        if let Some(duplicate) = existing
            .iter()
            .filter(|saved| saved.id() != location_id)
            .find(|saved| saved.duplicates(&location))
        {
            return Err(Error::conflict(
                "check-in location has already been saved to this account",
            )
            .with_details(json!({ "existingLocationId": duplicate.id() })));
        }

        self.repos.locations.save(&location).await?;
        info!(user_id = %owner, location_id = %location_id, "updated significant location");
        Ok(location)
    }

    /// Remove a location, returning what was removed.
    pub async fn delete(&self, location_id: LocationId) -> Result<SignificantLocation, Error> {
        let owner = self.get(location_id).await?.user_id();
        let _guard = self.locks.lock(owner).await;
        let location = self.get(location_id).await?;
        if !self.repos.locations.delete(&location_id).await? {
            return Err(location_not_found(location_id));
        }
        info!(user_id = %owner, location_id = %location_id, "removed significant location");
        Ok(location)
    }

    async fn ensure_user(&self, user_id: UserId) -> Result<(), Error> {
        match self.repos.users.find_by_id(&user_id).await? {
            Some(_) => Ok(()),
            None => Err(user_not_found(user_id)),
        }
    }
}

fn invalid(err: LocationValidationError) -> Error {
    let error = Error::invalid_request(err.to_string());
    match err {
        LocationValidationError::MissingFields { fields } => {
            error.with_details(json!({ "missing": fields }))
        }
        _ => error,
    }
}

fn location_not_found(location_id: LocationId) -> Error {
    Error::not_found(format!("significant location {location_id} not found"))
}
