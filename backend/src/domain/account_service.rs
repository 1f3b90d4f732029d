//! Account lifecycle: registration, profile edits, check-in mode and
//! cascading deletion.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;
use zeroize::Zeroizing;

use super::{
    CheckInPeriod, EmailAddress, Error, Repositories, User, UserId, UserLocks, Username,
};

/// Registration input. Every field is required.
#[derive(Debug, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
}

/// Partial profile edit; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub check_in_period_hours: Option<u32>,
    pub last_check_in: Option<DateTime<Utc>>,
}

/// What a cascading delete removed alongside the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedAccount {
    pub trips: usize,
    pub contacts: usize,
    pub locations: usize,
}

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    repos: Repositories,
    locks: UserLocks,
    clock: Arc<dyn Clock>,
    // Serialises uniqueness checks on username and email.
    identity: Arc<Mutex<()>>,
}

impl AccountService {
    pub fn new(repos: Repositories, locks: UserLocks, clock: Arc<dyn Clock>) -> Self {
        Self {
            repos,
            locks,
            clock,
            identity: Arc::new(Mutex::new(())),
        }
    }

    /// Create a new user with check-in mode off.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            username,
            email,
            password,
        } = registration;
        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(Error::invalid_request(
                "please fill out the username, email and password fields",
            ));
        };
        if password.trim().is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        drop(password);

        let username = Username::new(username).map_err(invalid)?;
        let email = EmailAddress::new(email).map_err(invalid)?;

        let _identity = self.identity.lock().await;
        if self.repos.users.find_by_username(&username).await?.is_some() {
            return Err(Error::conflict("please use a different username")
                .with_details(json!({ "field": "username" })));
        }
        if self.repos.users.find_by_email(&email).await?.is_some() {
            return Err(Error::conflict("please use a different email address")
                .with_details(json!({ "field": "email" })));
        }

        let user = User::register(UserId::random(), username, email);
        self.repos.users.save(&user).await?;
        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }

    /// Fetch a user.
    pub async fn get(&self, user_id: UserId) -> Result<User, Error> {
        self.repos
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }

    /// Apply a profile edit. Either every field applies or none does.
    pub async fn update_profile(&self, user_id: UserId, patch: ProfilePatch) -> Result<User, Error> {
        let username = patch.username.map(Username::new).transpose().map_err(invalid)?;
        let email = patch.email.map(EmailAddress::new).transpose().map_err(invalid)?;
        let period = patch
            .check_in_period_hours
            .map(CheckInPeriod::from_hours)
            .transpose()
            .map_err(invalid)?;

        let _identity = self.identity.lock().await;
        let _guard = self.locks.lock(user_id).await;
        let mut user = self.get(user_id).await?;

        if let Some(username) = &username {
            if username != user.username()
                && self.repos.users.find_by_username(username).await?.is_some()
            {
                return Err(Error::conflict(
                    "username already in use; please select a different username",
                )
                .with_details(json!({ "field": "username" })));
            }
        }
        if let Some(email) = &email {
            if email != user.email() && self.repos.users.find_by_email(email).await?.is_some() {
                return Err(Error::conflict(
                    "email address already in use; please use a different email address",
                )
                .with_details(json!({ "field": "email" })));
            }
        }

        if let Some(username) = username {
            user.set_username(username);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(period) = period {
            user.set_check_in_period(period);
        }
        if let Some(at) = patch.last_check_in {
            user.record_check_in(at);
        }
        self.repos.users.save(&user).await?;
        Ok(user)
    }

    /// Flip check-in mode.
    ///
    /// Enabling requires at least one contact and one significant location;
    /// disabling always succeeds.
    pub async fn toggle_check_in(&self, user_id: UserId) -> Result<User, Error> {
        let _guard = self.locks.lock(user_id).await;
        let mut user = self.get(user_id).await?;

        if !user.check_in_mode() {
            let contacts = self.repos.contacts.list_for_user(&user_id).await?;
            let locations = self.repos.locations.list_for_user(&user_id).await?;
            if contacts.is_empty() || locations.is_empty() {
                return Err(Error::invalid_request(
                    "cannot turn on check-in mode without saved contacts and check-in locations",
                )
                .with_details(json!({
                    "contacts": contacts.len(),
                    "locations": locations.len(),
                })));
            }
        }

        user.set_check_in_mode(!user.check_in_mode());
        self.repos.users.save(&user).await?;
        info!(user_id = %user_id, enabled = user.check_in_mode(), "toggled check-in mode");
        Ok(user)
    }

    /// Stamp a check-in at the current time.
    pub async fn record_check_in(&self, user_id: UserId) -> Result<User, Error> {
        let _guard = self.locks.lock(user_id).await;
        let mut user = self.get(user_id).await?;
        user.record_check_in(self.clock.utc());
        self.repos.users.save(&user).await?;
        Ok(user)
    }

    /// Delete a user together with their trips, contacts and locations.
    pub async fn delete(&self, user_id: UserId) -> Result<DeletedAccount, Error> {
        let _guard = self.locks.lock(user_id).await;
        let user = self.get(user_id).await?;

        let removed = DeletedAccount {
            trips: self.repos.trips.delete_for_user(&user_id).await?,
            contacts: self.repos.contacts.delete_for_user(&user_id).await?,
            locations: self.repos.locations.delete_for_user(&user_id).await?,
        };
        self.repos.users.delete(&user_id).await?;

        info!(
            user_id = %user_id,
            username = %user.username(),
            trips = removed.trips,
            contacts = removed.contacts,
            locations = removed.locations,
            "deleted account"
        );
        Ok(removed)
    }
}

fn invalid(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string())
}

pub(crate) fn user_not_found(user_id: UserId) -> Error {
    Error::not_found(format!("user {user_id} not found"))
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
