//! Port for user persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port for reading and writing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or replace a user.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user holding `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user holding `email`.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Users in check-in mode whose last check-in is strictly before
    /// `threshold`. Users who never checked in are excluded.
    async fn find_overdue_check_ins(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<User>, UserRepositoryError>;

    /// Remove a user. Returns `false` when no such user existed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}

/// Fixture implementation for tests that never reach user storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn save(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_overdue_check_ins(
        &self,
        _threshold: DateTime<Utc>,
    ) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }
}
