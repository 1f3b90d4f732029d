//! Port for emergency contact persistence.

use async_trait::async_trait;

use crate::domain::{Contact, ContactId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "contact repository query failed: {message}",
    }
}

/// Port for reading and writing a user's emergency contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert or replace a contact.
    async fn save(&self, contact: &Contact) -> Result<(), ContactRepositoryError>;

    /// Fetch a contact by id.
    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, ContactRepositoryError>;

    /// All contacts owned by `user_id`, oldest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Remove a contact. Returns `false` when no such contact existed.
    async fn delete(&self, id: &ContactId) -> Result<bool, ContactRepositoryError>;

    /// Remove every contact owned by `user_id`, returning how many went.
    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, ContactRepositoryError>;
}

/// Fixture implementation for tests that never reach contact storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn save(&self, _contact: &Contact) -> Result<(), ContactRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &ContactId) -> Result<bool, ContactRepositoryError> {
        Ok(false)
    }

    async fn delete_for_user(&self, _user_id: &UserId) -> Result<usize, ContactRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_list_is_empty() {
        let listed = FixtureContactRepository
            .list_for_user(&UserId::random())
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = ContactRepositoryError::query("deadlock");
        assert!(err.to_string().contains("deadlock"));
    }
}
