//! Contact Directory: each user's emergency contacts.

use serde_json::json;
use tracing::info;

use super::account_service::user_not_found;
use super::{
    Contact, ContactFields, ContactId, ContactValidationError, Error, Repositories, UserId,
    UserLocks,
};

/// Emergency contact CRUD.
#[derive(Clone)]
pub struct ContactDirectory {
    repos: Repositories,
    locks: UserLocks,
}

impl ContactDirectory {
    pub fn new(repos: Repositories, locks: UserLocks) -> Self {
        Self { repos, locks }
    }

    /// Contacts owned by `user_id`; empty when there are none.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Contact>, Error> {
        self.ensure_user(user_id).await?;
        Ok(self.repos.contacts.list_for_user(&user_id).await?)
    }

    /// Fetch one contact.
    pub async fn get(&self, contact_id: ContactId) -> Result<Contact, Error> {
        self.repos
            .contacts
            .find_by_id(&contact_id)
            .await?
            .ok_or_else(|| contact_not_found(contact_id))
    }

    /// Add a contact; name, phone and email are all required.
    pub async fn create(&self, user_id: UserId, fields: ContactFields) -> Result<Contact, Error> {
        let contact = Contact::create(ContactId::random(), user_id, fields).map_err(invalid)?;

        let _guard = self.locks.lock(user_id).await;
        self.ensure_user(user_id).await?;
        self.repos.contacts.save(&contact).await?;
        info!(user_id = %user_id, contact_id = %contact.id(), "added emergency contact");
        Ok(contact)
    }

    /// Edit the supplied fields of a contact.
    pub async fn update(&self, contact_id: ContactId, fields: ContactFields) -> Result<Contact, Error> {
        let owner = self.get(contact_id).await?.user_id();
        let _guard = self.locks.lock(owner).await;
        let mut contact = self.get(contact_id).await?;
        contact.apply(fields).map_err(invalid)?;
        self.repos.contacts.save(&contact).await?;
        Ok(contact)
    }

    /// Remove a contact, returning what was removed.
    pub async fn delete(&self, contact_id: ContactId) -> Result<Contact, Error> {
        let owner = self.get(contact_id).await?.user_id();
        let _guard = self.locks.lock(owner).await;
        let contact = self.get(contact_id).await?;
        if !self.repos.contacts.delete(&contact_id).await? {
            return Err(contact_not_found(contact_id));
        }
        info!(user_id = %owner, contact_id = %contact_id, "removed emergency contact");
        Ok(contact)
    }

    async fn ensure_user(&self, user_id: UserId) -> Result<(), Error> {
        match self.repos.users.find_by_id(&user_id).await? {
            Some(_) => Ok(()),
            None => Err(user_not_found(user_id)),
        }
    }
}

fn invalid(err: ContactValidationError) -> Error {
    let error = Error::invalid_request(err.to_string());
    match err {
        ContactValidationError::MissingFields { fields } => {
            error.with_details(json!({ "missing": fields }))
        }
        _ => error,
    }
}

fn contact_not_found(contact_id: ContactId) -> Error {
    Error::not_found(format!("contact {contact_id} not found"))
}
