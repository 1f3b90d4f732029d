//! In-process store implementing every persistence port.
//!
//! Records live in insertion-ordered tables behind one mutex, so each port
//! call observes a consistent snapshot. Listing returns records oldest
//! first.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, LocationRepository, LocationRepositoryError,
    TripRepository, TripRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Contact, ContactId, EmailAddress, LocationId, SignificantLocation, Trip, TripId, User,
    UserId, Username,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    contacts: Vec<Contact>,
    locations: Vec<SignificantLocation>,
    trips: Vec<Trip>,
}

/// Replace the record with the same key, or append a new one.
fn upsert<T: Clone, K: PartialEq>(table: &mut Vec<T>, record: &T, key: impl Fn(&T) -> K) {
    let id = key(record);
    match table.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = record.clone(),
        None => table.push(record.clone()),
    }
}

fn remove_where<T>(table: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> usize {
    let before = table.len();
    table.retain(|record| !predicate(record));
    before - table.len()
}

/// Shared in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables(UserRepositoryError::query)?;
        upsert(&mut tables.users, user, User::id);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables(UserRepositoryError::query)?;
        Ok(tables.users.iter().find(|user| user.id() == *id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables(UserRepositoryError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables(UserRepositoryError::query)?;
        Ok(tables.users.iter().find(|user| user.email() == email).cloned())
    }

    async fn find_overdue_check_ins(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.tables(UserRepositoryError::query)?;
        Ok(tables
            .users
            .iter()
            .filter(|user| user.is_overdue(threshold))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables(UserRepositoryError::query)?;
        Ok(remove_where(&mut tables.users, |user| user.id() == *id) > 0)
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn save(&self, contact: &Contact) -> Result<(), ContactRepositoryError> {
        let mut tables = self.tables(ContactRepositoryError::query)?;
        upsert(&mut tables.contacts, contact, Contact::id);
        Ok(())
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        let tables = self.tables(ContactRepositoryError::query)?;
        Ok(tables.contacts.iter().find(|c| c.id() == *id).cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        let tables = self.tables(ContactRepositoryError::query)?;
        Ok(tables
            .contacts
            .iter()
            .filter(|c| c.user_id() == *user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &ContactId) -> Result<bool, ContactRepositoryError> {
        let mut tables = self.tables(ContactRepositoryError::query)?;
        Ok(remove_where(&mut tables.contacts, |c| c.id() == *id) > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, ContactRepositoryError> {
        let mut tables = self.tables(ContactRepositoryError::query)?;
        Ok(remove_where(&mut tables.contacts, |c| c.user_id() == *user_id))
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn save(&self, location: &SignificantLocation) -> Result<(), LocationRepositoryError> {
        let mut tables = self.tables(LocationRepositoryError::query)?;
        upsert(&mut tables.locations, location, SignificantLocation::id);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &LocationId,
    ) -> Result<Option<SignificantLocation>, LocationRepositoryError> {
        let tables = self.tables(LocationRepositoryError::query)?;
        Ok(tables.locations.iter().find(|l| l.id() == *id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SignificantLocation>, LocationRepositoryError> {
        let tables = self.tables(LocationRepositoryError::query)?;
        Ok(tables
            .locations
            .iter()
            .filter(|l| l.user_id() == *user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &LocationId) -> Result<bool, LocationRepositoryError> {
        let mut tables = self.tables(LocationRepositoryError::query)?;
        Ok(remove_where(&mut tables.locations, |l| l.id() == *id) > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, LocationRepositoryError> {
        let mut tables = self.tables(LocationRepositoryError::query)?;
        Ok(remove_where(&mut tables.locations, |l| l.user_id() == *user_id))
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn save(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut tables = self.tables(TripRepositoryError::query)?;
        upsert(&mut tables.trips, trip, Trip::id);
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        let tables = self.tables(TripRepositoryError::query)?;
        Ok(tables.trips.iter().find(|t| t.id() == *id).cloned())
    }

    async fn find_active_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let tables = self.tables(TripRepositoryError::query)?;
        Ok(tables
            .trips
            .iter()
            .find(|t| t.user_id() == *user_id && t.is_tracking())
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Trip>, TripRepositoryError> {
        let tables = self.tables(TripRepositoryError::query)?;
        Ok(tables
            .trips
            .iter()
            .filter(|t| t.user_id() == *user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripRepositoryError> {
        let mut tables = self.tables(TripRepositoryError::query)?;
        Ok(remove_where(&mut tables.trips, |t| t.id() == *id) > 0)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<usize, TripRepositoryError> {
        let mut tables = self.tables(TripRepositoryError::query)?;
        Ok(remove_where(&mut tables.trips, |t| t.user_id() == *user_id))
    }
}

#[cfg(test)]
mod tests;
