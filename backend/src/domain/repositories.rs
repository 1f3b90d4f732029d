//! Bundle of the persistence ports shared by the domain services, plus the
//! mapping from adapter failures onto domain errors.

use std::sync::Arc;

use super::Error;
use super::ports::{
    ContactRepository, ContactRepositoryError, LocationRepository, LocationRepositoryError,
    TripRepository, TripRepositoryError, UserRepository, UserRepositoryError,
};

/// Persistence ports injected into every domain service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub trips: Arc<dyn TripRepository>,
}

impl Repositories {
    /// Use a single adapter for every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + ContactRepository + LocationRepository + TripRepository + 'static,
    {
        Self {
            users: store.clone(),
            contacts: store.clone(),
            locations: store.clone(),
            trips: store,
        }
    }
}

macro_rules! map_repository_errors {
    ($($error:ident => $label:literal),* $(,)?) => {
        $(
            impl From<$error> for Error {
                fn from(error: $error) -> Self {
                    match error {
                        $error::Connection { message } => Error::service_unavailable(
                            format!(concat!($label, " repository unavailable: {}"), message),
                        ),
                        $error::Query { message } => Error::internal(
                            format!(concat!($label, " repository error: {}"), message),
                        ),
                    }
                }
            }
        )*
    };
}

map_repository_errors! {
    UserRepositoryError => "user",
    ContactRepositoryError => "contact",
    LocationRepositoryError => "location",
    TripRepositoryError => "trip",
}

/// Mocked ports, one per repository, for service unit tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MockRepositories {
    pub users: super::ports::MockUserRepository,
    pub contacts: super::ports::MockContactRepository,
    pub locations: super::ports::MockLocationRepository,
    pub trips: super::ports::MockTripRepository,
}

#[cfg(test)]
impl MockRepositories {
    pub(crate) fn build(self) -> Repositories {
        Repositories {
            users: Arc::new(self.users),
            contacts: Arc::new(self.contacts),
            locations: Arc::new(self.locations),
            trips: Arc::new(self.trips),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(UserRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(ContactRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    #[case(LocationRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(TripRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
    fn repository_failures_map_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn mapped_message_names_the_repository() {
        let error: Error = TripRepositoryError::query("lock timeout").into();
        assert_eq!(error.message(), "trip repository error: lock timeout");
    }
}
