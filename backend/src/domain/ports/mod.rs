//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod contact_repository;
mod location_repository;
mod notification_channel;
mod trip_repository;
mod user_repository;

#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{
    ContactRepository, ContactRepositoryError, FixtureContactRepository,
};
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{
    FixtureLocationRepository, LocationRepository, LocationRepositoryError,
};
#[cfg(test)]
pub use notification_channel::MockNotificationChannel;
pub use notification_channel::{
    FixtureNotificationChannel, NotificationChannel, NotificationError,
};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{FixtureTripRepository, TripRepository, TripRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
