//! Domain primitives, ports and services.
//!
//! Purpose: hold the safety engine independent of transport and storage.
//! Entities validate their own invariants; services coordinate them through
//! the ports in [`ports`] and report failures as [`Error`].
//!
//! Public surface:
//! - Entities: `User`, `Contact`, `SignificantLocation`, `Trip`.
//! - Services: `AccountService`, `ContactDirectory`, `LocationRegistry`,
//!   `TripService`, `AlertDispatcher`, `CheckInMonitor`, `CheckInScheduler`.
//! - Shared plumbing: `Error`/`ErrorCode`, `TraceId`, `UserLocks`,
//!   `Repositories`.

pub mod account_service;
pub mod alert_dispatcher;
pub mod alerts;
pub mod check_in_monitor;
pub mod contact;
pub mod contact_directory;
pub mod error;
pub mod ids;
pub mod location;
pub mod location_registry;
pub mod ports;
pub mod repositories;
pub mod trace_id;
pub mod trip;
pub mod trip_service;
pub mod user;
pub mod user_locks;

pub use self::account_service::{AccountService, DeletedAccount, ProfilePatch, Registration};
pub use self::alert_dispatcher::{
    AlertDispatcher, AlertDispatcherConfig, DeliveryFailure, DispatchReport,
};
pub use self::alerts::Alert;
pub use self::check_in_monitor::{
    CheckInMonitor, CheckInScheduler, OVERDUE_WINDOW_HOURS, ScanFailure, ScanReport,
};
pub use self::contact::{Contact, ContactFields, ContactValidationError, PhoneNumber};
pub use self::contact_directory::ContactDirectory;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{ContactId, LocationId, TripId, UserId};
pub use self::location::{
    Axis, Coordinate, GeoPoint, LocationFields, LocationValidationError, SignificantLocation,
};
pub use self::location_registry::LocationRegistry;
#[cfg(test)]
pub(crate) use self::repositories::MockRepositories;
pub use self::repositories::Repositories;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{
    Destination, Trip, TripStatus, TripTransitionError, TripUpdate, UnknownTripStatus,
};
pub use self::trip_service::{TripPlan, TripProgress, TripService};
pub use self::user::{
    CheckInPeriod, EMAIL_MAX, EmailAddress, MIN_CHECK_IN_PERIOD_HOURS, USERNAME_MAX, User,
    UserValidationError, Username,
};
pub use self::user_locks::{UserLockGuard, UserLocks};

