//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`. Every service shares
//! one [`UserLocks`] registry so mutations of the same user serialise no
//! matter which endpoint they arrive on.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    AccountService, AlertDispatcher, ContactDirectory, LocationRegistry, Repositories, TripService,
    UserLocks,
};

/// Service bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub contacts: ContactDirectory,
    pub locations: LocationRegistry,
    pub trips: TripService,
    pub alerts: AlertDispatcher,
}

impl HttpState {
    /// Build every service over `repos`.
    ///
    /// The dispatcher is passed in rather than built here so the check-in
    /// monitor can share its send limit.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use buddy_backend::domain::ports::FixtureNotificationChannel;
    /// use buddy_backend::domain::{AlertDispatcher, AlertDispatcherConfig, Repositories};
    /// use buddy_backend::inbound::http::state::HttpState;
    /// use buddy_backend::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
    /// let alerts = AlertDispatcher::new(
    ///     repos.clone(),
    ///     Arc::new(FixtureNotificationChannel),
    ///     AlertDispatcherConfig::default(),
    /// );
    /// let state = HttpState::new(repos, alerts, Arc::new(DefaultClock));
    /// let _trips = state.trips.clone();
    /// ```
    pub fn new(repos: Repositories, alerts: AlertDispatcher, clock: Arc<dyn Clock>) -> Self {
        let locks = UserLocks::new();
        Self {
            accounts: AccountService::new(repos.clone(), locks.clone(), Arc::clone(&clock)),
            contacts: ContactDirectory::new(repos.clone(), locks.clone()),
            locations: LocationRegistry::new(repos.clone(), locks.clone()),
            trips: TripService::new(repos, locks, clock),
            alerts,
        }
    }
}
