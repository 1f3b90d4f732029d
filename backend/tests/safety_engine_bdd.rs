//! Behaviour tests for the safety engine.
//!
//! Scenarios drive the domain services directly over the in-memory store, a
//! recording notification channel and a clock the steps can move.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use buddy_backend::domain::{
    AlertDispatcher, AlertDispatcherConfig, CheckInMonitor, ContactFields, ContactId,
    DispatchReport, Error, ErrorCode, LocationFields, ProfilePatch, Registration, Repositories,
    ScanReport, Trip, TripPlan, TripProgress, User, UserId,
};
use buddy_backend::inbound::http::state::HttpState;
use buddy_backend::outbound::memory::InMemoryStore;
use buddy_backend::test_support::{MutableClock, RecordingNotificationChannel};
use chrono::{TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};
use zeroize::Zeroizing;

struct SafetyWorld {
    runtime: Runtime,
    repos: Repositories,
    state: HttpState,
    monitor: CheckInMonitor,
    channel: Arc<RecordingNotificationChannel>,
    clock: Arc<MutableClock>,
    users: RefCell<HashMap<String, UserId>>,
    contacts: RefCell<HashMap<String, ContactId>>,
    saved_locations: Cell<u32>,
    trip: RefCell<Option<Trip>>,
    toggle: RefCell<Option<Result<User, Error>>>,
    trip_start: RefCell<Option<Result<Trip, Error>>>,
    trip_update: RefCell<Option<Result<Trip, Error>>>,
    dispatch: RefCell<Option<DispatchReport>>,
    scan: RefCell<Option<ScanReport>>,
}

impl SafetyWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
        let channel = Arc::new(RecordingNotificationChannel::new());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0)
                .single()
                .expect("valid time"),
        ));
        let alerts = AlertDispatcher::new(
            repos.clone(),
            channel.clone(),
            AlertDispatcherConfig {
                from_number: "+12065550199".to_owned(),
                ..AlertDispatcherConfig::default()
            },
        );
        let monitor = CheckInMonitor::new(repos.clone(), alerts.clone(), clock.clone());
        let state = HttpState::new(repos.clone(), alerts, clock.clone());
        Self {
            runtime,
            repos,
            state,
            monitor,
            channel,
            clock,
            users: RefCell::new(HashMap::new()),
            contacts: RefCell::new(HashMap::new()),
            saved_locations: Cell::new(0),
            trip: RefCell::new(None),
            toggle: RefCell::new(None),
            trip_start: RefCell::new(None),
            trip_update: RefCell::new(None),
            dispatch: RefCell::new(None),
            scan: RefCell::new(None),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn user_id(&self, username: &str) -> UserId {
        *self
            .users
            .borrow()
            .get(username)
            .unwrap_or_else(|| panic!("user {username} was not registered"))
    }

    fn contact_id(&self, name: &str) -> ContactId {
        *self
            .contacts
            .borrow()
            .get(name)
            .unwrap_or_else(|| panic!("contact {name} was not created"))
    }

    fn current_trip(&self) -> Trip {
        self.trip.borrow().clone().expect("a trip is underway")
    }

    fn start_trip(&self, username: &str, destination: &str) -> Result<Trip, Error> {
        let plan = TripPlan {
            destination_name: Some(destination.to_owned()),
            destination_address: Some(format!("{destination} address")),
            destination_latitude: Some("47.6062".to_owned()),
            destination_longitude: Some("-122.3321".to_owned()),
            current_latitude: Some("47.6205".to_owned()),
            current_longitude: Some("-122.3493".to_owned()),
        };
        let result = self.block_on(self.state.trips.create(self.user_id(username), plan));
        if let Ok(trip) = &result {
            *self.trip.borrow_mut() = Some(trip.clone());
        }
        result
    }

    fn toggle_check_in(&self, username: &str) -> Result<User, Error> {
        self.block_on(self.state.accounts.toggle_check_in(self.user_id(username)))
    }
}

fn assert_error(result: Option<&Result<impl std::fmt::Debug, Error>>, code: ErrorCode) {
    match result.expect("operation was attempted") {
        Ok(value) => panic!("expected {code:?}, got {value:?}"),
        Err(err) => assert_eq!(err.code(), code, "unexpected error: {err}"),
    }
}

#[fixture]
fn world() -> SafetyWorld {
    SafetyWorld::new()
}

#[given("a registered user named {username}")]
fn a_registered_user_named(world: &SafetyWorld, username: String) {
    let user = world
        .block_on(world.state.accounts.register(Registration {
            username: Some(username.clone()),
            email: Some(format!("{username}@example.com")),
            password: Some(Zeroizing::new("p".to_owned())),
        }))
        .expect("registration succeeds");
    world.users.borrow_mut().insert(username, user.id());
}

#[given("user {username} has a contact {name} with phone {phone}")]
fn user_has_a_contact(world: &SafetyWorld, username: String, name: String, phone: String) {
    let contact = world
        .block_on(world.state.contacts.create(
            world.user_id(&username),
            ContactFields {
                name: Some(name.clone()),
                phone: Some(phone),
                email: Some(format!("{}@example.com", name.to_lowercase())),
            },
        ))
        .expect("contact saved");
    world.contacts.borrow_mut().insert(name, contact.id());
}

#[given("user {username} has a saved location at {address}")]
fn user_has_a_saved_location(world: &SafetyWorld, username: String, address: String) {
    let index = world.saved_locations.get() + 1;
    world.saved_locations.set(index);
    world
        .block_on(world.state.locations.create(
            world.user_id(&username),
            LocationFields {
                address: Some(address),
                latitude: Some(format!("47.{index:04}")),
                longitude: Some(format!("-122.{index:04}")),
            },
        ))
        .expect("location saved");
}

#[given("user {username} has check-in mode enabled")]
fn user_has_check_in_mode_enabled(world: &SafetyWorld, username: String) {
    let user = world
        .toggle_check_in(&username)
        .expect("check-in mode enabled");
    assert!(user.check_in_mode());
}

#[given("user {username} last checked in {hours} hours ago")]
fn user_last_checked_in(world: &SafetyWorld, username: String, hours: i64) {
    let at = world.clock.utc() - TimeDelta::hours(hours);
    world
        .block_on(world.state.accounts.update_profile(
            world.user_id(&username),
            ProfilePatch {
                last_check_in: Some(at),
                ..ProfilePatch::default()
            },
        ))
        .expect("profile updated");
}

#[given("user {username} is on a trip to {destination}")]
fn user_is_on_a_trip(world: &SafetyWorld, username: String, destination: String) {
    world
        .start_trip(&username, &destination)
        .expect("trip started");
}

#[given("SMS delivery to {phone} fails")]
fn sms_delivery_fails(world: &SafetyWorld, phone: String) {
    world.channel.fail_for(phone);
}

#[when("user {username} toggles check-in mode")]
fn user_toggles_check_in_mode(world: &SafetyWorld, username: String) {
    let result = world.toggle_check_in(&username);
    *world.toggle.borrow_mut() = Some(result);
}

#[when("user {username} deletes contact {name}")]
fn user_deletes_contact(world: &SafetyWorld, username: String, name: String) {
    let contact = world
        .block_on(world.state.contacts.delete(world.contact_id(&name)))
        .expect("contact deleted");
    assert_eq!(contact.user_id(), world.user_id(&username));
}

#[when("user {username} starts a trip to {destination}")]
fn user_starts_a_trip(world: &SafetyWorld, username: String, destination: String) {
    let result = world.start_trip(&username, &destination);
    *world.trip_start.borrow_mut() = Some(result);
}

#[when("user {username} marks the trip {status}")]
fn user_marks_the_trip(world: &SafetyWorld, username: String, status: String) {
    let trip = world.current_trip();
    assert_eq!(trip.user_id(), world.user_id(&username));
    let updated = world
        .block_on(world.state.trips.update(
            trip.id(),
            TripProgress {
                status: Some(status),
                ..TripProgress::default()
            },
        ))
        .expect("status updated");
    *world.trip.borrow_mut() = Some(updated);
}

#[when("user {username} reports a new position on the trip")]
fn user_reports_a_new_position(world: &SafetyWorld, username: String) {
    let trip = world.current_trip();
    assert_eq!(trip.user_id(), world.user_id(&username));
    let result = world.block_on(world.state.trips.update(
        trip.id(),
        TripProgress {
            current_latitude: Some("47.7".to_owned()),
            current_longitude: Some("-122.4".to_owned()),
            status: None,
        },
    ));
    *world.trip_update.borrow_mut() = Some(result);
}

#[when("user {username} presses the panic button")]
fn user_presses_the_panic_button(world: &SafetyWorld, username: String) {
    let trip = world.current_trip();
    let report = world
        .block_on(world.state.alerts.panic(world.user_id(&username), trip.id()))
        .expect("panic dispatched");
    *world.dispatch.borrow_mut() = Some(report);
}

#[when("the check-in monitor scans")]
fn the_check_in_monitor_scans(world: &SafetyWorld) {
    let report = world
        .block_on(world.monitor.scan())
        .expect("scan succeeds");
    *world.scan.borrow_mut() = Some(report);
}

#[then("the toggle succeeds")]
fn the_toggle_succeeds(world: &SafetyWorld) {
    let toggle = world.toggle.borrow();
    match toggle.as_ref().expect("toggle was attempted") {
        Ok(_) => {}
        Err(err) => panic!("toggle failed: {err}"),
    }
}

#[then("the toggle is rejected as invalid")]
fn the_toggle_is_rejected(world: &SafetyWorld) {
    assert_error(world.toggle.borrow().as_ref(), ErrorCode::InvalidRequest);
}

#[then("check-in mode is {state} for user {username}")]
fn check_in_mode_is(world: &SafetyWorld, state: String, username: String) {
    let user = world
        .block_on(world.state.accounts.get(world.user_id(&username)))
        .expect("user exists");
    assert_eq!(user.check_in_mode(), state == "on");
}

#[then("the trip is tracking")]
fn the_trip_is_tracking(world: &SafetyWorld) {
    assert!(world.current_trip().is_tracking());
}

#[then("the trip is not tracking")]
fn the_trip_is_not_tracking(world: &SafetyWorld) {
    assert!(!world.current_trip().is_tracking());
}

#[then("the trip start is rejected as a conflict")]
fn the_trip_start_is_rejected(world: &SafetyWorld) {
    assert_error(world.trip_start.borrow().as_ref(), ErrorCode::Conflict);
}

#[then("user {username} has {count} trip on record")]
fn user_has_trips_on_record(world: &SafetyWorld, username: String, count: usize) {
    let trips = world
        .block_on(world.repos.trips.list_for_user(&world.user_id(&username)))
        .expect("trips listed");
    assert_eq!(trips.len(), count);
}

#[then("the update is rejected as an invalid state")]
fn the_update_is_rejected(world: &SafetyWorld) {
    assert_error(world.trip_update.borrow().as_ref(), ErrorCode::InvalidState);
}

#[then("the stored trip is still {status}")]
fn the_stored_trip_is_still(world: &SafetyWorld, status: String) {
    let before = world.current_trip();
    let stored = world
        .block_on(world.state.trips.get(before.id()))
        .expect("trip exists");
    assert_eq!(stored.status().as_str(), status);
    assert_eq!(stored, before, "terminal trip must not change");
}

#[then("the alert was sent to {count} contacts")]
fn the_alert_was_sent_to(world: &SafetyWorld, count: usize) {
    let dispatch = world.dispatch.borrow();
    assert_eq!(dispatch.as_ref().expect("dispatch ran").sent.len(), count);
}

#[then("the alert failed for contact {name}")]
fn the_alert_failed_for(world: &SafetyWorld, name: String) {
    let contact_id = world.contact_id(&name);
    let dispatch = world.dispatch.borrow();
    let failed = &dispatch.as_ref().expect("dispatch ran").failed;
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].contact_id, contact_id);
    assert!(!failed[0].reason.is_empty());
}

#[then("every contact was messaged")]
fn every_contact_was_messaged(world: &SafetyWorld) {
    let dispatch = world.dispatch.borrow();
    let report = dispatch.as_ref().expect("dispatch ran");
    let contacts = world.contacts.borrow();
    assert_eq!(report.sent.len() + report.failed.len(), contacts.len());
    for id in &report.sent {
        assert!(contacts.values().any(|contact| contact == id));
    }
}

#[then("user {username} is alerted as overdue")]
fn user_is_alerted_as_overdue(world: &SafetyWorld, username: String) {
    let scan = world.scan.borrow();
    let report = scan.as_ref().expect("scan ran");
    assert!(report.alerted.contains(&world.user_id(&username)));
}

#[then("user {username} is not alerted as overdue")]
fn user_is_not_alerted_as_overdue(world: &SafetyWorld, username: String) {
    let scan = world.scan.borrow();
    let report = scan.as_ref().expect("scan ran");
    assert!(!report.alerted.contains(&world.user_id(&username)));
    assert_eq!(report.overdue(), 1);
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Check-in mode needs a contact and a location"
)]
fn check_in_mode_needs_a_contact_and_a_location(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Check-in mode cannot be enabled without a saved location"
)]
fn check_in_mode_cannot_be_enabled_without_a_saved_location(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "A second trip is rejected while one is tracking"
)]
fn a_second_trip_is_rejected_while_one_is_tracking(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Terminal trips accept no further updates"
)]
fn terminal_trips_accept_no_further_updates(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Panic status keeps the trip tracking"
)]
fn panic_status_keeps_the_trip_tracking(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Panic alerts report partial delivery"
)]
fn panic_alerts_report_partial_delivery(world: SafetyWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/safety_engine.feature",
    name = "Overdue users are found by the check-in scan"
)]
fn overdue_users_are_found_by_the_check_in_scan(world: SafetyWorld) {
    let _ = world;
}
