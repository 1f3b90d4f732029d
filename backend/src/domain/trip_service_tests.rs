//! Tests for the trip service.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{TripRepository, UserRepository};
use crate::domain::{
    ContactDirectory, ContactFields, EmailAddress, ErrorCode, MockRepositories, User, Username,
};
use crate::outbound::memory::InMemoryStore;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 14, 20, 0, 0)
        .single()
        .expect("valid time")
}

fn clock_at(at: DateTime<Utc>) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(at);
    Arc::new(clock)
}

#[fixture]
fn owner() -> User {
    User::register(
        UserId::random(),
        Username::new("ada").expect("valid username"),
        EmailAddress::new("ada@example.com").expect("valid email"),
    )
}

fn plan() -> TripPlan {
    TripPlan {
        destination_name: Some("Home".to_owned()),
        destination_address: Some("1 Main St".to_owned()),
        destination_latitude: Some("47.6".to_owned()),
        destination_longitude: Some("-122.3".to_owned()),
        current_latitude: Some("47.5".to_owned()),
        current_longitude: Some("-122.2".to_owned()),
    }
}

fn started_trip(user_id: UserId) -> Trip {
    let (destination, current) = parse_plan(plan()).expect("valid plan");
    Trip::start(TripId::random(), user_id, destination, current, now())
}

fn service(mocks: MockRepositories) -> TripService {
    TripService::new(mocks.build(), UserLocks::new(), clock_at(now()))
}

#[rstest]
#[tokio::test]
async fn create_starts_ongoing_tracking_trip(owner: User) {
    let user_id = owner.id();
    let mut mocks = MockRepositories::default();
    mocks.users.expect_find_by_id().return_once(move |_| Ok(Some(owner)));
    mocks.trips.expect_find_active_for_user().return_once(|_| Ok(None));
    mocks
        .trips
        .expect_save()
        .withf(|trip| trip.is_tracking() && trip.status() == TripStatus::Ongoing)
        .times(1)
        .return_once(|_| Ok(()));

    let trip = service(mocks)
        .create(user_id, plan())
        .await
        .expect("create succeeds");
    assert_eq!(trip.last_update(), now());
    assert_eq!(trip.destination().name.as_deref(), Some("Home"));
}

#[rstest]
#[tokio::test]
async fn create_rejects_second_active_trip(owner: User) {
    let user_id = owner.id();
    let mut mocks = MockRepositories::default();
    mocks.users.expect_find_by_id().return_once(move |_| Ok(Some(owner)));
    mocks
        .trips
        .expect_find_active_for_user()
        .return_once(move |_| Ok(Some(started_trip(user_id))));
    mocks.trips.expect_save().times(0);

    let error = service(mocks)
        .create(user_id, plan())
        .await
        .expect_err("active trip exists");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(TripPlan { destination_address: None, ..plan() })]
#[case(TripPlan { destination_latitude: Some("north".to_owned()), ..plan() })]
#[case(TripPlan { current_longitude: None, ..plan() })]
#[tokio::test]
async fn create_rejects_invalid_plans(#[case] input: TripPlan) {
    let error = service(MockRepositories::default())
        .create(UserId::random(), input)
        .await
        .expect_err("invalid plan");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case("CANCEL", false)]
#[case("COMPLETE", false)]
#[case("PANIC", true)]
#[tokio::test]
async fn update_applies_status(#[case] status: &str, #[case] tracking: bool) {
    let trip = started_trip(UserId::random());
    let trip_id = trip.id();
    let later = now() + Duration::minutes(10);
    let mut mocks = MockRepositories::default();
    mocks
        .trips
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(trip.clone())));
    mocks.trips.expect_save().times(1).return_once(|_| Ok(()));

    let service = TripService::new(mocks.build(), UserLocks::new(), clock_at(later));
    let updated = service
        .update(
            trip_id,
            TripProgress {
                status: Some(status.to_owned()),
                ..TripProgress::default()
            },
        )
        .await
        .expect("update succeeds");
    assert_eq!(updated.is_tracking(), tracking);
    assert_eq!(updated.last_update(), later);
}

#[rstest]
#[tokio::test]
async fn update_rejects_terminal_trip_without_saving() {
    let mut trip = started_trip(UserId::random());
    trip.apply_update(
        TripUpdate {
            status: Some(TripStatus::Complete),
            ..TripUpdate::default()
        },
        now(),
    )
    .expect("complete trip");
    let trip_id = trip.id();
    let mut mocks = MockRepositories::default();
    mocks
        .trips
        .expect_find_by_id()
        .returning(move |_| Ok(Some(trip.clone())));
    mocks.trips.expect_save().times(0);

    let error = service(mocks)
        .update(
            trip_id,
            TripProgress {
                current_latitude: Some("1".to_owned()),
                current_longitude: Some("1".to_owned()),
                status: None,
            },
        )
        .await
        .expect_err("terminal trip");
    assert_eq!(error.code(), ErrorCode::InvalidState);
    assert_eq!(error.message(), "cannot update COMPLETE trips");
}

#[rstest]
#[tokio::test]
async fn update_rejects_unknown_status() {
    let error = service(MockRepositories::default())
        .update(
            TripId::random(),
            TripProgress {
                status: Some("PAUSED".to_owned()),
                ..TripProgress::default()
            },
        )
        .await
        .expect_err("unknown status");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn delete_ignores_status() {
    let trip = started_trip(UserId::random());
    let trip_id = trip.id();
    let mut mocks = MockRepositories::default();
    mocks.trips.expect_find_by_id().return_once(move |_| Ok(Some(trip)));
    mocks.trips.expect_delete().times(1).return_once(|_| Ok(true));

    let deleted = service(mocks).delete(trip_id).await.expect("delete succeeds");
    assert_eq!(deleted.id(), trip_id);
}

fn store_backed() -> Repositories {
    Repositories::from_store(Arc::new(InMemoryStore::new()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_start_exactly_one_trip(owner: User) {
    let user_id = owner.id();
    let repos = store_backed();
    repos.users.save(&owner).await.expect("user stored");
    let trips = TripService::new(repos.clone(), UserLocks::new(), clock_at(now()));

    let attempts: Vec<_> = (0..32)
        .map(|_| {
            let trips = trips.clone();
            tokio::spawn(async move { trips.create(user_id, plan()).await })
        })
        .collect();

    let mut started = 0;
    for attempt in attempts {
        match attempt.await.expect("task joins") {
            Ok(_) => started += 1,
            Err(error) => assert_eq!(error.code(), ErrorCode::Conflict),
        }
    }
    assert_eq!(started, 1);
    let stored = repos.trips.list_for_user(&user_id).await.expect("trips listed");
    assert_eq!(stored.len(), 1);
}

#[rstest]
#[tokio::test]
async fn unknown_users_leave_no_lock_slots() {
    let repos = store_backed();
    let locks = UserLocks::new();
    let trips = TripService::new(repos.clone(), locks.clone(), clock_at(now()));
    let contacts = ContactDirectory::new(repos, locks.clone());

    for _ in 0..100 {
        let error = trips
            .create(UserId::random(), plan())
            .await
            .expect_err("no such user");
        assert_eq!(error.code(), ErrorCode::NotFound);

        let error = contacts
            .create(
                UserId::random(),
                ContactFields {
                    name: Some("Grace".to_owned()),
                    phone: Some("2065550100".to_owned()),
                    email: Some("grace@example.com".to_owned()),
                },
            )
            .await
            .expect_err("no such user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
    assert_eq!(locks.len(), 0);
}
