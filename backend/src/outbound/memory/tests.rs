//! Tests for the in-memory store.

use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ContactFields, Destination, GeoPoint, LocationFields};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0)
        .single()
        .expect("valid time")
}

fn user(name: &str) -> User {
    User::register(
        UserId::random(),
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
    )
}

fn contact(user_id: UserId, name: &str) -> Contact {
    Contact::create(
        ContactId::random(),
        user_id,
        ContactFields {
            name: Some(name.to_owned()),
            phone: Some("2065550100".to_owned()),
            email: Some("contact@example.com".to_owned()),
        },
    )
    .expect("valid contact")
}

fn trip(user_id: UserId) -> Trip {
    Trip::start(
        TripId::random(),
        user_id,
        Destination {
            name: None,
            address: "1 Main St".to_owned(),
            point: GeoPoint::parse("1", "2").expect("valid point"),
        },
        None,
        now(),
    )
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn users_are_found_by_unique_fields(store: InMemoryStore) {
    let ada = user("ada");
    UserRepository::save(&store, &ada).await.expect("save user");

    let by_name = store
        .find_by_username(ada.username())
        .await
        .expect("lookup succeeds");
    let by_email = store
        .find_by_email(ada.email())
        .await
        .expect("lookup succeeds");
    assert_eq!(by_name.as_ref(), Some(&ada));
    assert_eq!(by_email, Some(ada));
}

#[rstest]
#[tokio::test]
async fn overdue_scan_applies_mode_and_threshold(store: InMemoryStore) {
    let threshold = now() - Duration::hours(24);
    let mut stale = user("stale");
    stale.set_check_in_mode(true);
    stale.record_check_in(now() - Duration::hours(25));
    let mut fresh = user("fresh");
    fresh.set_check_in_mode(true);
    fresh.record_check_in(now() - Duration::hours(23));
    let mut opted_out = user("optedout");
    opted_out.record_check_in(now() - Duration::hours(72));

    for u in [&stale, &fresh, &opted_out] {
        UserRepository::save(&store, u).await.expect("save user");
    }

    let overdue = store
        .find_overdue_check_ins(threshold)
        .await
        .expect("scan succeeds");
    assert_eq!(overdue, vec![stale]);
}

#[rstest]
#[tokio::test]
async fn save_replaces_in_place_and_lists_oldest_first(store: InMemoryStore) {
    let owner = UserId::random();
    let first = contact(owner, "First");
    let mut second = contact(owner, "Second");
    ContactRepository::save(&store, &first).await.expect("save");
    ContactRepository::save(&store, &second).await.expect("save");
    ContactRepository::save(&store, &contact(UserId::random(), "Other"))
        .await
        .expect("save");

    second
        .apply(ContactFields {
            name: Some("Second Renamed".to_owned()),
            ..ContactFields::default()
        })
        .expect("rename");
    ContactRepository::save(&store, &second).await.expect("resave");

    let names: Vec<String> = ContactRepository::list_for_user(&store, &owner)
        .await
        .expect("list")
        .iter()
        .map(|c| c.name().to_owned())
        .collect();
    assert_eq!(names, vec!["First", "Second Renamed"]);
}

#[rstest]
#[tokio::test]
async fn active_trip_lookup_ignores_finished_trips(store: InMemoryStore) {
    let owner = UserId::random();
    let mut finished = trip(owner);
    finished
        .apply_update(
            crate::domain::TripUpdate {
                status: Some(crate::domain::TripStatus::Cancel),
                ..crate::domain::TripUpdate::default()
            },
            now(),
        )
        .expect("cancel");
    TripRepository::save(&store, &finished).await.expect("save");
    assert!(
        store
            .find_active_for_user(&owner)
            .await
            .expect("lookup")
            .is_none()
    );

    let active = trip(owner);
    TripRepository::save(&store, &active).await.expect("save");
    assert_eq!(
        store.find_active_for_user(&owner).await.expect("lookup"),
        Some(active)
    );
}

#[rstest]
#[tokio::test]
async fn delete_for_user_only_touches_that_user(store: InMemoryStore) {
    let owner = UserId::random();
    let other = UserId::random();
    for user_id in [owner, owner, other] {
        let location = SignificantLocation::create(
            LocationId::random(),
            user_id,
            LocationFields {
                address: Some(format!("{} Main St", LocationId::random())),
                latitude: Some("1".to_owned()),
                longitude: Some("2".to_owned()),
            },
        )
        .expect("valid location");
        LocationRepository::save(&store, &location).await.expect("save");
    }

    let removed = LocationRepository::delete_for_user(&store, &owner)
        .await
        .expect("delete");
    assert_eq!(removed, 2);
    let remaining = LocationRepository::list_for_user(&store, &other)
        .await
        .expect("list");
    assert_eq!(remaining.len(), 1);
}
