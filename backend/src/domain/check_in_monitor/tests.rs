//! Tests for the overdue check-in scan.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{ContactRepository, UserRepository};
use crate::domain::{
    AlertDispatcherConfig, Contact, ContactFields, ContactId, EmailAddress, User, Username,
};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::{MutableClock, RecordingNotificationChannel};

fn scan_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 6, 0, 0)
        .single()
        .expect("valid time")
}

struct Harness {
    store: Arc<InMemoryStore>,
    channel: Arc<RecordingNotificationChannel>,
    monitor: CheckInMonitor,
}

impl Harness {
    async fn add_user(&self, name: &str, check_in_mode: bool, hours_ago: i64) -> User {
        let mut user = User::register(
            UserId::random(),
            Username::new(name).expect("valid username"),
            EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
        );
        user.set_check_in_mode(check_in_mode);
        user.record_check_in(scan_time() - Duration::hours(hours_ago));
        UserRepository::save(self.store.as_ref(), &user)
            .await
            .expect("save user");
        user
    }

    async fn add_contact(&self, user: &User, phone: &str) {
        let contact = Contact::create(
            ContactId::random(),
            user.id(),
            ContactFields {
                name: Some("Contact".to_owned()),
                phone: Some(phone.to_owned()),
                email: Some("contact@example.com".to_owned()),
            },
        )
        .expect("valid contact");
        ContactRepository::save(self.store.as_ref(), &contact)
            .await
            .expect("save contact");
    }
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let channel = Arc::new(RecordingNotificationChannel::new());
    let repos = Repositories::from_store(store.clone());
    let dispatcher = AlertDispatcher::new(
        repos.clone(),
        channel.clone(),
        AlertDispatcherConfig {
            from_number: "+12065550199".to_owned(),
            ..AlertDispatcherConfig::default()
        },
    );
    let clock = Arc::new(MutableClock::new(scan_time()));
    Harness {
        store,
        channel,
        monitor: CheckInMonitor::new(repos, dispatcher, clock),
    }
}

#[rstest]
#[tokio::test]
async fn scan_alerts_users_past_the_fixed_window(harness: Harness) {
    let late = harness.add_user("late", true, 25).await;
    let recent = harness.add_user("recent", true, 23).await;
    harness.add_contact(&late, "2065550101").await;
    harness.add_contact(&recent, "2065550102").await;

    let report = harness.monitor.scan().await.expect("scan succeeds");

    assert_eq!(report.alerted, vec![late.id()]);
    assert_eq!(harness.channel.recipients(), vec!["+12065550101".to_owned()]);
    let body = &harness.channel.sent()[0].body;
    assert!(body.starts_with("late has not checked into a saved location within the past 24 hours"));
}

#[rstest]
#[tokio::test]
async fn scan_ignores_users_out_of_check_in_mode(harness: Harness) {
    let opted_out = harness.add_user("optedout", false, 100).await;
    harness.add_contact(&opted_out, "2065550101").await;

    let report = harness.monitor.scan().await.expect("scan succeeds");
    assert_eq!(report, ScanReport::default());
    assert!(harness.channel.sent().is_empty());
}

#[rstest]
#[tokio::test]
async fn scan_skips_overdue_users_without_contacts(harness: Harness) {
    let lonely = harness.add_user("lonely", true, 30).await;
    let covered = harness.add_user("covered", true, 30).await;
    harness.add_contact(&covered, "2065550101").await;

    let report = harness.monitor.scan().await.expect("scan succeeds");
    assert_eq!(report.skipped_without_contacts, vec![lonely.id()]);
    assert_eq!(report.alerted, vec![covered.id()]);
    assert!(report.failures.is_empty());
}

#[rstest]
#[tokio::test]
async fn delivery_failures_do_not_stop_the_scan(harness: Harness) {
    let first = harness.add_user("first", true, 48).await;
    let second = harness.add_user("second", true, 48).await;
    harness.add_contact(&first, "2065550101").await;
    harness.add_contact(&second, "2065550102").await;
    harness.channel.fail_for("+12065550101");

    let report = harness.monitor.scan().await.expect("scan succeeds");
    assert_eq!(report.alerted, vec![first.id(), second.id()]);
    assert_eq!(report.failed_deliveries, 1);
    assert_eq!(harness.channel.recipients(), vec!["+12065550102".to_owned()]);
}
