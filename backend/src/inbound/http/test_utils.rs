//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::Trace;
use crate::domain::{AlertDispatcher, AlertDispatcherConfig, Registration, Repositories, User};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::test_support::{MutableClock, RecordingNotificationChannel};

/// Sender number configured for handler tests.
pub const FROM_NUMBER: &str = "+12065550199";

/// Handler state over an in-memory store and a recording channel.
pub struct TestHarness {
    pub state: HttpState,
    pub channel: Arc<RecordingNotificationChannel>,
    pub clock: Arc<MutableClock>,
}

/// Fixed instant the harness clock starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0)
        .single()
        .expect("valid start time")
}

pub fn harness() -> TestHarness {
    let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
    let channel = Arc::new(RecordingNotificationChannel::new());
    let clock = Arc::new(MutableClock::new(start_time()));
    let alerts = AlertDispatcher::new(
        repos.clone(),
        channel.clone(),
        AlertDispatcherConfig {
            from_number: FROM_NUMBER.to_owned(),
            trip_url_base: "https://buddy.example/trips".to_owned(),
            ..AlertDispatcherConfig::default()
        },
    );
    TestHarness {
        state: HttpState::new(repos, alerts, clock.clone()),
        channel,
        clock,
    }
}

/// App exposing every `/api/v1` endpoint behind the trace middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Status and JSON body of a test response; an empty body reads as `null`.
pub async fn read_json(response: ServiceResponse) -> (StatusCode, Value) {
    let status = response.status();
    let body = test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body).expect("response body is JSON");
    (status, value)
}

/// Register `username` through the account service.
pub async fn register(state: &HttpState, username: &str) -> User {
    state
        .accounts
        .register(Registration {
            username: Some(username.to_owned()),
            email: Some(format!("{username}@example.com")),
            password: Some(Zeroizing::new("correct horse".to_owned())),
        })
        .await
        .expect("registration succeeds")
}
