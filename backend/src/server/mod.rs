//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use buddy_backend::Trace;
#[cfg(debug_assertions)]
use buddy_backend::doc::ApiDoc;
use buddy_backend::domain::{AlertDispatcher, CheckInMonitor, CheckInScheduler, Repositories};
use buddy_backend::inbound::http::configure_api;
use buddy_backend::inbound::http::health::{HealthState, live, ready};
use buddy_backend::inbound::http::state::HttpState;
use buddy_backend::outbound::memory::InMemoryStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Handler state plus the background scanner sharing its dispatcher.
pub struct Runtime {
    pub http_state: web::Data<HttpState>,
    pub scheduler: CheckInScheduler,
    pub bind_addr: String,
}

/// Wire the in-memory store, the alert dispatcher and every domain service.
///
/// The scheduler is returned stopped; the caller starts it once the listener
/// is bound.
pub fn build_runtime(config: ServerConfig) -> Runtime {
    let ServerConfig {
        bind_addr,
        scan_interval,
        dispatcher,
        channel,
    } = config;
    let repos = Repositories::from_store(Arc::new(InMemoryStore::new()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let alerts = AlertDispatcher::new(repos.clone(), channel, dispatcher);
    let monitor = CheckInMonitor::new(repos.clone(), alerts.clone(), Arc::clone(&clock));
    Runtime {
        http_state: web::Data::new(HttpState::new(repos, alerts, clock)),
        scheduler: CheckInScheduler::new(monitor, scan_interval),
        bind_addr,
    }
}

/// Construct an Actix HTTP server over pre-built handler state.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    bind_addr: &str,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
