//! Backend entry-point: loads settings, starts the check-in scheduler and
//! serves the REST API with its health probes.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use buddy_backend::inbound::http::health::HealthState;
use buddy_backend::settings::AppSettings;
use server::{ServerConfig, build_runtime, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    info!(settings = ?settings, "settings loaded");
    let config = ServerConfig::from_settings(&settings).wrap_err("invalid SMS configuration")?;
    let mut runtime = build_runtime(config);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        runtime.http_state.clone(),
        &runtime.bind_addr,
    )
    .with_context(|| format!("failed to bind {}", runtime.bind_addr))?;
    runtime.scheduler.start();
    info!(bind_addr = %runtime.bind_addr, "server listening");

    let outcome = server.await;
    health_state.mark_draining();
    runtime.scheduler.stop().await;
    outcome.wrap_err("server terminated with an error")
}
