//! Backend entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use patternhub::inbound::http::health::HealthState;
use patternhub::inbound::http::identity_config::{BuildMode, identity_settings_from_env};
use patternhub::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let identity = identity_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::from_settings(&settings, identity).await?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
