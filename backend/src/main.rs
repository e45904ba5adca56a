//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API with its OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rbac_api::inbound::http::health::HealthState;
use rbac_api::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use rbac_api::settings::{AppSettings, Environment};
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
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?
        .validate()?;

    info!(
        bind_addr = %settings.bind_addr,
        environment = settings.environment.as_str(),
        telemetry_dataset = %settings.telemetry_dataset,
        "starting rbac-api"
    );

    if settings.run_migrations {
        run_migrations(&settings.database_url)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
    }

    let pool = DbPool::new(
        PoolConfig::new(settings.database_url.as_str())
            .with_max_size(settings.db_max_connections),
    )
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_addr, pool)
        .with_swagger_ui(settings.environment != Environment::Production);
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
