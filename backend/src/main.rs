//! Backend entry-point: loads configuration, prepares the store and serves
//! the game API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use promo_backend::inbound::http::health::HealthState;
use promo_backend::outbound::persistence::{DbPool, run_pending_migrations_async};
use promo_backend::settings::ServerSettings;
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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load configuration: {err}")))?;
    settings
        .validate()
        .map_err(|err| std::io::Error::other(format!("invalid configuration: {err}")))?;

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let lockout = settings.lockout_policy().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr, lockout);

    if let Some(pool_config) = settings.pool_config().map_err(std::io::Error::other)? {
        let applied = run_pending_migrations_async(pool_config.database_url().to_owned())
            .await
            .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
        info!(applied, "database schema up to date");

        let pool = DbPool::new(pool_config)
            .await
            .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting promo backend");
    create_server(health_state, config)?.await
}
