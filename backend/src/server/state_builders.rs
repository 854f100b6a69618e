//! Builders wiring driven adapters into the driving ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use promo_backend::domain::ports::{
    AdminAuditLog, AdminRepository, GameSettingsRepository, PlayerRepository,
};
use promo_backend::domain::{
    AdminAuthService, AttemptLedgerService, GameSettingsService, LockoutPolicy,
    PlayerDirectoryService,
};
use promo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use promo_backend::outbound::memory::{InMemoryGameStore, launch_settings};
use promo_backend::outbound::persistence::{
    DieselAdminAuditLog, DieselAdminRepository, DieselGameSettingsRepository,
    DieselPlayerRepository,
};

use super::ServerConfig;

/// Build every driving port over one set of driven adapters.
fn build_ports<P, G, A, L>(
    players: Arc<P>,
    settings: Arc<G>,
    admins: Arc<A>,
    audit_log: Arc<L>,
    clock: Arc<dyn Clock>,
    lockout: LockoutPolicy,
) -> HttpStatePorts
where
    P: PlayerRepository + 'static,
    G: GameSettingsRepository + 'static,
    A: AdminRepository + 'static,
    L: AdminAuditLog + 'static,
{
    HttpStatePorts {
        players: Arc::new(PlayerDirectoryService::new(players.clone(), clock.clone())),
        attempts: Arc::new(AttemptLedgerService::new(players, clock.clone())),
        admin_login: Arc::new(AdminAuthService::new(admins, audit_log, clock.clone(), lockout)),
        game_settings: Arc::new(GameSettingsService::new(settings)),
        clock,
    }
}

/// Build the shared HTTP state from the configured store.
///
/// # Errors
/// Returns [`std::io::Error`] when the in-memory launch settings cannot be
/// constructed.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("serving the game from PostgreSQL");
            build_ports(
                Arc::new(DieselPlayerRepository::new(pool.clone())),
                Arc::new(DieselGameSettingsRepository::new(pool.clone())),
                Arc::new(DieselAdminRepository::new(pool.clone())),
                Arc::new(DieselAdminAuditLog::new(pool.clone())),
                clock,
                config.lockout,
            )
        }
        None => {
            warn!("no database configured; game state lives in memory and is lost on restart");
            let settings = launch_settings().map_err(|err| {
                std::io::Error::other(format!("invalid launch settings: {err}"))
            })?;
            let store = Arc::new(InMemoryGameStore::new(settings));
            build_ports(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                clock,
                config.lockout,
            )
        }
    };
    Ok(web::Data::new(HttpState::new(ports)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_backend::domain::{PhoneNumber, PlayerName};
    use promo_backend::domain::ports::{LookupOutcome, RegistrationOutcome};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn database_less_config_serves_from_memory() {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("addr"),
            LockoutPolicy::default(),
        );
        let state = build_http_state(&config).expect("state builds");
        let phone = PhoneNumber::parse("0501234567").expect("phone");

        let settings = state
            .game_settings
            .current_settings()
            .await
            .expect("launch settings");
        assert_eq!(settings.attempts_number(), 3);

        let registered = state
            .players
            .register(&PlayerName::new("Dana").expect("name"), &phone)
            .await
            .expect("registration succeeds");
        assert!(matches!(registered, RegistrationOutcome::Registered(_)));
        assert!(matches!(
            state.players.lookup(&phone).await.expect("lookup"),
            LookupOutcome::Found(_)
        ));
    }
}
