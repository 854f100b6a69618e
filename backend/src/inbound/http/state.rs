//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.
//! The clock is the one the domain services read, so response headers
//! derived from time agree with the decisions behind them.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AdminLoginService, AttemptLedger, GameSettingsQuery, PlayerDirectory};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub players: Arc<dyn PlayerDirectory>,
    pub attempts: Arc<dyn AttemptLedger>,
    pub admin_login: Arc<dyn AdminLoginService>,
    pub game_settings: Arc<dyn GameSettingsQuery>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub players: Arc<dyn PlayerDirectory>,
    pub attempts: Arc<dyn AttemptLedger>,
    pub admin_login: Arc<dyn AdminLoginService>,
    pub game_settings: Arc<dyn GameSettingsQuery>,
    pub clock: Arc<dyn Clock>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use promo_backend::domain::{
    ///     AdminAuthService, AttemptLedgerService, GameSettingsService, LockoutPolicy,
    ///     PlayerDirectoryService,
    /// };
    /// use promo_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use promo_backend::outbound::memory::{InMemoryGameStore, launch_settings};
    ///
    /// let store = Arc::new(InMemoryGameStore::new(launch_settings().expect("settings")));
    /// let clock: Arc<dyn mockable::Clock> = Arc::new(DefaultClock);
    /// let state = HttpState::new(HttpStatePorts {
    ///     players: Arc::new(PlayerDirectoryService::new(store.clone(), clock.clone())),
    ///     attempts: Arc::new(AttemptLedgerService::new(store.clone(), clock.clone())),
    ///     admin_login: Arc::new(AdminAuthService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         clock.clone(),
    ///         LockoutPolicy::default(),
    ///     )),
    ///     game_settings: Arc::new(GameSettingsService::new(store)),
    ///     clock,
    /// });
    /// let _players = state.players.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            players,
            attempts,
            admin_login,
            game_settings,
            clock,
        } = ports;
        Self {
            players,
            attempts,
            admin_login,
            game_settings,
            clock,
        }
    }
}
