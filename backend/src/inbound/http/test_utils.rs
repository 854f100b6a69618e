//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    MockAdminLoginService, MockAttemptLedger, MockGameSettingsQuery, MockPlayerDirectory,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{admin, attempts, game_settings, players, validation};

/// Mocked driving ports; unset expectations fail the test if called.
#[derive(Default)]
pub struct TestPorts {
    pub players: MockPlayerDirectory,
    pub attempts: MockAttemptLedger,
    pub admin_login: MockAdminLoginService,
    pub game_settings: MockGameSettingsQuery,
    /// Clock handed to handlers; the system clock when unset.
    pub clock: Option<Arc<dyn Clock>>,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            players: Arc::new(self.players),
            attempts: Arc::new(self.attempts),
            admin_login: Arc::new(self.admin_login),
            game_settings: Arc::new(self.game_settings),
            clock: self.clock.unwrap_or_else(|| Arc::new(DefaultClock)),
        }))
    }
}

/// Build an app exposing every game endpoint under `/api/v1`.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .app_data(validation::json_config())
            .service(players::lookup_player)
            .service(players::register_player)
            .service(attempts::record_attempt)
            .service(admin::admin_login)
            .service(game_settings::get_game_settings),
    )
}
