//! Shared harness for HTTP integration tests over the in-memory store.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::Clock;
use promo_backend::Trace;
use promo_backend::domain::{
    AdminAuthService, AttemptLedgerService, GameSettingsService, LockoutPolicy,
    PlayerDirectoryService,
};
use promo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use promo_backend::inbound::http::{admin, attempts, game_settings, players, validation};
use promo_backend::outbound::memory::InMemoryGameStore;

/// Wire every driving port over `store`, reading time from `clock`.
pub fn state_over(
    store: &InMemoryGameStore,
    clock: Arc<dyn Clock>,
    lockout: LockoutPolicy,
) -> web::Data<HttpState> {
    let store = Arc::new(store.clone());
    web::Data::new(HttpState::new(HttpStatePorts {
        players: Arc::new(PlayerDirectoryService::new(store.clone(), clock.clone())),
        attempts: Arc::new(AttemptLedgerService::new(store.clone(), clock.clone())),
        admin_login: Arc::new(AdminAuthService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            lockout,
        )),
        game_settings: Arc::new(GameSettingsService::new(store)),
        clock,
    }))
}

/// The game API as served in production, minus Swagger UI.
pub fn game_app(
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
    App::new().app_data(state).wrap(Trace).service(
        web::scope("/api/v1")
            .app_data(validation::json_config())
            .service(players::lookup_player)
            .service(players::register_player)
            .service(attempts::record_attempt)
            .service(admin::admin_login)
            .service(game_settings::get_game_settings),
    )
}
