//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every game endpoint, the probes and the shared error
//! envelope. The document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for client generation.

use utoipa::OpenApi;

use crate::inbound::http::admin::{AdminLoginRequest, AdminLoginResponse};
use crate::inbound::http::attempts::{AttemptRequest, AttemptResponse};
use crate::inbound::http::game_settings::{DiscountRangeResponse, GameSettingsResponse};
use crate::inbound::http::health::{ProbeResponse, ProbeStatus};
use crate::inbound::http::players::{
    LookupRequest, LookupResponse, PlayerResponse, RegisterRequest, RegisterResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Promo game backend API",
        description = "Phone-identified players guess for a discount tier; admins sign in behind a lockout."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::players::lookup_player,
        crate::inbound::http::players::register_player,
        crate::inbound::http::attempts::record_attempt,
        crate::inbound::http::admin::admin_login,
        crate::inbound::http::game_settings::get_game_settings,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        LookupRequest,
        LookupResponse,
        RegisterRequest,
        RegisterResponse,
        PlayerResponse,
        AttemptRequest,
        AttemptResponse,
        AdminLoginRequest,
        AdminLoginResponse,
        GameSettingsResponse,
        DiscountRangeResponse,
        ProbeResponse,
        ProbeStatus,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "players", description = "Player lookup and registration"),
        (name = "attempts", description = "Recording guesses"),
        (name = "admin", description = "Administrator authentication"),
        (name = "game", description = "Game configuration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
