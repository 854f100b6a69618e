//! Player identity HTTP handlers.
//!
//! ```text
//! POST /api/v1/users/lookup {"phone":"050-123-4567"}
//! POST /api/v1/users/register {"name":"Dana","phone":"050-123-4567"}
//! ```
//!
//! Both endpoints answer with a `status`-tagged body. Validation of the phone
//! number and name is part of that contract rather than the error envelope,
//! so the UI can branch on `status` alone.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LookupOutcome, RegistrationOutcome};
use crate::domain::{Difference, PhoneNumber, PlayerName, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const PHONE: FieldName = FieldName::new("phone");
const NAME: FieldName = FieldName::new("name");

/// Request payload for `POST /api/v1/users/lookup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    #[schema(example = "050-123-4567")]
    pub phone: Option<String>,
}

/// Request payload for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Dana")]
    pub name: Option<String>,
    #[schema(example = "050-123-4567")]
    pub phone: Option<String>,
}

/// Player as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: String,
    pub name: String,
    /// Normalised `+972` form.
    #[schema(example = "+972501234567")]
    pub phone: String,
    pub attempts_left: u32,
    /// Lowest distance reached so far.
    pub best_result: Option<u32>,
    /// Discount percentage earned.
    pub discount: u8,
    pub created_at: String,
}

impl From<User> for PlayerResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            phone: value.phone().as_str().to_owned(),
            attempts_left: value.attempts_left(),
            best_result: value.best_result().map(Difference::value),
            discount: value.discount().value(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Result of a phone lookup.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResponse {
    Found { user: PlayerResponse },
    RegistrationRequired,
    InvalidPhone { message: String },
}

/// Result of a registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegisterResponse {
    Registered { user: PlayerResponse },
    Conflict,
    InvalidPhone { message: String },
    InvalidName { message: String },
}

fn parse_phone(raw: &str) -> Result<PhoneNumber, String> {
    PhoneNumber::parse(raw).map_err(|err| err.to_string())
}

/// Resolve a phone number to a player.
#[utoipa::path(
    post,
    path = "/api/v1/users/lookup",
    request_body = LookupRequest,
    responses(
        (status = 200, description = "Player found or registration required", body = LookupResponse),
        (status = 400, description = "Phone number rejected or body malformed", body = LookupResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["players"],
    operation_id = "lookupPlayer",
    security([])
)]
#[post("/users/lookup")]
pub async fn lookup_player(
    state: web::Data<HttpState>,
    payload: web::Json<LookupRequest>,
) -> ApiResult<HttpResponse> {
    let raw = require(payload.into_inner().phone, PHONE)?;
    let phone = match parse_phone(&raw) {
        Ok(phone) => phone,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(LookupResponse::InvalidPhone { message }));
        }
    };

    let body = match state.players.lookup(&phone).await? {
        LookupOutcome::Found(user) => LookupResponse::Found { user: user.into() },
        LookupOutcome::RegistrationRequired => LookupResponse::RegistrationRequired,
    };
    Ok(HttpResponse::Ok().json(body))
}

/// Register a new player.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Player registered", body = RegisterResponse),
        (status = 400, description = "Phone or name rejected", body = RegisterResponse),
        (status = 409, description = "Phone already registered", body = RegisterResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["players"],
    operation_id = "registerPlayer",
    security([])
)]
#[post("/users/register")]
pub async fn register_player(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest { name, phone } = payload.into_inner();
    let raw_name = require(name, NAME)?;
    let raw_phone = require(phone, PHONE)?;

    let phone = match parse_phone(&raw_phone) {
        Ok(phone) => phone,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(RegisterResponse::InvalidPhone { message }));
        }
    };
    let name = match PlayerName::new(&raw_name) {
        Ok(name) => name,
        Err(err) => {
            return Ok(HttpResponse::BadRequest().json(RegisterResponse::InvalidName {
                message: err.to_string(),
            }));
        }
    };

    Ok(match state.players.register(&name, &phone).await? {
        RegistrationOutcome::Registered(user) => {
            HttpResponse::Created().json(RegisterResponse::Registered { user: user.into() })
        }
        RegistrationOutcome::Conflict => HttpResponse::Conflict().json(RegisterResponse::Conflict),
    })
}

#[cfg(test)]
#[path = "players_tests.rs"]
mod tests;
