//! Admin login HTTP handler.
//!
//! ```text
//! POST /api/v1/admin/login {"adminId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","password":"..."}
//! ```
//!
//! A locked account answers `423 Locked` with the unlock instant in the body
//! and the remaining whole seconds in `Retry-After`.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, post, web};
use chrono::{DateTime, Utc};
use mockable::Clock as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::AdminLoginOutcome;
use crate::domain::{AdminCredentials, Error, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const ADMIN_ID: FieldName = FieldName::new("adminId");
const PASSWORD: FieldName = FieldName::new("password");

/// Login request body for `POST /api/v1/admin/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub admin_id: Option<String>,
    pub password: Option<String>,
}

/// Result of an admin login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminLoginResponse {
    Ok,
    Invalid,
    Locked {
        /// RFC 3339 instant at which the lock expires.
        #[serde(rename = "retryAfter")]
        retry_after: String,
    },
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::InvalidAdminId => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": ADMIN_ID.as_str(), "code": "invalid_uuid" })),
        LoginValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": PASSWORD.as_str(), "code": "empty_password" })),
    }
}

fn retry_after_seconds(retry_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (retry_after - now).num_milliseconds();
    (millis + 999).div_euclid(1000).max(1)
}

/// Authenticate an administrator.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AdminLoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unknown admin or wrong password", body = AdminLoginResponse),
        (status = 423, description = "Account locked", body = AdminLoginResponse,
            headers(("Retry-After" = i64, description = "Seconds until the lock expires"))),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<HttpResponse> {
    let AdminLoginRequest { admin_id, password } = payload.into_inner();
    let admin_id = require(admin_id, ADMIN_ID)?;
    let password = zeroize::Zeroizing::new(require(password, PASSWORD)?);
    let credentials = AdminCredentials::try_from_parts(&admin_id, &password)
        .map_err(map_login_validation_error)?;
    let ip_address = req.peer_addr().map(|addr| addr.ip().to_string());

    Ok(
        match state.admin_login.authenticate(&credentials, ip_address).await? {
            AdminLoginOutcome::Success => HttpResponse::Ok().json(AdminLoginResponse::Ok),
            AdminLoginOutcome::InvalidCredentials => {
                HttpResponse::Unauthorized().json(AdminLoginResponse::Invalid)
            }
            AdminLoginOutcome::Locked { retry_after } => {
                let seconds = retry_after_seconds(retry_after, state.clock.utc());
                HttpResponse::build(actix_web::http::StatusCode::LOCKED)
                    .insert_header((header::RETRY_AFTER, seconds.to_string()))
                    .json(AdminLoginResponse::Locked {
                        retry_after: retry_after.to_rfc3339(),
                    })
            }
        },
    )
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
