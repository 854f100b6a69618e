//! Attempt recording HTTP handler.
//!
//! ```text
//! POST /api/v1/attempts {"userId":"3fa85f64-5717-4562-b3fc-2c963f66afa6","difference":4}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AttemptOutcome;
use crate::domain::{AttemptReceipt, Difference, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_difference_error, parse_uuid, require};

const USER_ID: FieldName = FieldName::new("userId");
const DIFFERENCE: FieldName = FieldName::new("difference");

/// Request payload for `POST /api/v1/attempts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
    /// Whole-number distance between the guess and the target; lower is
    /// better.
    #[schema(example = 4)]
    pub difference: Option<f64>,
}

/// Result of recording an attempt.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptResponse {
    Recorded {
        #[serde(rename = "attemptId")]
        attempt_id: String,
        #[serde(rename = "attemptsLeft")]
        attempts_left: u32,
        #[serde(rename = "bestResult")]
        best_result: Option<u32>,
        discount: u8,
    },
    /// The player has used every attempt.
    Exhausted,
    NotFound,
}

impl From<AttemptReceipt> for AttemptResponse {
    fn from(value: AttemptReceipt) -> Self {
        Self::Recorded {
            attempt_id: value.attempt_id.to_string(),
            attempts_left: value.attempts_left,
            best_result: value.best_result.map(Difference::value),
            discount: value.discount.value(),
        }
    }
}

/// Record one attempt for a player.
#[utoipa::path(
    post,
    path = "/api/v1/attempts",
    request_body = AttemptRequest,
    responses(
        (status = 201, description = "Attempt recorded", body = AttemptResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown player", body = AttemptResponse),
        (status = 409, description = "No attempts left", body = AttemptResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable or discount ranges incomplete", body = ErrorSchema)
    ),
    tags = ["attempts"],
    operation_id = "recordAttempt",
    security([])
)]
#[post("/attempts")]
pub async fn record_attempt(
    state: web::Data<HttpState>,
    payload: web::Json<AttemptRequest>,
) -> ApiResult<HttpResponse> {
    let AttemptRequest {
        user_id,
        difference,
    } = payload.into_inner();
    let raw_id = require(user_id, USER_ID)?;
    let raw_difference = require(difference, DIFFERENCE)?;

    let user_id = UserId::from_uuid(parse_uuid(&raw_id, USER_ID)?);
    let difference = Difference::new(raw_difference)
        .map_err(|_| invalid_difference_error(DIFFERENCE, raw_difference))?;

    Ok(
        match state.attempts.record_attempt(&user_id, difference).await? {
            AttemptOutcome::Recorded(receipt) => {
                HttpResponse::Created().json(AttemptResponse::from(receipt))
            }
            AttemptOutcome::Exhausted => HttpResponse::Conflict().json(AttemptResponse::Exhausted),
            AttemptOutcome::UserNotFound => {
                HttpResponse::NotFound().json(AttemptResponse::NotFound)
            }
        },
    )
}

#[cfg(test)]
mod tests {
    //! Handler tests for attempt recording.

    use super::*;
    use crate::domain::{DiscountPercent, Error, NO_MATCHING_RANGE_CODE};
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    const PLAYER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn post_attempt(ports: TestPorts, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/attempts")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }

    fn receipt() -> AttemptReceipt {
        AttemptReceipt {
            attempt_id: crate::domain::AttemptId::random(),
            attempts_left: 2,
            best_result: Some(Difference::from(4)),
            discount: DiscountPercent::new(20).expect("discount"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn recorded_attempt_reports_player_state() {
        let receipt = receipt();
        let expected_id = receipt.attempt_id.to_string();
        let mut ports = TestPorts::default();
        ports
            .attempts
            .expect_record_attempt()
            .withf(|user_id, difference| {
                user_id.to_string() == PLAYER && difference.value() == 4
            })
            .times(1)
            .return_once(move |_, _| Ok(AttemptOutcome::Recorded(receipt)));

        let (status, body) =
            post_attempt(ports, json!({ "userId": PLAYER, "difference": 4 })).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "status": "recorded",
                "attemptId": expected_id,
                "attemptsLeft": 2,
                "bestResult": 4,
                "discount": 20,
            })
        );
    }

    #[rstest]
    #[case(AttemptOutcome::Exhausted, StatusCode::CONFLICT, "exhausted")]
    #[case(AttemptOutcome::UserNotFound, StatusCode::NOT_FOUND, "not_found")]
    #[actix_web::test]
    async fn rejected_attempts_map_to_status(
        #[case] outcome: AttemptOutcome,
        #[case] expected_status: StatusCode,
        #[case] expected_tag: &str,
    ) {
        let mut ports = TestPorts::default();
        ports
            .attempts
            .expect_record_attempt()
            .return_once(move |_, _| Ok(outcome));

        let (status, body) =
            post_attempt(ports, json!({ "userId": PLAYER, "difference": 1.0 })).await;

        assert_eq!(status, expected_status);
        assert_eq!(body, json!({ "status": expected_tag }));
    }

    #[rstest]
    #[case(json!({ "userId": "nope", "difference": 1.0 }), "userId", "invalid_uuid")]
    #[case(json!({ "userId": PLAYER, "difference": -0.5 }), "difference", "invalid_difference")]
    #[case(json!({ "userId": PLAYER, "difference": 10.5 }), "difference", "invalid_difference")]
    #[case(json!({ "difference": 1.0 }), "userId", "missing_field")]
    #[case(json!({ "userId": PLAYER }), "difference", "missing_field")]
    #[actix_web::test]
    async fn invalid_payloads_never_reach_the_ledger(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = post_attempt(TestPorts::default(), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn configuration_gap_is_service_unavailable() {
        let mut ports = TestPorts::default();
        ports.attempts.expect_record_attempt().return_once(|_, _| {
            Err(Error::service_unavailable("discount ranges do not cover 12")
                .with_details(json!({ "code": NO_MATCHING_RANGE_CODE })))
        });

        let (status, body) =
            post_attempt(ports, json!({ "userId": PLAYER, "difference": 12 })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["details"]["code"], NO_MATCHING_RANGE_CODE);
    }
}
