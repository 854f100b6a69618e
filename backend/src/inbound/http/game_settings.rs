//! Read-only view of the game settings.
//!
//! ```text
//! GET /api/v1/game/settings
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DiscountRange, GameSettings};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// One discount tier. `max` is absent for the open-ended top tier.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountRangeResponse {
    #[schema(example = 0.0)]
    pub min: f64,
    #[schema(example = 10.0)]
    pub max: Option<f64>,
    #[schema(example = 20)]
    pub discount: u8,
}

impl From<&DiscountRange> for DiscountRangeResponse {
    fn from(value: &DiscountRange) -> Self {
        Self {
            min: value.min(),
            max: value.max(),
            discount: value.discount().value(),
        }
    }
}

/// Game settings as shown to players.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsResponse {
    pub attempts_number: u32,
    /// Tiers ordered by ascending `min`.
    pub discount_ranges: Vec<DiscountRangeResponse>,
}

impl From<GameSettings> for GameSettingsResponse {
    fn from(value: GameSettings) -> Self {
        Self {
            attempts_number: value.attempts_number(),
            discount_ranges: value
                .discount_ranges()
                .as_slice()
                .iter()
                .map(DiscountRangeResponse::from)
                .collect(),
        }
    }
}

/// Current attempt budget and discount tiers.
#[utoipa::path(
    get,
    path = "/api/v1/game/settings",
    responses(
        (status = 200, description = "Current game settings", body = GameSettingsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["game"],
    operation_id = "getGameSettings",
    security([])
)]
#[get("/game/settings")]
pub async fn get_game_settings(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<GameSettingsResponse>> {
    let settings = state.game_settings.current_settings().await?;
    Ok(web::Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscountPercent, DiscountRanges, Error};
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn settings() -> GameSettings {
        let range = |min, max, discount| {
            DiscountRange::new(min, max, DiscountPercent::new(discount).expect("discount"))
                .expect("range")
        };
        GameSettings::new(
            3,
            DiscountRanges::new(vec![range(11.0, None, 10), range(0.0, Some(10.0), 20)]),
        )
    }

    async fn get_settings(ports: TestPorts) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports.into_state())).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/game/settings")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn settings_list_tiers_in_ascending_order() {
        let mut ports = TestPorts::default();
        ports
            .game_settings
            .expect_current_settings()
            .times(1)
            .return_once(|| Ok(settings()));

        let (status, body) = get_settings(ports).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "attemptsNumber": 3,
                "discountRanges": [
                    { "min": 0.0, "max": 10.0, "discount": 20 },
                    { "min": 11.0, "max": null, "discount": 10 },
                ],
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_settings_are_an_internal_error() {
        let mut ports = TestPorts::default();
        ports
            .game_settings
            .expect_current_settings()
            .return_once(|| Err(Error::internal("game settings row missing")));

        let (status, body) = get_settings(ports).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }
}
