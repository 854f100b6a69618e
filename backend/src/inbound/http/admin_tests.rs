//! Tests for the admin login handler.

use super::*;
use crate::inbound::http::test_utils::{TestPorts, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{Duration, TimeZone};
use mockable::MockClock;
use rstest::rstest;
use std::sync::Arc;
use serde_json::Value;

const ADMIN: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

async fn login(ports: TestPorts, body: Value) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/admin/login")
        .peer_addr("203.0.113.7:5123".parse().expect("peer address"))
        .set_json(body)
        .to_request();
    actix_test::call_service(&app, request).await
}

#[rstest]
#[actix_web::test]
async fn accepted_credentials_answer_ok_and_forward_peer_ip() {
    let mut ports = TestPorts::default();
    ports
        .admin_login
        .expect_authenticate()
        .withf(|credentials, ip| {
            credentials.admin_id().to_string() == ADMIN
                && credentials.password() == "secret"
                && ip.as_deref() == Some("203.0.113.7")
        })
        .times(1)
        .return_once(|_, _| Ok(AdminLoginOutcome::Success));

    let response = login(ports, json!({ "adminId": ADMIN, "password": "secret" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[rstest]
#[actix_web::test]
async fn wrong_credentials_are_unauthorised() {
    let mut ports = TestPorts::default();
    ports
        .admin_login
        .expect_authenticate()
        .return_once(|_, _| Ok(AdminLoginOutcome::InvalidCredentials));

    let response = login(ports, json!({ "adminId": ADMIN, "password": "wrong" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "status": "invalid" }));
}

#[rstest]
#[actix_web::test]
async fn locked_account_reports_unlock_time_and_retry_after() {
    let retry_after = Utc::now() + Duration::minutes(15);
    let mut ports = TestPorts::default();
    ports
        .admin_login
        .expect_authenticate()
        .return_once(move |_, _| Ok(AdminLoginOutcome::Locked { retry_after }));

    let response = login(ports, json!({ "adminId": ADMIN, "password": "secret" })).await;

    assert_eq!(response.status(), StatusCode::LOCKED);
    let seconds: i64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .expect("Retry-After header");
    assert!((1..=900).contains(&seconds));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "locked");
    assert_eq!(body["retryAfter"], retry_after.to_rfc3339());
}

#[rstest]
#[actix_web::test]
async fn retry_after_header_is_measured_on_the_injected_clock() {
    let now = Utc
        .with_ymd_and_hms(2030, 1, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let retry_after = now + Duration::seconds(90);
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || now);
    let mut ports = TestPorts {
        clock: Some(Arc::new(clock)),
        ..TestPorts::default()
    };
    ports
        .admin_login
        .expect_authenticate()
        .return_once(move |_, _| Ok(AdminLoginOutcome::Locked { retry_after }));

    let response = login(ports, json!({ "adminId": ADMIN, "password": "secret" })).await;

    assert_eq!(response.status(), StatusCode::LOCKED);
    assert_eq!(
        response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok()),
        Some("90")
    );
}

#[rstest]
#[case(json!({ "adminId": "root", "password": "secret" }), "adminId", "invalid_uuid")]
#[case(json!({ "adminId": ADMIN, "password": "" }), "password", "empty_password")]
#[case(json!({ "password": "secret" }), "adminId", "missing_field")]
#[actix_web::test]
async fn malformed_credentials_are_rejected_before_authentication(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let response = login(TestPorts::default(), payload).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case::expired_lock(-5_000, 1)]
#[case::sub_second(200, 1)]
#[case::rounds_up(61_500, 62)]
fn retry_after_is_whole_positive_seconds(#[case] offset_ms: i64, #[case] expected: i64) {
    let now = Utc::now();
    let unlock = now + Duration::milliseconds(offset_ms);

    assert_eq!(retry_after_seconds(unlock, now), expected);
}
