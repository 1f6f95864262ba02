use std::time::Duration;

use landed_cost::domain::{compute, CostInput, RateTables};
use landed_cost::infra::duty::{DutyClientError, DutyQuery, DutyRateClient};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn query() -> DutyQuery {
    let input = CostInput::default();
    let provisional = compute(&input, &RateTables::default(), None);
    DutyQuery::new(&input, &provisional)
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/duty"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> DutyRateClient {
    DutyRateClient::new(&format!("{}/duty", server.uri()), "test-key").unwrap()
}

#[tokio::test]
async fn sends_bearer_token_and_customs_figures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/duty"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "destination_country": "Austria",
            "hs_code": "8414.59"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duty_rate": 0.027})))
        .expect(1)
        .mount(&server)
        .await;

    let rate = client(&server).fetch_duty_rate(&query()).await.unwrap();
    assert_eq!(rate, 0.027);
}

#[tokio::test]
async fn accepts_alternative_rate_keys() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "dutyRate": 0.045})),
    )
    .await;

    let rate = client(&server).fetch_duty_rate(&query()).await.unwrap();
    assert_eq!(rate, 0.045);
}

#[tokio::test]
async fn non_success_status_is_an_error_with_body_excerpt() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(401).set_body_string("x".repeat(500)),
    )
    .await;

    let err = client(&server).fetch_duty_rate(&query()).await.unwrap_err();
    match err {
        DutyClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body.len(), 200);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_rate_field_is_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"duty_rate": "n/a"})),
    )
    .await;

    let err = client(&server).fetch_duty_rate(&query()).await.unwrap_err();
    assert!(matches!(err, DutyClientError::MissingRate));
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

    let err = client(&server).fetch_duty_rate(&query()).await.unwrap_err();
    assert!(matches!(err, DutyClientError::Http(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({"duty_rate": 0.01}))
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let client = DutyRateClient::with_timeout(
        &format!("{}/duty", server.uri()),
        "test-key",
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.fetch_duty_rate(&query()).await.unwrap_err();
    match err {
        DutyClientError::Http(inner) => assert!(inner.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
