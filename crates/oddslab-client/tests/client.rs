//! Client integration tests against a mock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oddslab_client::{ClientError, OddslabClient};
use oddslab_core::{Feature, Limit, Tier, UserId};

fn user() -> UserId {
    "5f6b1f76-2f0e-4f4e-9d5a-6a3f0c1b2d3e".parse().unwrap()
}

#[tokio::test]
async fn check_access_decodes_a_finite_decision() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("GET"))
        .and(path(format!("/v1/users/{user_id}/access/parlay_evaluations")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "allowed": true,
            "feature": "parlay_evaluations",
            "tier": "free",
            "limit": 3,
            "used": 1,
            "remaining": 2,
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let decision = client
        .check_access(user_id, Feature::ParlayEvaluations)
        .await
        .unwrap();

    assert!(decision.allowed);
    assert_eq!(decision.tier, Tier::Free);
    assert_eq!(decision.limit, Limit::Finite(3));
    assert_eq!(decision.used, 1);
    assert_eq!(decision.remaining, Limit::Finite(2));
}

#[tokio::test]
async fn track_usage_decodes_an_unlimited_response() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("POST"))
        .and(path(format!("/v1/users/{user_id}/usage/odds_comparisons")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "feature": "odds_comparisons",
            "used": 42,
            "limit": "unlimited",
            "remaining": "unlimited",
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let usage = client
        .track_usage(user_id, Feature::OddsComparisons)
        .await
        .unwrap();

    assert!(usage.success);
    assert_eq!(usage.used, 42);
    assert!(usage.limit.is_unlimited());
    assert!(usage.remaining.is_unlimited());
}

#[tokio::test]
async fn exhausted_limit_surfaces_as_limit_reached() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("POST"))
        .and(path(format!("/v1/users/{user_id}/usage/parlay_evaluations")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": "limit_reached",
                "message": "Daily limit reached for parlay_evaluations",
                "details": {
                    "allowed": false,
                    "feature": "parlay_evaluations",
                    "tier": "free",
                    "limit": 3,
                    "used": 3,
                    "remaining": 0,
                    "limit_reached": true,
                },
            },
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let error = client
        .track_usage(user_id, Feature::ParlayEvaluations)
        .await
        .unwrap_err();

    match error {
        ClientError::LimitReached { feature, used } => {
            assert_eq!(feature, "parlay_evaluations");
            assert_eq!(used, 3);
        }
        other => panic!("expected LimitReached, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_user_surfaces_as_user_not_found() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("GET"))
        .and(path(format!("/v1/users/{user_id}/usage")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": "not_found",
                "message": format!("User not found: {user_id}"),
            },
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let error = client.usage_status(user_id).await.unwrap_err();

    assert!(matches!(error, ClientError::UserNotFound { .. }));
}

#[tokio::test]
async fn register_user_sends_the_requested_tier() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .and(body_json(json!({ "tier": "pro" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user_id": user_id,
            "tier": "pro",
            "created_at": "2026-08-26T00:00:00Z",
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let account = client.register_user(None, Some(Tier::Pro)).await.unwrap();

    assert_eq!(account.user_id, user_id);
    assert_eq!(account.tier, Tier::Pro);
}

#[tokio::test]
async fn history_passes_the_window_as_a_query_parameter() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("GET"))
        .and(path(format!("/v1/users/{user_id}/usage/history")))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": user_id,
            "days": 7,
            "since": "2026-08-20",
            "total_days": 1,
            "records": [
                {
                    "user_id": user_id,
                    "day": "2026-08-26",
                    "parlay_evaluations": 2,
                    "odds_comparisons": 0,
                },
            ],
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let history = client.usage_history(user_id, Some(7)).await.unwrap();

    assert_eq!(history.days, 7);
    assert_eq!(history.total_days, 1);
    assert_eq!(history.records[0].parlay_evaluations, 2);
}

#[tokio::test]
async fn unexpected_errors_carry_code_and_status() {
    let server = MockServer::start().await;
    let user_id = user();

    Mock::given(method("GET"))
        .and(path(format!("/v1/users/{user_id}/recommendations")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {
                "code": "internal_error",
                "message": "Internal server error",
            },
        })))
        .mount(&server)
        .await;

    let client = OddslabClient::new(server.uri());
    let error = client.recommendations(user_id).await.unwrap_err();

    match error {
        ClientError::Api { code, status, .. } => {
            assert_eq!(code, "internal_error");
            assert_eq!(status, 500);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
