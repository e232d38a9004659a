//! Usage history integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn two_days_of_records_return_exactly_two() {
    let harness = TestHarness::new().await;
    let user = harness.register_user("free").await;

    harness.track(&user, "parlay_evaluations").await;
    harness.clock.advance_days(1);
    harness.track(&user, "odds_comparisons").await;

    let response = harness
        .server
        .get(&format!("/v1/users/{user}/usage/history?days=30"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["days"], 30);
    assert_eq!(body["total_days"], 2);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Newest first.
    assert_eq!(records[0]["day"], "2026-08-27");
    assert_eq!(records[0]["odds_comparisons"], 1);
    assert_eq!(records[0]["parlay_evaluations"], 0);
    assert_eq!(records[1]["day"], "2026-08-26");
    assert_eq!(records[1]["parlay_evaluations"], 1);
}

#[tokio::test]
async fn window_defaults_to_thirty_days() {
    let harness = TestHarness::new().await;
    let user = harness.register_user("free").await;

    let response = harness
        .server
        .get(&format!("/v1/users/{user}/usage/history"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["days"], 30);
    assert_eq!(body["total_days"], 0);
}

#[tokio::test]
async fn window_is_clamped() {
    let harness = TestHarness::new().await;
    let user = harness.register_user("free").await;

    let response = harness
        .server
        .get(&format!("/v1/users/{user}/usage/history?days=500"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["days"], 90);

    let response = harness
        .server
        .get(&format!("/v1/users/{user}/usage/history?days=0"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["days"], 1);
}

#[tokio::test]
async fn old_records_fall_out_of_the_window() {
    let harness = TestHarness::new().await;
    let user = harness.register_user("free").await;

    harness.track(&user, "parlay_evaluations").await;
    harness.clock.advance_days(40);
    harness.track(&user, "parlay_evaluations").await;

    let response = harness
        .server
        .get(&format!("/v1/users/{user}/usage/history?days=30"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_days"], 1);
    assert_eq!(body["records"][0]["day"], "2026-10-05");
}

#[tokio::test]
async fn history_for_unknown_user_is_not_found() {
    let harness = TestHarness::new().await;

    harness
        .server
        .get("/v1/users/0c8a95a4-8c2e-4f5e-9e8e-1c2d3e4f5a6b/usage/history")
        .await
        .assert_status_not_found();
}
