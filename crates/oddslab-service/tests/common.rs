//! Common test utilities for oddslab integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use chrono::NaiveDate;
use tempfile::TempDir;

use oddslab_core::FixedClock;
use oddslab_service::{create_router, AppState, ServiceConfig};
use oddslab_store::SqliteStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The injected clock, so tests can drive day rollover.
    pub clock: Arc<FixedClock>,
}

impl TestHarness {
    /// The fixed date every harness starts on.
    pub fn start_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).expect("valid date")
    }

    /// Create a new test harness with a fresh database and a pinned clock.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("oddslab-test.db");
        let store = SqliteStore::open(&db_path)
            .await
            .expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_path: db_path.to_string_lossy().to_string(),
            ..ServiceConfig::default()
        };

        let clock = Arc::new(FixedClock::new(Self::start_day()));
        let state = AppState::with_clock(Arc::new(store), config, clock.clone());
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            clock,
        }
    }

    /// Register a user with the given tier and return its ID.
    pub async fn register_user(&self, tier: &str) -> String {
        let response = self
            .server
            .post("/v1/users")
            .json(&serde_json::json!({ "tier": tier }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["user_id"].as_str().expect("user_id in body").to_string()
    }

    /// Record one invocation of `feature`, asserting success.
    pub async fn track(&self, user_id: &str, feature: &str) -> serde_json::Value {
        let response = self
            .server
            .post(&format!("/v1/users/{user_id}/usage/{feature}"))
            .await;
        response.assert_status_ok();
        response.json()
    }
}
