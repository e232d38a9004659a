//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, usage, users};
use crate::state::AppState;

/// Maximum concurrent requests for gating endpoints. These sit on every
/// feature invocation, so they get the higher limit.
const GATE_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for account endpoints.
const ACCOUNT_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Accounts
/// - `POST /v1/users` - Register a user
/// - `GET /v1/users/:user_id` - Get a user record
/// - `PUT /v1/users/:user_id/tier` - Change a user's tier
///
/// ## Gating
/// - `GET /v1/users/:user_id/access/:feature` - Check feature access
/// - `POST /v1/users/:user_id/usage/:feature` - Record a feature invocation
/// - `GET /v1/users/:user_id/usage` - Today's usage status
/// - `GET /v1/users/:user_id/usage/history?days=N` - Usage history
/// - `GET /v1/users/:user_id/recommendations` - Upgrade recommendations
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let gate_routes = Router::new()
        .route("/:user_id/access/:feature", get(usage::check_access))
        .route("/:user_id/usage/:feature", post(usage::track_usage))
        .route("/:user_id/usage", get(usage::usage_status))
        .route("/:user_id/usage/history", get(usage::usage_history))
        .route("/:user_id/recommendations", get(usage::recommendations))
        .layer(ConcurrencyLimitLayer::new(GATE_MAX_CONCURRENT_REQUESTS));

    let account_routes = Router::new()
        .route("/", post(users::create_user))
        .route("/:user_id", get(users::get_user))
        .route("/:user_id/tier", put(users::set_tier))
        .layer(ConcurrencyLimitLayer::new(ACCOUNT_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes
        .nest("/v1/users", account_routes.merge(gate_routes))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
