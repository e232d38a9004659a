//! Oddslab HTTP API Service.
//!
//! This crate provides the HTTP API for the oddslab tier-gating service,
//! including:
//!
//! - User registration and tier management
//! - Feature access checks and usage tracking
//! - Usage status, history, and upgrade recommendations
//!
//! # Gating protocol
//!
//! Clients check access before performing a gated action and record usage
//! after it succeeds. A denied check maps to HTTP 429 with
//! `limit_reached: true` in the error details. Authentication sits in front
//! of this service and is out of scope here; handlers identify users by
//! path parameter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for routing consistency

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
