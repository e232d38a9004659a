//! Oddslab Client SDK.
//!
//! This crate provides a client library for services to interact with the
//! oddslab tier-gating API.
//!
//! # Gating protocol
//!
//! Check access before performing a gated action, then record the usage
//! after it succeeds. [`OddslabClient::track_usage`] is the guarded
//! invocation: when the day's capacity is gone the server answers 429,
//! surfaced here as [`ClientError::LimitReached`].
//!
//! # Example
//!
//! ```no_run
//! use oddslab_client::OddslabClient;
//! use oddslab_core::{Feature, UserId};
//!
//! # async fn example() -> Result<(), oddslab_client::ClientError> {
//! let client = OddslabClient::new("http://oddslab.gate.svc:8080");
//! let user_id = UserId::generate();
//!
//! let decision = client.check_access(user_id, Feature::ParlayEvaluations).await?;
//! if decision.allowed {
//!     // ... evaluate the parlay ...
//!     let usage = client.track_usage(user_id, Feature::ParlayEvaluations).await?;
//!     println!("{} left today", usage.remaining);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, OddslabClient};
pub use error::ClientError;
pub use types::*;
