//! Core types and tier-gating logic for oddslab.
//!
//! This crate provides the foundational types used throughout the oddslab
//! platform:
//!
//! - **Identifiers**: `UserId`
//! - **Features**: `Feature`, the gated, rate-limited user actions
//! - **Tiers**: `Tier`, `Limit`, `TierLimits` for subscription levels and
//!   their daily limits
//! - **Usage**: `UsageRecord`, `AccessDecision`, `UsageStatus`
//! - **Gating**: `TierGate`, the allow/deny decision core
//!
//! # Daily limits
//!
//! Every gated feature has a per-tier daily limit, either a finite count or
//! unlimited. Usage is counted per user per UTC calendar day; a new day
//! starts every counter at zero. Request handlers check access before
//! performing the gated action and record usage after it succeeds. The
//! check and the record are separate calls: two requests racing over the
//! last unit of capacity can both pass the check, so a day's count may
//! exceed a finite limit by one. That soft-limit behavior is intentional.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod error;
pub mod feature;
pub mod gate;
pub mod ids;
pub mod ledger;
pub mod tier;
pub mod usage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{GateError, Result};
pub use feature::Feature;
pub use gate::TierGate;
pub use ids::{IdError, UserId};
pub use ledger::{UsageLedger, UserDirectory};
pub use tier::{Limit, Tier, TierLimits, UnknownTier};
pub use usage::{AccessDecision, FeatureUsage, UpgradeRecommendation, UsageRecord, UsageStatus};
