//! SQLite storage layer for oddslab.
//!
//! This crate persists user accounts and per-user-per-day usage counters
//! and implements the `UsageLedger` and `UserDirectory` seams from
//! `oddslab-core`.
//!
//! # Concurrency contract
//!
//! The usage row for a `(user_id, day)` pair is the only shared mutable
//! resource. Creation is race-safe through the composite primary key plus
//! `INSERT … ON CONFLICT DO NOTHING`; increments are single upsert
//! statements, so concurrent increments serialize in SQLite and none is
//! lost. There is deliberately no transaction spanning an access check and
//! the following increment.
//!
//! # Example
//!
//! ```no_run
//! use oddslab_core::{Feature, Tier, UserId};
//! use oddslab_store::SqliteStore;
//!
//! # async fn example() -> Result<(), oddslab_store::StoreError> {
//! let store = SqliteStore::open("/data/oddslab.db").await?;
//!
//! let user_id = UserId::generate();
//! store.create_user(user_id, Tier::Free).await?;
//!
//! let day = chrono::Utc::now().date_naive();
//! let record = store.increment_usage(user_id, day, Feature::ParlayEvaluations).await?;
//! assert_eq!(record.parlay_evaluations, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use sqlite::{SqliteStore, UserAccount};
