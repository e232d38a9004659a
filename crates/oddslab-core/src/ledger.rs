//! Storage seams for the gate.
//!
//! These traits abstract the persistence layer, allowing different
//! implementations (SQLite in production, in-memory for tests).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::feature::Feature;
use crate::ids::UserId;
use crate::tier::Tier;
use crate::usage::UsageRecord;

/// Durable per-user-per-day usage counters.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Fetch the record for `(user_id, day)`, creating a zeroed one if none
    /// exists.
    ///
    /// Must be idempotent under concurrent calls for the same key: backed
    /// by a unique constraint plus insert-on-conflict-do-nothing, never an
    /// application-level check-then-insert.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Store` if the store operation fails.
    async fn get_or_create(&self, user_id: UserId, day: NaiveDate) -> Result<UsageRecord>;

    /// Atomically add 1 to the feature's counter for that day, creating the
    /// record if absent, and return the updated record.
    ///
    /// Concurrent increments may exceed a limit that was checked earlier,
    /// but no increment is ever lost.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Store` if the store operation fails.
    async fn increment(&self, user_id: UserId, day: NaiveDate, feature: Feature)
        -> Result<UsageRecord>;

    /// Records with `day >= since`, newest first.
    ///
    /// Window clamping is the caller's job; the ledger returns exactly what
    /// is asked for.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Store` if the store operation fails.
    async fn history(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<UsageRecord>>;
}

/// Read-only view of the user directory.
///
/// The gate never mutates user records; registration and tier changes
/// belong to the account surface.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The user's current tier.
    ///
    /// # Errors
    ///
    /// Returns `GateError::UserNotFound` for an unknown user and
    /// `GateError::Store` if the store operation fails.
    async fn get_user_tier(&self, user_id: UserId) -> Result<Tier>;
}
