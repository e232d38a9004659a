//! Database schema definitions.
//!
//! Two tables back the store:
//!
//! - `users`: one row per registered user carrying the subscription tier.
//! - `usage_records`: one row per (user, UTC day) with a counter column
//!   per gated feature. The composite primary key is what makes
//!   get-or-create idempotent under concurrent requests.

/// DDL for the `users` table.
pub const CREATE_USERS: &str = "\
CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    tier       TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// DDL for the `usage_records` table.
pub const CREATE_USAGE_RECORDS: &str = "\
CREATE TABLE IF NOT EXISTS usage_records (
    user_id            TEXT NOT NULL,
    day                TEXT NOT NULL,
    parlay_evaluations INTEGER NOT NULL DEFAULT 0,
    odds_comparisons   INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, day)
)";

/// All DDL statements, in creation order.
#[must_use]
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_USERS, CREATE_USAGE_RECORDS]
}
