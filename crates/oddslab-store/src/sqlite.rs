//! SQLite store implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use oddslab_core::{Feature, Tier, UsageLedger, UsageRecord, UserDirectory, UserId};

use crate::error::{Result, StoreError};
use crate::schema;

/// Maximum pooled connections. SQLite allows a single writer; readers
/// share the WAL.
const MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_RECORD: &str = "\
SELECT user_id, day, parlay_evaluations, odds_comparisons
FROM usage_records WHERE user_id = ?1 AND day = ?2";

const INSERT_IGNORE_RECORD: &str = "\
INSERT INTO usage_records (user_id, day, parlay_evaluations, odds_comparisons)
VALUES (?1, ?2, 0, 0)
ON CONFLICT (user_id, day) DO NOTHING";

// One statement per feature column keeps the increment a single atomic
// upsert with no string splicing.
const INCREMENT_PARLAY: &str = "\
INSERT INTO usage_records (user_id, day, parlay_evaluations, odds_comparisons)
VALUES (?1, ?2, 1, 0)
ON CONFLICT (user_id, day) DO UPDATE SET parlay_evaluations = parlay_evaluations + 1
RETURNING user_id, day, parlay_evaluations, odds_comparisons";

const INCREMENT_ODDS: &str = "\
INSERT INTO usage_records (user_id, day, parlay_evaluations, odds_comparisons)
VALUES (?1, ?2, 0, 1)
ON CONFLICT (user_id, day) DO UPDATE SET odds_comparisons = odds_comparisons + 1
RETURNING user_id, day, parlay_evaluations, odds_comparisons";

const SELECT_HISTORY: &str = "\
SELECT user_id, day, parlay_evaluations, odds_comparisons
FROM usage_records WHERE user_id = ?1 AND day >= ?2
ORDER BY day DESC";

/// A registered user and their subscription tier.
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    /// The user ID.
    pub user_id: UserId,

    /// Current subscription tier.
    pub tier: Tier,

    /// When the user was registered.
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed store for users and usage records.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and run schema
    /// setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        for ddl in schema::all_tables() {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::debug!("Database schema ready");
        Ok(())
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Register a user with an initial tier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserAlreadyExists` if the user is already
    /// registered.
    pub async fn create_user(&self, user_id: UserId, tier: Tier) -> Result<UserAccount> {
        let created_at = Utc::now();
        sqlx::query("INSERT INTO users (user_id, tier, created_at) VALUES (?1, ?2, ?3)")
            .bind(user_id.to_string())
            .bind(tier.as_str())
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::UserAlreadyExists {
                        user_id: user_id.to_string(),
                    }
                }
                _ => StoreError::Database(e),
            })?;

        tracing::info!(user_id = %user_id, tier = %tier, "User registered");
        Ok(UserAccount {
            user_id,
            tier,
            created_at,
        })
    }

    /// Fetch a user record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if no such user exists.
    pub async fn get_user(&self, user_id: UserId) -> Result<UserAccount> {
        let row = sqlx::query("SELECT user_id, tier, created_at FROM users WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::UserNotFound {
                user_id: user_id.to_string(),
            })?;

        user_from_row(&row)
    }

    /// Change a user's tier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UserNotFound` if no such user exists.
    pub async fn set_user_tier(&self, user_id: UserId, tier: Tier) -> Result<()> {
        let result = sqlx::query("UPDATE users SET tier = ?1 WHERE user_id = ?2")
            .bind(tier.as_str())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound {
                user_id: user_id.to_string(),
            });
        }

        tracing::info!(user_id = %user_id, tier = %tier, "User tier updated");
        Ok(())
    }

    // =========================================================================
    // Usage Record Operations
    // =========================================================================

    /// Fetch the usage record for `(user_id, day)`, creating a zeroed row
    /// if none exists.
    ///
    /// Insert-on-conflict-do-nothing followed by a read: idempotent under
    /// concurrent calls for the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create_record(
        &self,
        user_id: UserId,
        day: NaiveDate,
    ) -> Result<UsageRecord> {
        sqlx::query(INSERT_IGNORE_RECORD)
            .bind(user_id.to_string())
            .bind(day)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query(SELECT_RECORD)
            .bind(user_id.to_string())
            .bind(day)
            .fetch_one(&self.pool)
            .await?;

        record_from_row(&row)
    }

    /// Atomically add 1 to `feature`'s counter for `(user_id, day)`,
    /// creating the row if absent, and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn increment_usage(
        &self,
        user_id: UserId,
        day: NaiveDate,
        feature: Feature,
    ) -> Result<UsageRecord> {
        let sql = match feature {
            Feature::ParlayEvaluations => INCREMENT_PARLAY,
            Feature::OddsComparisons => INCREMENT_ODDS,
        };

        let row = sqlx::query(sql)
            .bind(user_id.to_string())
            .bind(day)
            .fetch_one(&self.pool)
            .await?;

        record_from_row(&row)
    }

    /// Usage records with `day >= since`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn history_records(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<UsageRecord>> {
        let rows = sqlx::query(SELECT_HISTORY)
            .bind(user_id.to_string())
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<UsageRecord> {
    let user_id: String = row.try_get("user_id")?;
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|e| StoreError::Corrupt(format!("bad user_id: {e}")))?;

    Ok(UsageRecord {
        user_id,
        day: row.try_get("day")?,
        parlay_evaluations: row.try_get("parlay_evaluations")?,
        odds_comparisons: row.try_get("odds_comparisons")?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<UserAccount> {
    let user_id: String = row.try_get("user_id")?;
    let user_id = user_id
        .parse::<UserId>()
        .map_err(|e| StoreError::Corrupt(format!("bad user_id: {e}")))?;

    let tier: String = row.try_get("tier")?;
    let tier = tier
        .parse::<Tier>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;

    Ok(UserAccount {
        user_id,
        tier,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UsageLedger for SqliteStore {
    async fn get_or_create(
        &self,
        user_id: UserId,
        day: NaiveDate,
    ) -> oddslab_core::Result<UsageRecord> {
        Ok(self.get_or_create_record(user_id, day).await?)
    }

    async fn increment(
        &self,
        user_id: UserId,
        day: NaiveDate,
        feature: Feature,
    ) -> oddslab_core::Result<UsageRecord> {
        Ok(self.increment_usage(user_id, day, feature).await?)
    }

    async fn history(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> oddslab_core::Result<Vec<UsageRecord>> {
        Ok(self.history_records(user_id, since).await?)
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn get_user_tier(&self, user_id: UserId) -> oddslab_core::Result<Tier> {
        Ok(self.get_user(user_id).await?.tier)
    }
}
