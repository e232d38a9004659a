//! Request and response types for the oddslab client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use oddslab_core::{Feature, Limit, Tier, UpgradeRecommendation, UsageRecord, UserId};

/// Request body for registering a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterUserRequest {
    /// Caller-supplied user ID; the server generates one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Starting tier; the server defaults to free when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

/// A registered user account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    /// The user's ID.
    pub user_id: UserId,
    /// The user's tier.
    pub tier: Tier,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Response from recording a feature invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackUsageResponse {
    /// Whether the invocation was recorded.
    pub success: bool,
    /// The feature that was tracked.
    pub feature: Feature,
    /// Invocations counted today, including this one.
    pub used: i64,
    /// The daily limit for the user's tier.
    pub limit: Limit,
    /// Capacity left today.
    pub remaining: Limit,
}

/// Response from the usage history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    /// The user the history belongs to.
    pub user_id: UserId,
    /// The window size actually applied, after clamping.
    pub days: i64,
    /// The oldest day covered by the window.
    pub since: NaiveDate,
    /// Number of days with recorded activity.
    pub total_days: usize,
    /// Records in descending day order; days without activity are absent.
    pub records: Vec<UsageRecord>,
}

/// Response from the recommendations endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    /// The user the recommendations are for.
    pub user_id: UserId,
    /// Suggested upgrades; empty when the user is unconstrained.
    pub recommendations: Vec<UpgradeRecommendation>,
}

/// Error response envelope from the API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// Error payload within an error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    pub details: Option<serde_json::Value>,
}
