//! Gating and usage handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use oddslab_core::{
    AccessDecision, Feature, Limit, UpgradeRecommendation, UsageRecord, UsageStatus, UserId,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::{parse_feature, parse_user_id};

// ============================================================================
// Constants
// ============================================================================

/// Default history window in days.
const HISTORY_DEFAULT_DAYS: i64 = 30;

/// Smallest accepted history window.
const HISTORY_MIN_DAYS: i64 = 1;

/// Largest accepted history window.
const HISTORY_MAX_DAYS: i64 = 90;

/// Check whether a user may invoke a feature right now.
///
/// Read-only: nothing is counted. Clients call this before performing the
/// gated action.
pub async fn check_access(
    State(state): State<Arc<AppState>>,
    Path((user_id, feature)): Path<(String, String)>,
) -> Result<Json<AccessDecision>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let feature = parse_feature(&feature)?;

    let decision = state.gate.check_feature_access(user_id, feature).await?;
    Ok(Json(decision))
}

/// Usage tracking response.
#[derive(Debug, Serialize)]
pub struct TrackUsageResponse {
    /// Whether the usage was recorded.
    pub success: bool,

    /// The feature that was used.
    pub feature: Feature,

    /// Today's count after this invocation.
    pub used: i64,

    /// The daily limit.
    pub limit: Limit,

    /// Capacity left today after this invocation.
    pub remaining: Limit,
}

/// Record one invocation of a gated feature.
///
/// The access check and the increment are two separate store operations;
/// two racing requests can both pass the check at one unit of remaining
/// capacity and leave the day one over its limit. Accepted soft-limit
/// behavior.
pub async fn track_usage(
    State(state): State<Arc<AppState>>,
    Path((user_id, feature)): Path<(String, String)>,
) -> Result<Json<TrackUsageResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    let feature = parse_feature(&feature)?;

    let decision = state.gate.check_feature_access(user_id, feature).await?;
    if !decision.allowed {
        tracing::debug!(
            user_id = %user_id,
            feature = %feature,
            used = %decision.used,
            "Usage rejected, daily limit reached"
        );
        let upgrade = state
            .gate
            .get_upgrade_recommendations(user_id)
            .await?
            .iter()
            .find(|rec| rec.features.contains(&feature))
            .map(|rec| rec.tier);
        return Err(ApiError::LimitReached { decision, upgrade });
    }

    let usage = state.gate.track_feature_usage(user_id, feature).await?;
    Ok(Json(TrackUsageResponse {
        success: true,
        feature: usage.feature,
        used: usage.used,
        limit: usage.limit,
        remaining: usage.remaining,
    }))
}

/// Today's usage snapshot for all features.
pub async fn usage_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UsageStatus>, ApiError> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Json(state.gate.get_usage_status(user_id).await?))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Requested window in days; clamped to [1, 90], default 30.
    pub days: Option<i64>,
}

/// Usage history response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// The user.
    pub user_id: UserId,

    /// The effective (clamped) window in days.
    pub days: i64,

    /// First day of the window (inclusive).
    pub since: NaiveDate,

    /// Number of days with recorded usage in the window.
    pub total_days: usize,

    /// Usage records, newest first.
    pub records: Vec<UsageRecord>,
}

/// Usage records for the requested window, newest first.
pub async fn usage_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    let days = params
        .days
        .unwrap_or(HISTORY_DEFAULT_DAYS)
        .clamp(HISTORY_MIN_DAYS, HISTORY_MAX_DAYS);
    let since = state.clock.today_utc() - Duration::days(days - 1);

    let records = state.gate.usage_history(user_id, since).await?;
    Ok(Json(HistoryResponse {
        user_id,
        days,
        since,
        total_days: records.len(),
        records,
    }))
}

/// Upgrade recommendations response.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    /// The user.
    pub user_id: UserId,

    /// Suggestions for constrained features; empty when nothing is
    /// constrained.
    pub recommendations: Vec<UpgradeRecommendation>,
}

/// Upgrade suggestions for features at or near their daily limit.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    let recommendations = state.gate.get_upgrade_recommendations(user_id).await?;
    Ok(Json(RecommendationsResponse {
        user_id,
        recommendations,
    }))
}
