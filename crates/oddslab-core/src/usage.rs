//! Usage records and gate decision types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::feature::Feature;
use crate::ids::UserId;
use crate::tier::{Limit, Tier};

/// Per-user-per-day feature counters.
///
/// At most one record exists per (user, day); both counters start at zero
/// on the first access of a new UTC day and only ever grow within that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// The user this record belongs to.
    pub user_id: UserId,

    /// The UTC calendar day.
    pub day: NaiveDate,

    /// Parlay evaluations performed on this day.
    pub parlay_evaluations: i64,

    /// Odds comparisons performed on this day.
    pub odds_comparisons: i64,
}

impl UsageRecord {
    /// A zeroed record for the given user and day.
    #[must_use]
    pub const fn new(user_id: UserId, day: NaiveDate) -> Self {
        Self {
            user_id,
            day,
            parlay_evaluations: 0,
            odds_comparisons: 0,
        }
    }

    /// The counter for a single feature.
    #[must_use]
    pub const fn count(&self, feature: Feature) -> i64 {
        match feature {
            Feature::ParlayEvaluations => self.parlay_evaluations,
            Feature::OddsComparisons => self.odds_comparisons,
        }
    }
}

/// The outcome of a feature-access check.
///
/// Produced per check, never persisted. `remaining` is the capacity left
/// *before* any increment the caller may perform next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the invocation may proceed.
    pub allowed: bool,

    /// The feature that was checked.
    pub feature: Feature,

    /// The user's tier at check time.
    pub tier: Tier,

    /// The tier's daily limit for this feature.
    pub limit: Limit,

    /// Invocations already counted today.
    pub used: i64,

    /// Capacity left today; the unlimited sentinel when no cap exists.
    pub remaining: Limit,
}

/// One feature's slice of a usage snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureUsage {
    /// The feature.
    pub feature: Feature,

    /// Invocations counted today.
    pub used: i64,

    /// The daily limit.
    pub limit: Limit,

    /// Capacity left today.
    pub remaining: Limit,
}

/// A per-feature snapshot of today's usage for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageStatus {
    /// The user.
    pub user_id: UserId,

    /// The user's tier.
    pub tier: Tier,

    /// The UTC day the snapshot covers.
    pub day: NaiveDate,

    /// One entry per known feature, in [`Feature::ALL`] order.
    pub features: Vec<FeatureUsage>,
}

/// A suggested tier upgrade for a usage-constrained user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRecommendation {
    /// The cheapest tier that lifts the listed constraints.
    pub tier: Tier,

    /// The constrained features this upgrade would unblock.
    pub features: Vec<Feature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_zeroed() {
        let record = UsageRecord::new(UserId::generate(), NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        for feature in Feature::ALL {
            assert_eq!(record.count(feature), 0);
        }
    }

    #[test]
    fn record_serializes_iso_date() {
        let record = UsageRecord::new(UserId::generate(), NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["day"], "2026-08-26");
    }
}
