//! Tier gating: translate a user's tier and today's usage into allow/deny
//! decisions and upgrade guidance.
//!
//! # Check-then-track protocol
//!
//! Request handlers call [`TierGate::check_feature_access`] before
//! performing a gated action and [`TierGate::track_feature_usage`] after it
//! succeeds. The two calls are not atomic with each other: two concurrent
//! requests can both pass a check with one unit of capacity left and both
//! track, leaving the day's count one over the nominal limit. The increment
//! itself is atomic, so no usage is ever lost. This soft-limit behavior is
//! the product contract; do not add cross-call locking here.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::{GateError, Result};
use crate::feature::Feature;
use crate::ids::UserId;
use crate::ledger::{UsageLedger, UserDirectory};
use crate::tier::{Limit, Tier, TierLimits};
use crate::usage::{AccessDecision, FeatureUsage, UpgradeRecommendation, UsageRecord, UsageStatus};

/// A feature counts as "near" its limit when this much or less remains.
/// One unit left is the last useful moment to surface an upgrade.
const NEAR_LIMIT_THRESHOLD: i64 = 1;

/// The tier-gating decision core.
///
/// Owns the immutable tier → limit table and consults the user directory
/// and usage ledger through trait seams.
pub struct TierGate {
    limits: TierLimits,
    ledger: Arc<dyn UsageLedger>,
    directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl TierGate {
    /// Create a gate over the given limit table, store seams, and clock.
    #[must_use]
    pub fn new(
        limits: TierLimits,
        ledger: Arc<dyn UsageLedger>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            limits,
            ledger,
            directory,
            clock,
        }
    }

    /// The limit table this gate enforces.
    #[must_use]
    pub const fn limits(&self) -> &TierLimits {
        &self.limits
    }

    /// Decide whether `user_id` may invoke `feature` right now.
    ///
    /// Always allowed for unlimited tiers; otherwise allowed iff today's
    /// count is below the tier's limit. The decision carries the tier, the
    /// limit, today's count, and the pre-increment remaining capacity.
    ///
    /// # Errors
    ///
    /// `GateError::UserNotFound` for unknown users; `GateError::Store` if
    /// the ledger fails.
    pub async fn check_feature_access(
        &self,
        user_id: UserId,
        feature: Feature,
    ) -> Result<AccessDecision> {
        let tier = self.directory.get_user_tier(user_id).await?;
        let record = self.ledger.get_or_create(user_id, self.today()).await?;

        let limit = self.limits.limit_for(tier, feature);
        let used = record.count(feature);
        let decision = AccessDecision {
            allowed: limit.allows(used),
            feature,
            tier,
            limit,
            used,
            remaining: limit.remaining_after(used),
        };

        tracing::debug!(
            user_id = %user_id,
            feature = %feature,
            tier = %tier,
            used = %used,
            allowed = %decision.allowed,
            "Feature access checked"
        );

        Ok(decision)
    }

    /// Convenience check for parlay evaluation.
    ///
    /// Returns (allowed, pre-increment remaining). A caller that goes on to
    /// track the usage must subtract one itself when reporting remaining
    /// capacity to the client.
    ///
    /// # Errors
    ///
    /// Same as [`Self::check_feature_access`].
    pub async fn can_evaluate_parlay(&self, user_id: UserId) -> Result<(bool, Limit)> {
        let decision = self
            .check_feature_access(user_id, Feature::ParlayEvaluations)
            .await?;
        Ok((decision.allowed, decision.remaining))
    }

    /// Convenience check for odds comparison.
    ///
    /// # Errors
    ///
    /// Same as [`Self::check_feature_access`].
    pub async fn can_compare_odds(&self, user_id: UserId) -> Result<(bool, Limit)> {
        let decision = self
            .check_feature_access(user_id, Feature::OddsComparisons)
            .await?;
        Ok((decision.allowed, decision.remaining))
    }

    /// Record one invocation of `feature` for `user_id` today.
    ///
    /// Unconditional: enforcement is the caller's responsibility via a
    /// preceding check. Returns the post-increment summary, whose
    /// `remaining` equals the pre-increment remaining minus one, floored at
    /// zero.
    ///
    /// # Errors
    ///
    /// `GateError::UserNotFound` for unknown users; `GateError::Store` if
    /// the ledger fails.
    pub async fn track_feature_usage(
        &self,
        user_id: UserId,
        feature: Feature,
    ) -> Result<FeatureUsage> {
        let tier = self.directory.get_user_tier(user_id).await?;
        let record = self.ledger.increment(user_id, self.today(), feature).await?;

        let limit = self.limits.limit_for(tier, feature);
        let used = record.count(feature);

        tracing::info!(
            user_id = %user_id,
            feature = %feature,
            tier = %tier,
            used = %used,
            "Feature usage tracked"
        );

        Ok(FeatureUsage {
            feature,
            used,
            limit,
            remaining: limit.remaining_after(used),
        })
    }

    /// Today's usage snapshot across every known feature.
    ///
    /// # Errors
    ///
    /// `GateError::UserNotFound` for unknown users; `GateError::Store` if
    /// the ledger fails.
    pub async fn get_usage_status(&self, user_id: UserId) -> Result<UsageStatus> {
        let tier = self.directory.get_user_tier(user_id).await?;
        let record = self.ledger.get_or_create(user_id, self.today()).await?;

        let features = Feature::ALL
            .iter()
            .map(|&feature| {
                let limit = self.limits.limit_for(tier, feature);
                let used = record.count(feature);
                FeatureUsage {
                    feature,
                    used,
                    limit,
                    remaining: limit.remaining_after(used),
                }
            })
            .collect();

        Ok(UsageStatus {
            user_id,
            tier,
            day: record.day,
            features,
        })
    }

    /// Usage records for `user_id` with `day >= since`, newest first.
    ///
    /// The caller (conventionally an HTTP handler) clamps the requested
    /// window before computing `since`.
    ///
    /// # Errors
    ///
    /// `GateError::UserNotFound` for unknown users; `GateError::Store` if
    /// the ledger fails.
    pub async fn usage_history(
        &self,
        user_id: UserId,
        since: NaiveDate,
    ) -> Result<Vec<UsageRecord>> {
        // Surfaces UserNotFound before touching the ledger.
        let _ = self.directory.get_user_tier(user_id).await?;
        self.ledger.history(user_id, since).await
    }

    /// Upgrade suggestions for features at or near their daily limit.
    ///
    /// When one tier lifts every current constraint, a single suggestion
    /// naming that tier and all constrained features is returned. Otherwise
    /// one suggestion per constrained feature, in [`Feature::ALL`] order.
    /// Empty when nothing is constrained.
    ///
    /// # Errors
    ///
    /// `GateError::UserNotFound` for unknown users; `GateError::Store` if
    /// the ledger fails.
    pub async fn get_upgrade_recommendations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UpgradeRecommendation>> {
        let tier = self.directory.get_user_tier(user_id).await?;
        let record = self.ledger.get_or_create(user_id, self.today()).await?;

        let constrained: Vec<Feature> = Feature::ALL
            .iter()
            .copied()
            .filter(|&feature| self.is_constrained(tier, feature, &record))
            .collect();

        if constrained.is_empty() {
            return Ok(Vec::new());
        }

        // Prefer the single cheapest tier that lifts every constraint.
        for candidate in Self::upgrades_from(tier) {
            if constrained
                .iter()
                .all(|&f| self.limits.limit_for(candidate, f).is_unlimited())
            {
                return Ok(vec![UpgradeRecommendation {
                    tier: candidate,
                    features: constrained,
                }]);
            }
        }

        // No single tier covers everything: recommend per feature.
        let mut recommendations = Vec::new();
        for feature in constrained {
            let lifted = Self::upgrades_from(tier)
                .find(|&t| self.limits.limit_for(t, feature).is_unlimited());
            if let Some(tier) = lifted {
                recommendations.push(UpgradeRecommendation {
                    tier,
                    features: vec![feature],
                });
            }
        }
        Ok(recommendations)
    }

    fn is_constrained(&self, tier: Tier, feature: Feature, record: &UsageRecord) -> bool {
        match self.limits.limit_for(tier, feature) {
            Limit::Finite(limit) => (limit - record.count(feature)).max(0) <= NEAR_LIMIT_THRESHOLD,
            Limit::Unlimited => false,
        }
    }

    /// Tiers above `tier` on the upgrade ladder, cheapest first.
    fn upgrades_from(tier: Tier) -> impl Iterator<Item = Tier> {
        Tier::UPGRADE_LADDER.into_iter().filter(move |&t| t > tier)
    }

    fn today(&self) -> NaiveDate {
        self.clock.today_utc()
    }
}

impl std::fmt::Debug for TierGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierGate")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;

    /// In-memory ledger mirroring the store's get-or-create/increment
    /// contract.
    #[derive(Default)]
    struct MemoryLedger {
        records: Mutex<HashMap<(UserId, NaiveDate), UsageRecord>>,
    }

    #[async_trait]
    impl UsageLedger for MemoryLedger {
        async fn get_or_create(&self, user_id: UserId, day: NaiveDate) -> Result<UsageRecord> {
            let mut records = self.records.lock().unwrap();
            Ok(records
                .entry((user_id, day))
                .or_insert_with(|| UsageRecord::new(user_id, day))
                .clone())
        }

        async fn increment(
            &self,
            user_id: UserId,
            day: NaiveDate,
            feature: Feature,
        ) -> Result<UsageRecord> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .entry((user_id, day))
                .or_insert_with(|| UsageRecord::new(user_id, day));
            match feature {
                Feature::ParlayEvaluations => record.parlay_evaluations += 1,
                Feature::OddsComparisons => record.odds_comparisons += 1,
            }
            Ok(record.clone())
        }

        async fn history(&self, user_id: UserId, since: NaiveDate) -> Result<Vec<UsageRecord>> {
            let records = self.records.lock().unwrap();
            let mut out: Vec<UsageRecord> = records
                .values()
                .filter(|r| r.user_id == user_id && r.day >= since)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.day.cmp(&a.day));
            Ok(out)
        }
    }

    struct MemoryDirectory {
        tiers: HashMap<UserId, Tier>,
    }

    #[async_trait]
    impl UserDirectory for MemoryDirectory {
        async fn get_user_tier(&self, user_id: UserId) -> Result<Tier> {
            self.tiers
                .get(&user_id)
                .copied()
                .ok_or_else(|| GateError::UserNotFound {
                    user_id: user_id.to_string(),
                })
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
    }

    fn gate_for(tier: Tier) -> (TierGate, UserId, Arc<FixedClock>) {
        let user_id = UserId::generate();
        let clock = Arc::new(FixedClock::new(day()));
        let directory = MemoryDirectory {
            tiers: HashMap::from([(user_id, tier)]),
        };
        let gate = TierGate::new(
            TierLimits::default(),
            Arc::new(MemoryLedger::default()),
            Arc::new(directory),
            clock.clone(),
        );
        (gate, user_id, clock)
    }

    #[tokio::test]
    async fn check_is_idempotent() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        let first = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        let second = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();

        assert_eq!(first.used, 0);
        assert_eq!(second.used, 0);
        assert_eq!(first.remaining, Limit::Finite(3));
    }

    #[tokio::test]
    async fn free_tier_allows_until_limit() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        for used in 0..3 {
            let decision = gate
                .check_feature_access(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
            assert!(decision.allowed, "should allow at count {used}");
            assert_eq!(decision.used, used);
            assert_eq!(decision.remaining, Limit::Finite(3 - used));

            gate.track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
        }

        // Scenario A: fourth check is denied with zero remaining.
        let decision = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.used, 3);
        assert_eq!(decision.remaining, Limit::Finite(0));
    }

    #[tokio::test]
    async fn track_reports_post_increment_remaining() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        let (allowed, before) = gate.can_evaluate_parlay(user).await.unwrap();
        assert!(allowed);
        assert_eq!(before, Limit::Finite(3));

        let summary = gate
            .track_feature_usage(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        assert_eq!(summary.used, 1);
        // Pre-increment remaining minus one.
        assert_eq!(summary.remaining, Limit::Finite(2));
    }

    #[tokio::test]
    async fn pro_tier_is_unlimited() {
        let (gate, user, _clock) = gate_for(Tier::Pro);

        // Scenario B.
        for _ in 0..1000 {
            let summary = gate
                .track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
            assert_eq!(summary.remaining, Limit::Unlimited);
        }

        let decision = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.used, 1000);
        assert!(decision.remaining.is_unlimited());
    }

    #[tokio::test]
    async fn features_are_counted_independently() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        gate.track_feature_usage(user, Feature::ParlayEvaluations)
            .await
            .unwrap();

        let (allowed, remaining) = gate.can_compare_odds(user).await.unwrap();
        assert!(allowed);
        assert_eq!(remaining, Limit::Finite(10));
    }

    #[tokio::test]
    async fn day_rollover_resets_counts() {
        let (gate, user, clock) = gate_for(Tier::Free);

        for _ in 0..3 {
            gate.track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
        }
        let exhausted = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        assert!(!exhausted.allowed);

        clock.advance_days(1);

        let fresh = gate
            .check_feature_access(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        assert!(fresh.allowed);
        assert_eq!(fresh.used, 0);
        assert_eq!(fresh.remaining, Limit::Finite(3));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (gate, _user, _clock) = gate_for(Tier::Free);
        let stranger = UserId::generate();

        let err = gate
            .check_feature_access(stranger, Feature::ParlayEvaluations)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::UserNotFound { .. }));

        let err = gate
            .track_feature_usage(stranger, Feature::OddsComparisons)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::UserNotFound { .. }));

        let err = gate.usage_history(stranger, day()).await.unwrap_err();
        assert!(matches!(err, GateError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn status_covers_all_features_in_order() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        gate.track_feature_usage(user, Feature::OddsComparisons)
            .await
            .unwrap();

        let status = gate.get_usage_status(user).await.unwrap();
        assert_eq!(status.tier, Tier::Free);
        assert_eq!(status.day, day());
        assert_eq!(status.features.len(), 2);
        assert_eq!(status.features[0].feature, Feature::ParlayEvaluations);
        assert_eq!(status.features[0].used, 0);
        assert_eq!(status.features[1].feature, Feature::OddsComparisons);
        assert_eq!(status.features[1].used, 1);
        assert_eq!(status.features[1].remaining, Limit::Finite(9));
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let (gate, user, clock) = gate_for(Tier::Free);

        gate.track_feature_usage(user, Feature::ParlayEvaluations)
            .await
            .unwrap();
        clock.advance_days(1);
        gate.track_feature_usage(user, Feature::ParlayEvaluations)
            .await
            .unwrap();

        let records = gate.usage_history(user, day()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].day > records[1].day);
    }

    #[tokio::test]
    async fn no_recommendations_when_unconstrained() {
        let (gate, user, _clock) = gate_for(Tier::Free);
        assert!(gate
            .get_upgrade_recommendations(user)
            .await
            .unwrap()
            .is_empty());

        let (gate, user, _clock) = gate_for(Tier::Pro);
        for _ in 0..50 {
            gate.track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
        }
        assert!(gate
            .get_upgrade_recommendations(user)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn single_constrained_feature_recommends_cheapest_tier() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        // Exhaust parlay evaluations; odds comparisons stay far from limit.
        for _ in 0..3 {
            gate.track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
        }

        let recs = gate.get_upgrade_recommendations(user).await.unwrap();
        assert_eq!(
            recs,
            vec![UpgradeRecommendation {
                tier: Tier::Pro,
                features: vec![Feature::ParlayEvaluations],
            }]
        );
    }

    #[tokio::test]
    async fn one_tier_covering_all_constraints_yields_single_recommendation() {
        let (gate, user, _clock) = gate_for(Tier::Free);

        for _ in 0..3 {
            gate.track_feature_usage(user, Feature::ParlayEvaluations)
                .await
                .unwrap();
        }
        // 9 of 10 used: remaining 1, which counts as near the limit.
        for _ in 0..9 {
            gate.track_feature_usage(user, Feature::OddsComparisons)
                .await
                .unwrap();
        }

        let recs = gate.get_upgrade_recommendations(user).await.unwrap();
        assert_eq!(
            recs,
            vec![UpgradeRecommendation {
                tier: Tier::Pro,
                features: vec![Feature::ParlayEvaluations, Feature::OddsComparisons],
            }]
        );
    }

    #[tokio::test]
    async fn admin_tier_never_recommended_or_constrained() {
        let (gate, user, _clock) = gate_for(Tier::Admin);
        for _ in 0..100 {
            gate.track_feature_usage(user, Feature::OddsComparisons)
                .await
                .unwrap();
        }
        assert!(gate
            .get_upgrade_recommendations(user)
            .await
            .unwrap()
            .is_empty());
    }
}
