//! Subscription tiers and their daily feature limits.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::feature::Feature;

/// A named subscription level.
///
/// Ordering follows price: `Free < Pro < Premium < Admin`. `Admin` is an
/// internal tier and is never offered as an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Free tier: limited daily usage of every feature.
    Free,

    /// Pro tier: unlimited daily usage.
    Pro,

    /// Premium tier: unlimited daily usage plus premium product features.
    Premium,

    /// Internal admin tier: unlimited everything, never recommended.
    Admin,
}

impl Tier {
    /// Tiers offered as upgrades, cheapest first.
    pub const UPGRADE_LADDER: [Self; 2] = [Self::Pro, Self::Premium];

    /// Get the tier name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Premium => "premium",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "premium" => Ok(Self::Premium),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// Error produced when parsing an unrecognized tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier: {0}")]
pub struct UnknownTier(pub String);

/// A daily limit: a finite non-negative count or unlimited.
///
/// Serializes as a JSON number, or the string `"unlimited"`; clients must
/// never see a finite number standing in for an absent cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// At most this many invocations per UTC day.
    Finite(i64),

    /// No daily cap.
    Unlimited,
}

impl Limit {
    /// Whether another invocation is allowed at the given used count.
    #[must_use]
    pub const fn allows(self, used: i64) -> bool {
        match self {
            Self::Finite(limit) => used < limit,
            Self::Unlimited => true,
        }
    }

    /// Remaining capacity at the given used count, floored at zero.
    #[must_use]
    pub const fn remaining_after(self, used: i64) -> Self {
        match self {
            Self::Finite(limit) => {
                let left = limit - used;
                Self::Finite(if left < 0 { 0 } else { left })
            }
            Self::Unlimited => Self::Unlimited,
        }
    }

    /// Whether this limit is unlimited.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_i64(*n),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(i64),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) if n >= 0 => Ok(Self::Finite(n)),
            Raw::Count(n) => Err(D::Error::custom(format!("negative limit: {n}"))),
            Raw::Word(w) if w == "unlimited" => Ok(Self::Unlimited),
            Raw::Word(w) => Err(D::Error::custom(format!("invalid limit: {w:?}"))),
        }
    }
}

/// Per-feature daily limits for one tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureLimits {
    /// Daily limit on parlay evaluations.
    pub parlay_evaluations: Limit,

    /// Daily limit on odds comparisons.
    pub odds_comparisons: Limit,
}

impl FeatureLimits {
    /// All features unlimited.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            parlay_evaluations: Limit::Unlimited,
            odds_comparisons: Limit::Unlimited,
        }
    }

    /// The limit for a single feature.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> Limit {
        match feature {
            Feature::ParlayEvaluations => self.parlay_evaluations,
            Feature::OddsComparisons => self.odds_comparisons,
        }
    }
}

/// The tier → per-feature daily limit table.
///
/// Built once at process start (from defaults or a JSON config file) and
/// handed to [`crate::TierGate`] by value; immutable at runtime. Every
/// (tier, feature) pair always has an entry; the table is total by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierLimits {
    free: FeatureLimits,
    pro: FeatureLimits,
    premium: FeatureLimits,
    admin: FeatureLimits,
}

impl TierLimits {
    /// The daily limit for a feature on a tier.
    #[must_use]
    pub const fn limit_for(&self, tier: Tier, feature: Feature) -> Limit {
        match tier {
            Tier::Free => self.free.get(feature),
            Tier::Pro => self.pro.get(feature),
            Tier::Premium => self.premium.get(feature),
            Tier::Admin => self.admin.get(feature),
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            free: FeatureLimits {
                parlay_evaluations: Limit::Finite(3),
                odds_comparisons: Limit::Finite(10),
            },
            pro: FeatureLimits::unlimited(),
            premium: FeatureLimits::unlimited(),
            admin: FeatureLimits::unlimited(),
        }
    }
}
