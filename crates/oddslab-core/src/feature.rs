//! Gated feature keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// A rate-limited user action.
///
/// The set of features is closed: an unknown feature key is rejected at the
/// string boundary and cannot reach the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Evaluation of a parlay slip against current odds.
    ParlayEvaluations,

    /// Cross-book odds comparison for a single market.
    OddsComparisons,
}

impl Feature {
    /// All known features, in fixed priority order.
    ///
    /// This order is load-bearing: upgrade recommendations and usage
    /// snapshots list features in this order.
    pub const ALL: [Self; 2] = [Self::ParlayEvaluations, Self::OddsComparisons];

    /// Get the feature key as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParlayEvaluations => "parlay_evaluations",
            Self::OddsComparisons => "odds_comparisons",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parlay_evaluations" => Ok(Self::ParlayEvaluations),
            "odds_comparisons" => Ok(Self::OddsComparisons),
            other => Err(GateError::InvalidFeature {
                name: other.to_string(),
            }),
        }
    }
}
