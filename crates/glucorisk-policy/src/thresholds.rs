//! Tier cut points

use glucorisk_core::{Error, RiskTier};
use serde::{Deserialize, Serialize};

/// Two cut points splitting `[0, 1]` into Low, Medium and High.
///
/// Always satisfies `0 < low < high <= 1`; deserialization goes through
/// [`ThresholdPolicy::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CutPoints", into = "CutPoints")]
pub struct ThresholdPolicy {
    low: f32,
    high: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CutPoints {
    low: f32,
    high: f32,
}

impl ThresholdPolicy {
    /// Cut points of the `standard` profile
    pub const STANDARD: ThresholdPolicy = ThresholdPolicy {
        low: 0.10,
        high: 0.35,
    };

    /// Cut points of the `wide` profile
    pub const WIDE: ThresholdPolicy = ThresholdPolicy {
        low: 0.20,
        high: 0.80,
    };

    /// Create a validated pair of cut points
    pub fn new(low: f32, high: f32) -> Result<Self, Error> {
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::config(format!(
                "cut points must be finite (low = {}, high = {})",
                low, high
            )));
        }
        if !(low > 0.0 && low < high && high <= 1.0) {
            return Err(Error::config(format!(
                "cut points must satisfy 0 < low < high <= 1 (low = {}, high = {})",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// Lower cut point: first probability that is Medium
    pub fn low(&self) -> f32 {
        self.low
    }

    /// Upper cut point: first probability that is High
    pub fn high(&self) -> f32 {
        self.high
    }

    /// Tier for a probability in `[0, 1]`
    pub fn tier_for(&self, probability: f32) -> RiskTier {
        if probability < self.low {
            RiskTier::Low
        } else if probability < self.high {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }
}

impl TryFrom<CutPoints> for ThresholdPolicy {
    type Error = Error;

    fn try_from(points: CutPoints) -> Result<Self, Error> {
        Self::new(points.low, points.high)
    }
}

impl From<ThresholdPolicy> for CutPoints {
    fn from(policy: ThresholdPolicy) -> Self {
        Self {
            low: policy.low,
            high: policy.high,
        }
    }
}
