//! Core types for GlucoRisk

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 8;

/// A single model input, in the position the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Gender,
    Age,
    Hypertension,
    HeartDisease,
    SmokingHistory,
    Bmi,
    Hba1c,
    BloodGlucose,
}

/// Accepted values for a feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDomain {
    /// 0 or 1
    Binary,
    /// Integer code in `0..=max`
    Categorical { max: u8 },
    /// Any value in `[min, max]`
    Continuous { min: f32, max: f32 },
}

impl Feature {
    /// All features in vector order. Reordering this breaks every prediction.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Gender,
        Feature::Age,
        Feature::Hypertension,
        Feature::HeartDisease,
        Feature::SmokingHistory,
        Feature::Bmi,
        Feature::Hba1c,
        Feature::BloodGlucose,
    ];

    /// Position in the feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Field name used in messages and metadata
    pub fn name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Age => "age",
            Self::Hypertension => "hypertension",
            Self::HeartDisease => "heart_disease",
            Self::SmokingHistory => "smoking_history",
            Self::Bmi => "bmi",
            Self::Hba1c => "hba1c",
            Self::BloodGlucose => "blood_glucose",
        }
    }

    /// Declared domain, matching the ranges offered by the input form
    pub fn domain(self) -> FeatureDomain {
        match self {
            Self::Gender | Self::Hypertension | Self::HeartDisease => FeatureDomain::Binary,
            Self::SmokingHistory => FeatureDomain::Categorical { max: 2 },
            Self::Age => FeatureDomain::Continuous { min: 0.0, max: 100.0 },
            Self::Bmi => FeatureDomain::Continuous { min: 10.0, max: 50.0 },
            Self::Hba1c => FeatureDomain::Continuous { min: 3.0, max: 15.0 },
            Self::BloodGlucose => FeatureDomain::Continuous { min: 50.0, max: 400.0 },
        }
    }

    fn check(self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::invalid_features(format!(
                "{} must be a finite number, got {}",
                self.name(),
                value
            )));
        }

        let ok = match self.domain() {
            FeatureDomain::Binary => value == 0.0 || value == 1.0,
            FeatureDomain::Categorical { max } => {
                value.fract() == 0.0 && value >= 0.0 && value <= f32::from(max)
            }
            FeatureDomain::Continuous { min, max } => (min..=max).contains(&value),
        };

        if ok {
            Ok(())
        } else {
            Err(Error::invalid_features(format!(
                "{} = {} is outside {}",
                self.name(),
                value,
                self.domain()
            )))
        }
    }
}

impl fmt::Display for FeatureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "{{0, 1}}"),
            Self::Categorical { max } => write!(f, "{{0..={}}}", max),
            Self::Continuous { min, max } => write!(f, "[{}, {}]", min, max),
        }
    }
}

/// Fixed-order numeric encoding of one patient, as consumed by the classifier.
///
/// Only constructed through validating constructors, so a value of this type
/// always has exactly [`FEATURE_COUNT`] finite, in-range entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build a vector from raw values in [`Feature::ALL`] order
    pub fn new(values: &[f32]) -> Result<Self> {
        let values: [f32; FEATURE_COUNT] = values.try_into().map_err(|_| {
            Error::invalid_features(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                values.len()
            ))
        })?;

        for feature in Feature::ALL {
            feature.check(values[feature.index()])?;
        }

        Ok(Self { values })
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f32 {
        self.values[feature.index()]
    }

    /// Values in classifier order
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn to_array(&self) -> [f32; FEATURE_COUNT] {
        self.values
    }
}

/// Discrete risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of scoring one feature vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    probability: f32,
    tier: RiskTier,
    label: String,
    advice: String,
}

impl RiskAssessment {
    /// Create a new assessment
    pub fn new(
        probability: f32,
        tier: RiskTier,
        label: impl Into<String>,
        advice: impl Into<String>,
    ) -> Self {
        Self {
            probability,
            tier,
            label: label.into(),
            advice: advice.into(),
        }
    }

    /// Positive-class probability in `[0, 1]`
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn tier(&self) -> RiskTier {
        self.tier
    }

    /// Human readable tier label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Advisory text bound to the tier
    pub fn advice(&self) -> &str {
        &self.advice
    }
}
