//! Risk policy document

use crate::thresholds::ThresholdPolicy;
use glucorisk_core::{Error, Result, RiskTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Policy compiled into the binary
const DEFAULT_POLICY: &str = include_str!("../policies/default.yaml");

/// Name of the canonical threshold profile
pub const STANDARD_PROFILE: &str = "standard";

/// Label and advisory text shown for a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierAdvice {
    /// Short tier label, e.g. "High Risk of having Diabetes"
    pub label: String,

    /// Advisory text, may span several lines
    pub advice: String,
}

/// Advice for every tier. All three entries are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierTable {
    pub low: TierAdvice,
    pub medium: TierAdvice,
    pub high: TierAdvice,
}

impl TierTable {
    pub fn get(&self, tier: RiskTier) -> &TierAdvice {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Medium => &self.medium,
            RiskTier::High => &self.high,
        }
    }
}

/// On-disk shape of a policy
#[derive(Debug, Clone, Deserialize)]
struct PolicyDocument {
    name: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    version: String,

    #[serde(default = "default_profile")]
    profile: String,

    profiles: BTreeMap<String, ThresholdPolicy>,

    tiers: TierTable,
}

fn default_profile() -> String {
    STANDARD_PROFILE.to_string()
}

/// A validated risk policy with one active threshold profile
#[derive(Debug, Clone, PartialEq)]
pub struct RiskPolicy {
    name: String,
    description: String,
    version: String,
    profile: String,
    thresholds: ThresholdPolicy,
    profiles: BTreeMap<String, ThresholdPolicy>,
    tiers: TierTable,
}

impl RiskPolicy {
    /// Load a policy from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: PolicyDocument = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse risk policy: {}", e)))?;
        Self::from_document(document)
    }

    /// Load a policy from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read risk policy {}: {}",
                path.display(),
                e
            ))
        })?;
        let policy = Self::from_yaml(&content)?;
        debug!(path = %path.display(), profile = %policy.profile, "Loaded risk policy");
        Ok(policy)
    }

    /// The policy shipped with GlucoRisk
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(DEFAULT_POLICY)
    }

    fn from_document(document: PolicyDocument) -> Result<Self> {
        let thresholds = lookup_profile(&document.profiles, &document.profile)?;

        Ok(Self {
            name: document.name,
            description: document.description,
            version: document.version,
            profile: document.profile,
            thresholds,
            profiles: document.profiles,
            tiers: document.tiers,
        })
    }

    /// Switch the active threshold profile
    pub fn with_profile(mut self, name: &str) -> Result<Self> {
        self.thresholds = lookup_profile(&self.profiles, name)?;
        self.profile = name.to_string();
        Ok(self)
    }

    /// Replace the active cut points with ad-hoc values
    pub fn with_thresholds(mut self, thresholds: ThresholdPolicy) -> Self {
        self.thresholds = thresholds;
        self.profile = "custom".to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the active profile
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Names of all declared profiles
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Active cut points
    pub fn thresholds(&self) -> ThresholdPolicy {
        self.thresholds
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn advice_for(&self, tier: RiskTier) -> &TierAdvice {
        self.tiers.get(tier)
    }

    pub fn label_for(&self, tier: RiskTier) -> &str {
        &self.tiers.get(tier).label
    }

    /// Tier and advice for a probability in `[0, 1]`
    pub fn classify(&self, probability: f32) -> (RiskTier, &TierAdvice) {
        let tier = self.thresholds.tier_for(probability);
        (tier, self.tiers.get(tier))
    }
}

fn lookup_profile(
    profiles: &BTreeMap<String, ThresholdPolicy>,
    name: &str,
) -> Result<ThresholdPolicy> {
    profiles.get(name).copied().ok_or_else(|| {
        Error::config(format!(
            "Threshold profile '{}' not found (available: {})",
            name,
            profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        ))
    })
}
