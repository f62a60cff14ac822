//! Application configuration

use crate::cli::GlobalArgs;
use glucorisk_classifiers::ModelConfig;
use glucorisk_policy::RiskPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Classifier artifact
    #[serde(default)]
    pub model: ModelConfig,

    /// Risk policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Where the risk policy comes from and which profile is active
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Policy file; the built-in policy is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Threshold profile; the policy's own choice is kept when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &GlobalArgs) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            debug!(path = config_path, "Reading configuration file");
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid configuration {}: {}", config_path, e))?
        } else {
            Self::default()
        };

        if let Some(model) = &cli.model {
            config.model = ModelConfig::from_local(model);
        }

        if let Some(policy) = &cli.policy {
            config.policy.path = Some(policy.clone());
        }

        if let Some(profile) = &cli.profile {
            config.policy.profile = Some(profile.clone());
        }

        Ok(config)
    }

    /// Build the risk policy this configuration selects
    pub fn risk_policy(&self) -> glucorisk_core::Result<RiskPolicy> {
        let policy = match &self.policy.path {
            Some(path) => RiskPolicy::from_file(path)?,
            None => RiskPolicy::builtin()?,
        };

        match &self.policy.profile {
            Some(profile) => policy.with_profile(profile),
            None => Ok(policy),
        }
    }
}
