//! Model artifact loading

use crate::classifier::Classifier;
use crate::xgboost::XgboostClassifier;
use glucorisk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Artifact path used when none is configured
pub const DEFAULT_MODEL_PATH: &str = "finalized_xgboost_model.json";

/// Model file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelFormat {
    /// XGBoost JSON model (`save_model("*.json")`)
    XgboostJson,
    /// SafeTensors logistic head
    #[serde(rename = "safetensors")]
    SafeTensors,
}

impl ModelFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::XgboostJson),
            "safetensors" => Some(Self::SafeTensors),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XgboostJson => "xgboost-json",
            Self::SafeTensors => "safetensors",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for loading a model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the artifact file
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Explicit format; inferred from the extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ModelFormat>,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            format: None,
        }
    }
}

impl ModelConfig {
    /// Create a new model configuration from local path
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    /// Set model format
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Format to load with, explicit or inferred
    pub fn resolve_format(&self) -> Result<ModelFormat> {
        self.format
            .or_else(|| ModelFormat::from_path(&self.path))
            .ok_or_else(|| {
                Error::corrupt(
                    &self.path,
                    "unsupported artifact format (expected .json or .safetensors)",
                )
            })
    }
}

/// Descriptive facts about a loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetadata {
    /// Model name, taken from the file stem
    pub name: String,

    pub format: ModelFormat,

    /// Format-specific details (tree count, base score, tensor shapes)
    pub details: Vec<(String, String)>,
}

/// A classifier loaded from disk, ready to be shared with a scorer
pub struct LoadedModel {
    model: Arc<dyn Classifier>,
    metadata: ModelMetadata,
    path: PathBuf,
}

impl LoadedModel {
    /// Load a model from configuration
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let start = Instant::now();
        let path = config.path.clone();

        if !path.exists() {
            return Err(Error::ArtifactNotFound(path));
        }

        let format = config.resolve_format()?;
        let (model, details) = match format {
            ModelFormat::XgboostJson => load_xgboost(&path)?,
            ModelFormat::SafeTensors => load_safetensors(&path)?,
        };

        let metadata = ModelMetadata {
            name: model.name().to_string(),
            format,
            details,
        };

        info!(
            path = %path.display(),
            format = %format,
            model = %metadata.name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded model artifact"
        );

        Ok(Self {
            model,
            metadata,
            path,
        })
    }

    /// Shared handle to the classifier
    pub fn model(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.model)
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .field("path", &self.path)
            .finish()
    }
}

/// Load a model artifact from a path, inferring its format
pub fn load(path: impl Into<PathBuf>) -> Result<LoadedModel> {
    LoadedModel::load(&ModelConfig::from_local(path))
}

type Loaded = (Arc<dyn Classifier>, Vec<(String, String)>);

fn load_xgboost(path: &Path) -> Result<Loaded> {
    let model = XgboostClassifier::from_file(path)?;

    let mut details = vec![
        ("objective".to_string(), model.objective().to_string()),
        ("trees".to_string(), model.tree_count().to_string()),
        ("base_score".to_string(), model.base_score().to_string()),
    ];
    if let Some(n) = model.declared_features() {
        details.push(("num_feature".to_string(), n.to_string()));
    }

    Ok((Arc::new(model), details))
}

#[cfg(feature = "ml-models")]
fn load_safetensors(path: &Path) -> Result<Loaded> {
    let model = crate::logistic::LogisticHead::from_file(path)?;
    let details = vec![
        ("weight".to_string(), format!("(2, {})", model.in_features())),
        ("bias".to_string(), "(2)".to_string()),
    ];
    Ok((Arc::new(model), details))
}

#[cfg(not(feature = "ml-models"))]
fn load_safetensors(path: &Path) -> Result<Loaded> {
    Err(Error::config(format!(
        "{} is a SafeTensors model but this build has no `ml-models` support",
        path.display()
    )))
}
