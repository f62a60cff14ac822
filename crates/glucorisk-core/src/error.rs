//! Error types for GlucoRisk

use std::path::PathBuf;

/// Result type alias using GlucoRisk's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for GlucoRisk operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The classifier artifact does not exist at the configured path
    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// The artifact exists but could not be deserialized
    #[error("corrupt model artifact {}: {reason}", .path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    /// A feature vector is malformed or out of its declared range
    #[error("invalid feature vector: {0}")]
    InvalidFeatureVector(String),

    /// A categorical form value has no encoding
    #[error("unrecognized {field} '{value}' (expected one of: {expected})")]
    UnrecognizedCategory {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new corrupt artifact error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid feature vector error
    pub fn invalid_features(msg: impl Into<String>) -> Self {
        Self::InvalidFeatureVector(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error comes from user input and can be shown inline.
    ///
    /// Everything else is a startup or internal failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFeatureVector(_) | Self::UnrecognizedCategory { .. }
        )
    }
}
