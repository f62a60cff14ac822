//! GlucoRisk Core
//!
//! Core types and utilities shared across GlucoRisk components.
//!
//! This crate provides:
//! - The fixed-order feature vector consumed by the classifier
//! - Form input types and their training-time categorical encoding
//! - Risk tiers and the assessment returned by the scorer
//! - Error types and result handling

pub mod encoding;
pub mod error;
pub mod types;

pub use encoding::{Categorical, Gender, PatientInput, SmokingHistory, YesNo};
pub use error::{Error, Result};
pub use types::{Feature, FeatureDomain, FeatureVector, RiskAssessment, RiskTier, FEATURE_COUNT};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::encoding::{Categorical, Gender, PatientInput, SmokingHistory, YesNo};
    pub use crate::error::{Error, Result};
    pub use crate::types::{Feature, FeatureVector, RiskAssessment, RiskTier};
}
