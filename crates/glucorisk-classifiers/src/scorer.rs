//! Risk scoring: classifier probability to tier and advice

use crate::classifier::{positive_class_probability, Classifier};
use crate::model_loader::LoadedModel;
use glucorisk_core::{FeatureVector, PatientInput, Result, RiskAssessment};
use glucorisk_policy::RiskPolicy;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Scores feature vectors against one classifier and one risk policy.
///
/// Holds no per-request state; the classifier is shared read-only, so a
/// scorer can be cloned or shared between threads freely.
#[derive(Clone)]
pub struct Scorer {
    model: Arc<dyn Classifier>,
    policy: RiskPolicy,
}

impl Scorer {
    /// Create a scorer from an already loaded classifier
    pub fn new(model: Arc<dyn Classifier>, policy: RiskPolicy) -> Self {
        Self { model, policy }
    }

    /// Create a scorer sharing the classifier of a loaded artifact
    pub fn from_loaded(loaded: &LoadedModel, policy: RiskPolicy) -> Self {
        Self::new(loaded.model(), policy)
    }

    /// Score one feature vector
    pub fn score(&self, features: &FeatureVector) -> Result<RiskAssessment> {
        let start = Instant::now();

        let matrix = self.model.predict_proba(std::slice::from_ref(features))?;
        let probability = positive_class_probability(&matrix)?;
        let (tier, advice) = self.policy.classify(probability);

        debug!(
            model = self.model.name(),
            probability,
            tier = %tier,
            latency_us = start.elapsed().as_micros() as u64,
            "Scored feature vector"
        );

        Ok(RiskAssessment::new(
            probability,
            tier,
            advice.label.as_str(),
            advice.advice.as_str(),
        ))
    }

    /// Validate raw values in classifier order, then score them
    pub fn score_values(&self, values: &[f32]) -> Result<RiskAssessment> {
        let features = FeatureVector::new(values)?;
        self.score(&features)
    }

    /// Encode form input, then score it
    pub fn score_input(&self, input: &PatientInput) -> Result<RiskAssessment> {
        let features = input.encode()?;
        self.score(&features)
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
