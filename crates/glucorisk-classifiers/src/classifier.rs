//! Classifier trait and common types

use glucorisk_core::{Error, FeatureVector, Result};

/// Per-row class probabilities: column 0 is the negative class, column 1 the
/// positive class.
pub type ProbabilityMatrix = Vec<[f32; 2]>;

/// Index of the positive class in a [`ProbabilityMatrix`] row
pub const POSITIVE_CLASS: usize = 1;

/// A loaded, read-only binary classifier
pub trait Classifier: Send + Sync {
    /// Estimate class probabilities, one output row per input row
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<ProbabilityMatrix>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Positive-class probability of the first row.
///
/// Fails when the model produced no rows or a value outside `[0, 1]`.
pub fn positive_class_probability(matrix: &[[f32; 2]]) -> Result<f32> {
    let row = matrix
        .first()
        .ok_or_else(|| Error::classifier("model returned an empty probability matrix"))?;

    let probability = row[POSITIVE_CLASS];
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(Error::classifier(format!(
            "positive-class probability {} is outside [0, 1]",
            probability
        )));
    }

    Ok(probability)
}

/// Logistic link
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
