//! GlucoRisk Classifiers
//!
//! Loads a pre-trained binary classifier from disk and turns its output into
//! a risk assessment.
//!
//! Supported artifacts:
//! - XGBoost JSON tree ensembles with a logistic objective
//! - SafeTensors logistic heads, evaluated with Candle (`ml-models` feature)
//!
//! A model is loaded once at startup and shared read-only afterwards; every
//! call to [`Scorer::score`] is an independent, pure computation.

pub mod classifier;
#[cfg(feature = "ml-models")]
pub mod logistic;
pub mod model_loader;
pub mod scorer;
pub mod xgboost;

pub use classifier::{positive_class_probability, Classifier, ProbabilityMatrix, POSITIVE_CLASS};
#[cfg(feature = "ml-models")]
pub use logistic::LogisticHead;
pub use model_loader::{
    load, LoadedModel, ModelConfig, ModelFormat, ModelMetadata, DEFAULT_MODEL_PATH,
};
pub use scorer::Scorer;
pub use xgboost::XgboostClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, ProbabilityMatrix};
    pub use crate::model_loader::{LoadedModel, ModelConfig, ModelFormat};
    pub use crate::scorer::Scorer;
}
