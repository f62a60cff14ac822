//! Logistic classification head stored as SafeTensors
//!
//! Expects a `weight` tensor of shape `(2, n_features)` and a `bias` of shape
//! `(2)`. Probabilities are `softmax(x · weightᵀ + bias)`.

use crate::classifier::{Classifier, ProbabilityMatrix};
use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{Linear, VarBuilder};
use glucorisk_core::{Error, FeatureVector, Result, FEATURE_COUNT};
use std::path::Path;

const NUM_CLASSES: usize = 2;

pub struct LogisticHead {
    name: String,
    linear: Linear,
    device: Device,
    in_features: usize,
}

impl LogisticHead {
    /// Load weights from a SafeTensors file onto the CPU
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::Cpu;

        let tensors = candle_core::safetensors::load(path, &device)
            .map_err(|e| Error::corrupt(path, format!("Failed to load SafeTensors: {}", e)))?;

        let weight = tensors
            .get("weight")
            .ok_or_else(|| Error::corrupt(path, "missing 'weight' tensor"))?;
        let (out_features, in_features) = weight
            .dims2()
            .map_err(|e| Error::corrupt(path, format!("'weight' must be a matrix: {}", e)))?;
        if out_features != NUM_CLASSES {
            return Err(Error::corrupt(
                path,
                format!("'weight' has {} output classes, expected {}", out_features, NUM_CLASSES),
            ));
        }

        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        let linear = candle_nn::linear(in_features, NUM_CLASSES, vb)
            .map_err(|e| Error::corrupt(path, format!("Failed to build classification head: {}", e)))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("logistic")
            .to_string();

        Ok(Self {
            name,
            linear,
            device,
            in_features,
        })
    }

    /// Width of the weight matrix
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    fn forward(&self, rows: &[FeatureVector]) -> candle_core::Result<Vec<Vec<f32>>> {
        let data: Vec<f32> = rows.iter().flat_map(|row| row.to_array()).collect();
        let x = Tensor::from_vec(data, (rows.len(), FEATURE_COUNT), &self.device)?;
        let logits = self.linear.forward(&x)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?.to_vec2::<f32>()
    }
}

impl Classifier for LogisticHead {
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<ProbabilityMatrix> {
        if self.in_features != FEATURE_COUNT {
            return Err(Error::classifier(format!(
                "model '{}' expects {} features, feature vectors have {}",
                self.name, self.in_features, FEATURE_COUNT
            )));
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let probs = self
            .forward(rows)
            .map_err(|e| Error::classifier(format!("Inference failed: {}", e)))?;

        Ok(probs.into_iter().map(|p| [p[0], p[1]]).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
