//! Gradient-boosted tree ensembles saved with XGBoost's JSON model format
//!
//! Only what binary prediction needs is read: the trees of a `gbtree`
//! booster, the base score and the objective. Training parameters and the
//! rest of the learner configuration are ignored.

use crate::classifier::{sigmoid, Classifier, ProbabilityMatrix};
use glucorisk_core::{Error, FeatureVector, Result, FEATURE_COUNT};
use serde::Deserialize;
use std::path::Path;

/// Objectives whose output is a probability through the logistic link
const LOGISTIC_OBJECTIVES: &[&str] = &["binary:logistic", "reg:logistic"];

#[derive(Debug, Deserialize)]
struct XgbDocument {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    learner_model_param: LearnerModelParam,
    objective: Objective,
    gradient_booster: GradientBooster,
}

/// XGBoost stores these numbers as strings
#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    #[serde(default)]
    num_class: Option<String>,
    #[serde(default)]
    num_feature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
enum GradientBooster {
    Gbtree { model: GbTreeModel },
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    trees: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<u8>,
}

/// `default_left` is written as 0/1 by some versions and as booleans by others
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f32),
}

/// One regression tree, nodes indexed from the root at 0
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_raw(raw: RawTree, index: usize) -> std::result::Result<Self, String> {
        let n = raw.left_children.len();
        if n == 0 {
            return Err(format!("tree {} has no nodes", index));
        }

        let lengths = [
            raw.right_children.len(),
            raw.split_indices.len(),
            raw.split_conditions.len(),
            raw.default_left.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(format!("tree {} has node arrays of different lengths", index));
        }
        if raw.split_type.iter().any(|&t| t != 0) {
            return Err(format!("tree {} uses categorical splits, which are not supported", index));
        }

        let child = |value: i64| -> std::result::Result<usize, String> {
            usize::try_from(value)
                .ok()
                .filter(|&c| c < n)
                .ok_or_else(|| format!("tree {} references node {} out of {}", index, value, n))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let node = if raw.left_children[i] == -1 {
                Node::Leaf(raw.split_conditions[i])
            } else {
                let feature = usize::try_from(raw.split_indices[i]).map_err(|_| {
                    format!("tree {} node {} has a negative split index", index, i)
                })?;
                Node::Split {
                    feature,
                    threshold: raw.split_conditions[i],
                    left: child(raw.left_children[i])?,
                    right: child(raw.right_children[i])?,
                    default_left: raw.default_left[i].is_set(),
                }
            };
            nodes.push(node);
        }

        let tree = Self { nodes };
        tree.check_reachability(index)?;
        Ok(tree)
    }

    /// Every node reachable from the root must be reached exactly once
    fn check_reachability(&self, index: usize) -> std::result::Result<(), String> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![0usize];

        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut visited[id], true) {
                return Err(format!("tree {} reaches node {} twice", index, id));
            }
            if let Node::Split { left, right, .. } = self.nodes[id] {
                stack.push(left);
                stack.push(right);
            }
        }
        Ok(())
    }

    fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf(_) => None,
            })
            .max()
    }

    fn leaf_value(&self, row: &[f32]) -> f32 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = row.get(feature).copied().unwrap_or(f32::NAN);
                    id = if value.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if value < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// A binary tree-ensemble classifier with a logistic output
#[derive(Debug, Clone)]
pub struct XgboostClassifier {
    name: String,
    objective: String,
    base_score: f32,
    base_margin: f32,
    declared_features: Option<usize>,
    max_feature: Option<usize>,
    trees: Vec<Tree>,
}

impl XgboostClassifier {
    /// Load a model from a JSON file written by `save_model`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ArtifactNotFound(path.to_path_buf()),
            _ => Error::corrupt(path, format!("cannot read artifact: {}", e)),
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("xgboost")
            .to_string();
        Self::from_slice(&bytes, name).map_err(|reason| Error::corrupt(path, reason))
    }

    /// Parse a model from JSON bytes. The error is a human readable reason.
    pub fn from_slice(bytes: &[u8], name: impl Into<String>) -> std::result::Result<Self, String> {
        let document: XgbDocument =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid XGBoost JSON: {}", e))?;
        let learner = document.learner;

        let objective = learner.objective.name;
        if !LOGISTIC_OBJECTIVES.contains(&objective.as_str()) {
            return Err(format!(
                "objective '{}' does not produce probabilities (expected one of: {})",
                objective,
                LOGISTIC_OBJECTIVES.join(", ")
            ));
        }

        let params = learner.learner_model_param;
        let num_class = parse_param(params.num_class.as_deref().unwrap_or("0"))?;
        if num_class > 1.0 {
            return Err(format!(
                "model has {} classes, expected a binary classifier",
                num_class
            ));
        }

        let base_score = parse_param(&params.base_score)?;
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(format!(
                "base_score {} is not a probability in (0, 1)",
                base_score
            ));
        }
        let base_margin = (base_score / (1.0 - base_score)).ln();

        let declared_features = params
            .num_feature
            .as_deref()
            .map(parse_param)
            .transpose()?
            .map(|n| n as usize);

        let GradientBooster::Gbtree { model } = learner.gradient_booster;
        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Tree::from_raw(raw, i))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let max_feature = trees.iter().filter_map(Tree::max_feature).max();

        Ok(Self {
            name: name.into(),
            objective,
            base_score,
            base_margin,
            declared_features,
            max_feature,
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Base score as stored in the model, a probability
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// `num_feature` recorded by XGBoost, if any
    pub fn declared_features(&self) -> Option<usize> {
        self.declared_features
    }

    /// Raw score before the logistic link.
    ///
    /// Features past the end of `row` count as missing and follow each
    /// split's default direction.
    pub fn margin(&self, row: &[f32]) -> f32 {
        self.base_margin + self.trees.iter().map(|tree| tree.leaf_value(row)).sum::<f32>()
    }
}

impl Classifier for XgboostClassifier {
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<ProbabilityMatrix> {
        if let Some(max) = self.max_feature {
            if max >= FEATURE_COUNT {
                return Err(Error::classifier(format!(
                    "model '{}' splits on feature {} but feature vectors have {} entries",
                    self.name, max, FEATURE_COUNT
                )));
            }
        }

        Ok(rows
            .iter()
            .map(|row| {
                let p = sigmoid(self.margin(row.as_slice()));
                [1.0 - p, p]
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse a numeric learner parameter such as `"5E-1"` or `"[5E-1]"`
fn parse_param(value: &str) -> std::result::Result<f32, String> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<f32>()
        .map_err(|_| format!("cannot parse model parameter '{}'", value))
}
