//! Artifact loading integration tests
//!
//! Writes small model files to a temporary directory, loads them the way the
//! CLI does at startup and scores form input end to end.

use glucorisk_classifiers::{load, LoadedModel, ModelConfig, ModelFormat, Scorer};
use glucorisk_core::{Error, PatientInput, RiskTier};
use glucorisk_policy::RiskPolicy;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two trees: hba1c then glucose, and an age stump. base_score 0.5.
const RISK_MODEL: &str = r#"{
    "learner": {
        "attributes": {},
        "feature_names": [],
        "feature_types": [],
        "learner_model_param": {
            "base_score": "5E-1",
            "boost_from_average": "1",
            "num_class": "0",
            "num_feature": "8",
            "num_target": "1"
        },
        "objective": {
            "name": "binary:logistic",
            "reg_loss_param": { "scale_pos_weight": "1" }
        },
        "gradient_booster": {
            "name": "gbtree",
            "model": {
                "gbtree_model_param": { "num_parallel_tree": "1", "num_trees": "2" },
                "iteration_indptr": [0, 1, 2],
                "tree_info": [0, 0],
                "trees": [
                    {
                        "id": 0,
                        "tree_param": { "num_deleted": "0", "num_feature": "8", "num_nodes": "5", "size_leaf_vector": "1" },
                        "left_children": [1, 3, -1, -1, -1],
                        "right_children": [2, 4, -1, -1, -1],
                        "parents": [2147483647, 0, 0, 1, 1],
                        "split_indices": [6, 7, 0, 0, 0],
                        "split_conditions": [6.7, 200.0, 2.0, -2.5, 0.5],
                        "split_type": [0, 0, 0, 0, 0],
                        "default_left": [0, 0, 0, 0, 0],
                        "base_weights": [0.0, -1.0, 2.0, -2.5, 0.5],
                        "loss_changes": [120.5, 40.25, 0.0, 0.0, 0.0],
                        "sum_hessian": [100.0, 60.0, 40.0, 45.0, 15.0],
                        "categories": [],
                        "categories_nodes": [],
                        "categories_segments": [],
                        "categories_sizes": []
                    },
                    {
                        "id": 1,
                        "tree_param": { "num_deleted": "0", "num_feature": "8", "num_nodes": "3", "size_leaf_vector": "1" },
                        "left_children": [1, -1, -1],
                        "right_children": [2, -1, -1],
                        "parents": [2147483647, 0, 0],
                        "split_indices": [1, 0, 0],
                        "split_conditions": [45.0, -0.3, 0.4],
                        "split_type": [0, 0, 0],
                        "default_left": [1, 0, 0],
                        "base_weights": [0.0, -0.3, 0.4],
                        "loss_changes": [12.0, 0.0, 0.0],
                        "sum_hessian": [100.0, 55.0, 45.0],
                        "categories": [],
                        "categories_nodes": [],
                        "categories_segments": [],
                        "categories_sizes": []
                    }
                ]
            }
        }
    },
    "version": [2, 0, 3]
}"#;

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn scorer_for(path: &Path, policy: RiskPolicy) -> Scorer {
    let loaded = load(path).unwrap();
    Scorer::from_loaded(&loaded, policy)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[test]
fn test_load_xgboost_metadata() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "finalized_xgboost_model.json", RISK_MODEL.as_bytes());

    let loaded = load(&path).unwrap();
    let metadata = loaded.metadata();
    assert_eq!(metadata.name, "finalized_xgboost_model");
    assert_eq!(metadata.format, ModelFormat::XgboostJson);
    assert!(metadata
        .details
        .contains(&("trees".to_string(), "2".to_string())));
    assert!(metadata
        .details
        .contains(&("objective".to_string(), "binary:logistic".to_string())));
    assert_eq!(loaded.path(), path.as_path());
}

#[test]
fn test_score_default_form() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.json", RISK_MODEL.as_bytes());
    let scorer = scorer_for(&path, RiskPolicy::builtin().unwrap());

    // hba1c 5.5, glucose 100, age 25 -> -2.5 - 0.3
    let assessment = scorer.score_input(&PatientInput::default()).unwrap();
    assert!((assessment.probability() - sigmoid(-2.8)).abs() < 1e-5);
    assert_eq!(assessment.tier(), RiskTier::Low);
    assert_eq!(assessment.label(), "Low Risk of having diabetes");
}

#[test]
fn test_score_each_tier() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.json", RISK_MODEL.as_bytes());
    let scorer = scorer_for(&path, RiskPolicy::builtin().unwrap());

    let medium = PatientInput {
        age: 60,
        ..Default::default()
    };
    let assessment = scorer.score_input(&medium).unwrap();
    assert!((assessment.probability() - sigmoid(-2.1)).abs() < 1e-5);
    assert_eq!(assessment.tier(), RiskTier::Medium);

    let high = PatientInput {
        age: 60,
        hba1c: 7.5,
        ..Default::default()
    };
    let assessment = scorer.score_input(&high).unwrap();
    assert!((assessment.probability() - sigmoid(2.4)).abs() < 1e-5);
    assert_eq!(assessment.tier(), RiskTier::High);
    assert!(assessment.advice().contains("Medical Consultation"));
}

#[test]
fn test_profile_changes_tier_not_probability() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.json", RISK_MODEL.as_bytes());

    // hba1c 5.5, glucose 250, age 60 -> 0.5 + 0.4
    let input = PatientInput {
        age: 60,
        blood_glucose: 250.0,
        ..Default::default()
    };

    let standard = scorer_for(&path, RiskPolicy::builtin().unwrap())
        .score_input(&input)
        .unwrap();
    let wide = scorer_for(&path, RiskPolicy::builtin().unwrap().with_profile("wide").unwrap())
        .score_input(&input)
        .unwrap();

    assert_eq!(standard.probability(), wide.probability());
    assert_eq!(standard.tier(), RiskTier::High);
    assert_eq!(wide.tier(), RiskTier::Medium);
}

#[test]
fn test_missing_artifact() {
    let dir = TempDir::new().unwrap();
    let err = load(dir.path().join("finalized_xgboost_model.json")).unwrap_err();
    assert!(matches!(err, Error::ArtifactNotFound(_)));
    assert!(!err.is_validation());
}

#[test]
fn test_pickle_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.json", b"\x80\x04\x95\x10\x00\x00\x00xgboost.sklearn");

    let err = load(&path).unwrap_err();
    match err {
        Error::CorruptArtifact { path: p, reason } => {
            assert_eq!(p, path);
            assert!(reason.contains("invalid XGBoost JSON"));
        }
        other => panic!("Expected CorruptArtifact, got {:?}", other),
    }
}

#[test]
fn test_truncated_json_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.json", &RISK_MODEL.as_bytes()[..RISK_MODEL.len() / 2]);

    let err = load(&path).unwrap_err();
    assert!(matches!(err, Error::CorruptArtifact { .. }));
}

#[test]
fn test_unreadable_artifact_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("finalized_xgboost_model.json");
    std::fs::create_dir(&path).unwrap();

    let err = load(&path).unwrap_err();
    match err {
        Error::CorruptArtifact { path: p, reason } => {
            assert_eq!(p, path);
            assert!(reason.contains("cannot read artifact"));
        }
        other => panic!("Expected CorruptArtifact, got {:?}", other),
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "finalized_xgboost_model.sav", b"pickle");

    let err = load(&path).unwrap_err();
    assert!(matches!(err, Error::CorruptArtifact { .. }));
    assert!(err.to_string().contains("unsupported artifact format"));
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "model.bin", RISK_MODEL.as_bytes());

    let config = ModelConfig::from_local(&path).with_format(ModelFormat::XgboostJson);
    let loaded = LoadedModel::load(&config).unwrap();
    assert_eq!(loaded.metadata().format, ModelFormat::XgboostJson);
}

#[cfg(feature = "ml-models")]
#[test]
fn test_safetensors_head_end_to_end() {
    use candle_core::{Device, Tensor};
    use std::collections::HashMap;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("risk_head.safetensors");

    // positive logit = hba1c - 7, negative logit = 0
    let device = Device::Cpu;
    let mut weight = vec![0.0f32; 16];
    weight[8 + 6] = 1.0;
    let mut tensors = HashMap::new();
    tensors.insert("weight", Tensor::from_vec(weight, (2, 8), &device).unwrap());
    tensors.insert("bias", Tensor::from_vec(vec![0.0f32, -7.0], 2, &device).unwrap());
    candle_core::safetensors::save(&tensors, &path).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.metadata().format, ModelFormat::SafeTensors);

    let scorer = Scorer::from_loaded(&loaded, RiskPolicy::builtin().unwrap());
    let assessment = scorer
        .score_input(&PatientInput {
            hba1c: 7.0,
            ..Default::default()
        })
        .unwrap();
    assert!((assessment.probability() - 0.5).abs() < 1e-5);
    assert_eq!(assessment.tier(), RiskTier::High);
}

mod properties {
    use super::*;
    use glucorisk_core::{Gender, SmokingHistory, YesNo};
    use proptest::prelude::*;

    prop_compose! {
        fn form_input()(
            female in any::<bool>(),
            age in 0u8..=100,
            hypertension in any::<bool>(),
            smoking in 0usize..3,
            bmi in 10.0f32..=50.0,
            hba1c in 3.0f32..=15.0,
            blood_glucose in 50.0f32..=400.0,
        ) -> PatientInput {
            PatientInput {
                gender: if female { Gender::Female } else { Gender::Male },
                age,
                hypertension: if hypertension { YesNo::Yes } else { YesNo::No },
                heart_disease: YesNo::No,
                smoking_history: [
                    SmokingHistory::CurrentSmoker,
                    SmokingHistory::NonSmoker,
                    SmokingHistory::PastSmoker,
                ][smoking],
                bmi,
                hba1c,
                blood_glucose,
            }
        }
    }

    proptest! {
        #[test]
        fn tier_follows_probability(input in form_input()) {
            let dir = TempDir::new().unwrap();
            let path = write(&dir, "model.json", RISK_MODEL.as_bytes());
            let policy = RiskPolicy::builtin().unwrap();
            let scorer = scorer_for(&path, policy.clone());

            let assessment = scorer.score_input(&input).unwrap();
            let p = assessment.probability();
            prop_assert!((0.0..=1.0).contains(&p));
            prop_assert_eq!(assessment.tier(), policy.thresholds().tier_for(p));
            prop_assert_eq!(assessment.advice(), policy.advice_for(assessment.tier()).advice.as_str());
        }
    }
}
