//! Startup model provisioning
//!
//! The service holds exactly one model for its whole lifetime. It comes from
//! a persisted artifact when one can be loaded, otherwise it is fitted on the
//! iris reference dataset with fixed hyperparameters.

use super::artifact::load_artifact;
use super::dataset::{iris_split, DatasetSplit};
use super::forest::{ForestParams, RandomForest};
use super::ModelError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Artifact location relative to the working directory
pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/rf_iris.json";

/// Seed shared by the dataset split and the forest
pub const FALLBACK_SEED: u64 = 42;

/// Share of the reference dataset held out from fallback training
pub const FALLBACK_TEST_RATIO: f64 = 0.2;

/// Trees in the fallback forest
pub const FALLBACK_TREES: usize = 10;

/// Constants for fallback training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackParams {
    pub test_ratio: f64,
    pub seed: u64,
    pub n_estimators: usize,
}

impl Default for FallbackParams {
    fn default() -> Self {
        Self {
            test_ratio: FALLBACK_TEST_RATIO,
            seed: FALLBACK_SEED,
            n_estimators: FALLBACK_TREES,
        }
    }
}

/// A freshly fitted fallback model and the split it was fitted on
#[derive(Debug, Clone)]
pub struct FallbackModel {
    pub model: RandomForest,
    /// The held-out rows are kept alongside the model but never evaluated
    /// on the serving path.
    pub split: DatasetSplit,
}

/// Where the served model came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    Artifact { path: PathBuf, checksum: String },
    Fallback { train_samples: usize, holdout_samples: usize },
}

impl ModelSource {
    pub fn label(&self) -> &'static str {
        match self {
            ModelSource::Artifact { .. } => "artifact",
            ModelSource::Fallback { .. } => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ModelSource::Fallback { .. })
    }
}

/// The model chosen at startup
#[derive(Debug, Clone)]
pub struct ProvidedModel {
    pub model: RandomForest,
    pub source: ModelSource,
}

/// Fit a forest on the iris reference dataset
pub fn train_fallback(params: &FallbackParams) -> Result<FallbackModel, ModelError> {
    let split = iris_split(params.test_ratio, params.seed);
    let model = RandomForest::fit(
        &split.train_records,
        &split.train_targets,
        ForestParams::new(params.n_estimators, params.seed),
    )?;

    Ok(FallbackModel { model, split })
}

/// Load the artifact at `path`, or fall back to training with default constants
pub fn provide(path: &Path) -> Result<ProvidedModel, ModelError> {
    provide_with(path, &FallbackParams::default())
}

/// Load the artifact at `path`, or fall back to training with `params`.
///
/// Any load failure takes the fallback branch; a failed fallback is returned
/// to the caller.
pub fn provide_with(path: &Path, params: &FallbackParams) -> Result<ProvidedModel, ModelError> {
    match load_artifact(path) {
        Ok(loaded) => {
            info!(
                path = %path.display(),
                checksum = %loaded.checksum,
                trees = loaded.model.n_trees(),
                "Loaded model artifact"
            );
            Ok(ProvidedModel {
                model: loaded.model,
                source: ModelSource::Artifact {
                    path: path.to_path_buf(),
                    checksum: loaded.checksum,
                },
            })
        }
        Err(reason) => {
            warn!(error = %reason, "Model artifact unavailable, training fallback model");
            let fallback = train_fallback(params)?;
            info!(
                trees = fallback.model.n_trees(),
                train_samples = fallback.split.train_len(),
                holdout_samples = fallback.split.test_len(),
                seed = params.seed,
                "Fallback model trained"
            );
            Ok(ProvidedModel {
                source: ModelSource::Fallback {
                    train_samples: fallback.split.train_len(),
                    holdout_samples: fallback.split.test_len(),
                },
                model: fallback.model,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Classifier;
    use ndarray::array;
    use tempfile::TempDir;

    #[test]
    fn test_missing_artifact_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let provided = provide(&temp_dir.path().join("rf_iris.json")).unwrap();

        assert!(provided.source.is_fallback());
        assert_eq!(
            provided.source,
            ModelSource::Fallback {
                train_samples: 120,
                holdout_samples: 30
            }
        );
        assert_eq!(provided.model.n_trees(), FALLBACK_TREES);
        let preds = provided.model.predict(&array![[5.1, 3.5, 1.4, 0.2]]).unwrap();
        assert_eq!(preds, vec![0]);
    }

    #[test]
    fn test_corrupt_artifact_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rf_iris.json");
        std::fs::write(&path, b"{\"format_version\": 1, \"model\": 17}").unwrap();

        let provided = provide(&path).unwrap();
        assert_eq!(provided.source.label(), "fallback");
        assert_eq!(provided.model.n_features(), 4);
    }

    #[test]
    fn test_valid_artifact_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rf_iris.json");
        let fallback = train_fallback(&FallbackParams {
            n_estimators: 4,
            ..FallbackParams::default()
        })
        .unwrap();
        fallback.model.save(&path).unwrap();

        let provided = provide(&path).unwrap();
        assert_eq!(provided.source.label(), "artifact");
        assert_eq!(provided.model.n_trees(), 4);
        match provided.source {
            ModelSource::Artifact { path: loaded_from, checksum } => {
                assert_eq!(loaded_from, path);
                assert_eq!(checksum.len(), 64);
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_fallback_keeps_holdout_split() {
        let fallback = train_fallback(&FallbackParams::default()).unwrap();
        assert_eq!(fallback.split.train_len(), 120);
        assert_eq!(fallback.split.test_len(), 30);

        let accuracy = fallback
            .model
            .accuracy(&fallback.split.test_records, &fallback.split.test_targets)
            .unwrap();
        assert!(accuracy > 0.8);
    }

    #[test]
    fn test_model_source_serializes_with_kind() {
        let source = ModelSource::Fallback {
            train_samples: 120,
            holdout_samples: 30,
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "fallback");
        assert_eq!(json["train_samples"], 120);
    }
}
