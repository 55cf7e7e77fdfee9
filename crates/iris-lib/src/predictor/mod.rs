//! Iris classification engine

mod artifact;
mod dataset;
mod forest;
mod provider;

pub use artifact::{load_artifact, LoadError, LoadedArtifact, ARTIFACT_FORMAT_VERSION};
pub use dataset::{iris_split, DatasetSplit, IRIS_CLASSES, IRIS_FEATURES, IRIS_SAMPLES};
pub use forest::{ForestParams, RandomForest};
pub use provider::{
    provide, provide_with, train_fallback, FallbackModel, FallbackParams, ModelSource, ProvidedModel,
    DEFAULT_ARTIFACT_PATH, FALLBACK_SEED, FALLBACK_TEST_RATIO, FALLBACK_TREES,
};

use ndarray::Array2;
use thiserror::Error;

/// Errors raised while fitting or querying a classifier
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected {expected} features per sample, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("training data is empty")]
    EmptyTrainingSet,

    #[error("training failed: {0}")]
    Training(String),

    #[error("model is not fitted")]
    NotFitted,
}

/// Trait for classifier implementations served by the prediction endpoint
pub trait Classifier: Send + Sync {
    /// Predict one class label per row of `samples`, preserving row order
    fn predict(&self, samples: &Array2<f64>) -> Result<Vec<usize>, ModelError>;

    /// Number of features each sample must carry
    fn n_features(&self) -> usize;
}
