//! Bagged decision-tree ensemble
//!
//! Each tree is fitted by `linfa-trees` on a bootstrap sample drawn with its
//! own seeded RNG, so a forest is fully determined by its training data and
//! [`ForestParams`]. Predictions are a majority vote across trees.
//!
//! These are bagged trees with no per-split feature sampling: every split
//! considers all features.

use super::{Classifier, ModelError};
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hyperparameters for fitting a [`RandomForest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Base seed; tree `i` uses `seed + i`
    pub seed: u64,
    /// Maximum depth per tree (unbounded when `None`)
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 10,
            seed: 42,
            max_depth: None,
        }
    }
}

impl ForestParams {
    pub fn new(n_estimators: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            seed,
            ..Self::default()
        }
    }
}

/// Random forest classifier over `f64` features and `usize` labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree<f64, usize>>,
    n_features: usize,
    n_classes: usize,
    params: ForestParams,
}

impl RandomForest {
    /// Fit a forest on `records` (one row per sample) and their labels
    pub fn fit(
        records: &Array2<f64>,
        targets: &Array1<usize>,
        params: ForestParams,
    ) -> Result<Self, ModelError> {
        let n_samples = records.nrows();
        if n_samples == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if targets.len() != n_samples {
            return Err(ModelError::Training(format!(
                "{} records but {} targets",
                n_samples,
                targets.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(ModelError::Training(
                "forest needs at least one tree".to_string(),
            ));
        }

        let n_classes = targets.iter().max().map(|&m| m + 1).unwrap_or(0);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for tree_idx in 0..params.n_estimators {
            let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(tree_idx as u64));
            let sample_indices: Vec<usize> =
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

            let bootstrap = Dataset::new(
                records.select(Axis(0), &sample_indices),
                targets.select(Axis(0), &sample_indices),
            );

            let tree = DecisionTree::<f64, usize>::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(params.max_depth)
                .fit(&bootstrap)
                .map_err(|e| ModelError::Training(e.to_string()))?;
            trees.push(tree);
        }

        debug!(
            trees = trees.len(),
            samples = n_samples,
            features = records.ncols(),
            classes = n_classes,
            "Random forest fitted"
        );

        Ok(Self {
            trees,
            n_features: records.ncols(),
            n_classes,
            params,
        })
    }

    /// Majority-vote prediction, one label per row.
    ///
    /// Ties go to the lowest class index so repeated calls agree.
    pub fn predict_labels(&self, samples: &Array2<f64>) -> Result<Vec<usize>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if samples.ncols() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                actual: samples.ncols(),
            });
        }

        let n_rows = samples.nrows();
        if n_rows == 0 {
            return Ok(Vec::new());
        }

        let mut votes = Array2::<usize>::zeros((n_rows, self.n_classes.max(1)));
        for tree in &self.trees {
            let labels: Array1<usize> = tree.predict(samples);
            for (row, &label) in labels.iter().enumerate() {
                if label < self.n_classes {
                    votes[[row, label]] += 1;
                }
            }
        }

        Ok(votes
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (class, &count) in row.iter().enumerate() {
                    if count > row[best] {
                        best = class;
                    }
                }
                best
            })
            .collect())
    }

    /// Fraction of rows whose prediction matches `targets`
    pub fn accuracy(&self, records: &Array2<f64>, targets: &Array1<usize>) -> Result<f64, ModelError> {
        if records.nrows() == 0 {
            return Ok(0.0);
        }
        let predictions = self.predict_labels(records)?;
        let correct = predictions
            .iter()
            .zip(targets.iter())
            .filter(|(p, t)| p == t)
            .count();
        Ok(correct as f64 / records.nrows() as f64)
    }

    /// Structural checks for a forest that did not come out of [`RandomForest::fit`]
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() || self.n_features == 0 || self.n_classes == 0 {
            return Err(ModelError::NotFitted);
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }
}

impl Classifier for RandomForest {
    fn predict(&self, samples: &Array2<f64>) -> Result<Vec<usize>, ModelError> {
        self.predict_labels(samples)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
