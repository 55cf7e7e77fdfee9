//! Reference dataset loading and seeded train/test splitting

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Number of samples in the iris reference dataset
pub const IRIS_SAMPLES: usize = 150;

/// Number of features per iris sample
pub const IRIS_FEATURES: usize = 4;

/// Number of iris species
pub const IRIS_CLASSES: usize = 3;

/// Records and labels partitioned into a training and a held-out part
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train_records: Array2<f64>,
    pub train_targets: Array1<usize>,
    pub test_records: Array2<f64>,
    pub test_targets: Array1<usize>,
}

impl DatasetSplit {
    /// Split `records`/`targets` with a seeded permutation.
    ///
    /// The held-out part takes `ceil(n * test_ratio)` rows from the front of
    /// the permutation, the rest goes to training.
    pub fn new(records: &Array2<f64>, targets: &Array1<usize>, test_ratio: f64, seed: u64) -> Self {
        let n_samples = records.nrows();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((n_samples as f64 * test_ratio.clamp(0.0, 1.0)).ceil() as usize).min(n_samples);
        let (test_idx, train_idx) = indices.split_at(n_test);

        Self {
            train_records: records.select(Axis(0), train_idx),
            train_targets: targets.select(Axis(0), train_idx),
            test_records: records.select(Axis(0), test_idx),
            test_targets: targets.select(Axis(0), test_idx),
        }
    }

    pub fn train_len(&self) -> usize {
        self.train_records.nrows()
    }

    pub fn test_len(&self) -> usize {
        self.test_records.nrows()
    }
}

/// Load the iris dataset and split it
pub fn iris_split(test_ratio: f64, seed: u64) -> DatasetSplit {
    let iris = linfa_datasets::iris();
    DatasetSplit::new(iris.records(), iris.targets(), test_ratio, seed)
}
