//! Request payload shape normalization
//!
//! Prediction payloads carry either one flat sample or a list of samples.
//! [`SampleInput`] makes the two cases explicit and [`SampleInput::into_matrix`]
//! turns both into the 2-D layout the classifier expects.

use ndarray::Array2;
use serde_json::Value;
use thiserror::Error;

/// Why a payload could not be turned into a sample matrix
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("no samples provided")]
    Empty,

    #[error("unsupported input rank {0}, expected a sample (rank 1) or a list of samples (rank 2)")]
    UnsupportedRank(usize),

    #[error("row {row} has {actual} features, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("non-numeric value at {0}")]
    NonNumeric(String),

    #[error("input mixes numbers and lists")]
    Mixed,
}

/// One flat sample or a batch of samples
#[derive(Debug, Clone, PartialEq)]
pub enum SampleInput {
    Row(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl SampleInput {
    /// Classify a JSON value by rank
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Number(_) => return Err(ShapeError::UnsupportedRank(0)),
            _ => return Err(ShapeError::NonNumeric("data".to_string())),
        };

        if items.is_empty() {
            return Err(ShapeError::Empty);
        }

        if items.iter().all(Value::is_number) {
            let row = items
                .iter()
                .enumerate()
                .map(|(i, v)| number_at(v, || format!("data[{}]", i)))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(SampleInput::Row(row));
        }

        if !items.iter().all(Value::is_array) {
            return if items.iter().any(Value::is_array) && items.iter().any(Value::is_number) {
                Err(ShapeError::Mixed)
            } else {
                let idx = items
                    .iter()
                    .position(|v| !v.is_array() && !v.is_number())
                    .unwrap_or(0);
                Err(ShapeError::NonNumeric(format!("data[{}]", idx)))
            };
        }

        let mut rows = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let cells = item.as_array().map(Vec::as_slice).unwrap_or_default();
            let mut row = Vec::with_capacity(cells.len());
            for (j, cell) in cells.iter().enumerate() {
                if cell.is_array() {
                    return Err(ShapeError::UnsupportedRank(2 + nesting_depth(cell)));
                }
                row.push(number_at(cell, || format!("data[{}][{}]", i, j))?);
            }
            rows.push(row);
        }

        Ok(SampleInput::Matrix(rows))
    }

    /// Number of samples after normalization
    pub fn n_samples(&self) -> usize {
        match self {
            SampleInput::Row(_) => 1,
            SampleInput::Matrix(rows) => rows.len(),
        }
    }

    /// A flat sample becomes a single-row matrix; a batch passes through
    pub fn into_matrix(self) -> Result<Array2<f64>, ShapeError> {
        match self {
            SampleInput::Row(row) => {
                let n_features = row.len();
                Array2::from_shape_vec((1, n_features), row)
                    .map_err(|_| ShapeError::UnsupportedRank(1))
            }
            SampleInput::Matrix(rows) => {
                let n_rows = rows.len();
                if n_rows == 0 {
                    return Err(ShapeError::Empty);
                }
                let n_cols = rows[0].len();
                if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
                    return Err(ShapeError::Ragged {
                        row,
                        expected: n_cols,
                        actual: r.len(),
                    });
                }
                let flat: Vec<f64> = rows.into_iter().flatten().collect();
                Array2::from_shape_vec((n_rows, n_cols), flat)
                    .map_err(|_| ShapeError::UnsupportedRank(2))
            }
        }
    }
}

fn number_at(value: &Value, location: impl FnOnce() -> String) -> Result<f64, ShapeError> {
    value
        .as_f64()
        .ok_or_else(|| ShapeError::NonNumeric(location()))
}

fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map(nesting_depth).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_sample_becomes_single_row() {
        let input = SampleInput::from_value(&json!([5.1, 3.5, 1.4, 0.2])).unwrap();
        assert_eq!(input, SampleInput::Row(vec![5.1, 3.5, 1.4, 0.2]));
        assert_eq!(input.n_samples(), 1);

        let matrix = input.into_matrix().unwrap();
        assert_eq!(matrix.dim(), (1, 4));
        assert_eq!(matrix[[0, 2]], 1.4);
    }

    #[test]
    fn test_batch_passes_through() {
        let input =
            SampleInput::from_value(&json!([[5.1, 3.5, 1.4, 0.2], [6.7, 3.1, 4.7, 1.5]])).unwrap();
        assert_eq!(input.n_samples(), 2);

        let matrix = input.into_matrix().unwrap();
        assert_eq!(matrix.dim(), (2, 4));
        assert_eq!(matrix[[1, 0]], 6.7);
    }

    #[test]
    fn test_integers_are_accepted() {
        let matrix = SampleInput::from_value(&json!([5, 3, 1, 0]))
            .unwrap()
            .into_matrix()
            .unwrap();
        assert_eq!(matrix[[0, 0]], 5.0);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(SampleInput::from_value(&json!([])), Err(ShapeError::Empty));
    }

    #[test]
    fn test_empty_inner_row_keeps_zero_features() {
        let matrix = SampleInput::from_value(&json!([[]]))
            .unwrap()
            .into_matrix()
            .unwrap();
        assert_eq!(matrix.dim(), (1, 0));
    }

    #[test]
    fn test_scalar_rejected() {
        assert_eq!(
            SampleInput::from_value(&json!(5.1)),
            Err(ShapeError::UnsupportedRank(0))
        );
    }

    #[test]
    fn test_rank_three_rejected() {
        assert_eq!(
            SampleInput::from_value(&json!([[[5.1, 3.5], [1.4, 0.2]]])),
            Err(ShapeError::UnsupportedRank(3))
        );
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let input = SampleInput::from_value(&json!([[1.0, 2.0], [3.0]])).unwrap();
        assert_eq!(
            input.into_matrix(),
            Err(ShapeError::Ragged {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(
            SampleInput::from_value(&json!([1.0, "two"])),
            Err(ShapeError::NonNumeric("data[1]".to_string()))
        );
        assert_eq!(
            SampleInput::from_value(&json!([[1.0, null]])),
            Err(ShapeError::NonNumeric("data[0][1]".to_string()))
        );
        assert_eq!(
            SampleInput::from_value(&json!({"a": 1})),
            Err(ShapeError::NonNumeric("data".to_string()))
        );
    }

    #[test]
    fn test_mixed_rank_rejected() {
        assert_eq!(
            SampleInput::from_value(&json!([1.0, [2.0]])),
            Err(ShapeError::Mixed)
        );
    }
}
