//! Feature/target splitting and the seeded train/test partition

use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::{DataIntegrityError, PartitionError};
use super::loader::Dataset;

/// Feature matrix and 0/1 target vector drawn from a cleaned dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTargets {
    pub features: Array2<f64>,
    pub targets: Array1<usize>,
    pub feature_names: Vec<String>,
}

/// Extract measurement columns (schema order) and the label column.
///
/// The identifier column is discarded. Expects a cleaned dataset: any null
/// or label outside {0, 1} is an integrity error.
pub fn split_features_target(dataset: &Dataset) -> Result<FeatureTargets, DataIntegrityError> {
    let frame_error = |e: PolarsError| DataIntegrityError::Frame(e.to_string());
    let schema = &dataset.schema;
    let rows = dataset.frame.height();
    let feature_names = schema.measurement_columns.clone();

    let mut features = Array2::<f64>::zeros((rows, feature_names.len()));
    for (j, name) in feature_names.iter().enumerate() {
        let column = dataset
            .frame
            .column(name)
            .map_err(frame_error)?
            .cast(&DataType::Float64)
            .map_err(frame_error)?;
        let values = column.f64().map_err(frame_error)?;
        for (i, value) in values.into_iter().enumerate() {
            features[[i, j]] = value.ok_or_else(|| DataIntegrityError::MissingAfterCleaning {
                row: i,
                column: name.clone(),
            })?;
        }
    }

    let label_column = dataset
        .frame
        .column(&schema.label_column)
        .map_err(frame_error)?
        .cast(&DataType::Int64)
        .map_err(frame_error)?;
    let mut targets = Vec::with_capacity(rows);
    for (i, value) in label_column.i64().map_err(frame_error)?.into_iter().enumerate() {
        match value {
            Some(0) => targets.push(0usize),
            Some(1) => targets.push(1usize),
            Some(other) => {
                return Err(DataIntegrityError::UnmappedLabel {
                    row: i,
                    column: schema.label_column.clone(),
                    value: other.to_string(),
                })
            }
            None => {
                return Err(DataIntegrityError::MissingAfterCleaning {
                    row: i,
                    column: schema.label_column.clone(),
                })
            }
        }
    }

    Ok(FeatureTargets {
        features,
        targets: Array1::from_vec(targets),
        feature_names,
    })
}

/// Aligned train/test arrays plus the source row indices of each side
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<usize>,
    pub y_test: Array1<usize>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Number of holdout rows: `n * fraction` rounded half-up.
///
/// A small tolerance keeps products such as `5 * 0.3` (stored as
/// 1.4999999999999998) on the intended side of the half.
pub fn holdout_size(rows: usize, fraction: f64) -> usize {
    (rows as f64 * fraction + 0.5 + 1e-9).floor() as usize
}

/// Shuffle rows with a seeded generator and cut off the holdout set.
///
/// The first `holdout_size` rows of the permutation form the test set; the
/// rest form the training set, both in permutation order.
pub fn train_test_split(
    features: &Array2<f64>,
    targets: &Array1<usize>,
    holdout: f64,
    seed: u64,
) -> Result<TrainTestSplit, PartitionError> {
    if !(holdout > 0.0 && holdout < 1.0) {
        return Err(PartitionError::InvalidFraction(holdout));
    }
    let rows = features.nrows();
    if rows != targets.len() {
        return Err(PartitionError::LengthMismatch {
            features: rows,
            targets: targets.len(),
        });
    }

    let n_test = holdout_size(rows, holdout);
    if n_test == 0 {
        return Err(PartitionError::EmptyPartition {
            fraction: holdout,
            rows,
            side: "test",
        });
    }
    if n_test >= rows {
        return Err(PartitionError::EmptyPartition {
            fraction: holdout,
            rows,
            side: "train",
        });
    }

    let mut permutation: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let test_indices = permutation[..n_test].to_vec();
    let train_indices = permutation[n_test..].to_vec();

    Ok(TrainTestSplit {
        x_train: features.select(Axis(0), &train_indices),
        x_test: features.select(Axis(0), &test_indices),
        y_train: targets.select(Axis(0), &train_indices),
        y_test: targets.select(Axis(0), &test_indices),
        train_indices,
        test_indices,
    })
}
