//! Partition and standardize the feature matrix ahead of the bench

use super::bench::BenchInput;
use super::error::PipelineError;
use super::scaler::{StandardScaler, ZeroSpreadPolicy};
use super::split::{train_test_split, FeatureTargets, TrainTestSplit};
use ndarray::Array2;

/// Holdout split with both sides standardized by the training statistics
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub split: TrainTestSplit,
    pub scaler: StandardScaler,
    pub x_train_scaled: Array2<f64>,
    pub x_test_scaled: Array2<f64>,
    pub feature_names: Vec<String>,
}

impl PreparedData {
    pub fn bench_input(&self) -> BenchInput<'_> {
        BenchInput {
            x_train: &self.x_train_scaled,
            y_train: &self.split.y_train,
            x_test: &self.x_test_scaled,
            y_test: &self.split.y_test,
            feature_names: &self.feature_names,
        }
    }
}

/// Split rows, fit the scaler on the training side only, transform both sides
pub fn prepare_partitions(
    data: &FeatureTargets,
    holdout: f64,
    seed: u64,
    zero_spread: ZeroSpreadPolicy,
) -> Result<PreparedData, PipelineError> {
    let split = train_test_split(&data.features, &data.targets, holdout, seed)?;
    log::info!(
        "partitioned {} rows into {} train / {} test (seed {})",
        data.features.nrows(),
        split.train_indices.len(),
        split.test_indices.len(),
        seed
    );

    let scaler = StandardScaler::fit(&split.x_train, &data.feature_names, zero_spread)?;
    let x_train_scaled = scaler.transform(&split.x_train)?;
    let x_test_scaled = scaler.transform(&split.x_test)?;

    Ok(PreparedData {
        split,
        scaler,
        x_train_scaled,
        x_test_scaled,
        feature_names: data.feature_names.clone(),
    })
}
