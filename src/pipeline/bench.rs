//! Cross-validated comparison of candidate classifiers
//!
//! Every candidate sees the same stratified fold assignment, built once from
//! the run seed. A candidate that fails to fit is recorded as a failed result
//! at its list position and the bench moves on to the next one.

use std::fmt;

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{DegenerateFeatureError, ModelFitError, PartitionError};
use super::folds::{stratified_folds, Fold};
use super::metrics::{accuracy, mean_std, ConfusionMatrix};
use super::scaler::degenerate_columns;
use crate::models::Candidate;
use crate::utils::progress::{create_progress_bar, finish_with_success, finish_with_warning};

/// Bench settings shared by every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub folds: usize,
    pub seed: u64,
    /// Draw an indicatif bar while candidates run
    #[serde(skip)]
    pub show_progress: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 0,
            show_progress: false,
        }
    }
}

/// Scaled partitions handed to the bench
#[derive(Debug, Clone, Copy)]
pub struct BenchInput<'a> {
    pub x_train: &'a Array2<f64>,
    pub y_train: &'a Array1<usize>,
    pub x_test: &'a Array2<f64>,
    pub y_test: &'a Array1<usize>,
    pub feature_names: &'a [String],
}

/// Category of a candidate failure, shown in the report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    DegenerateFeature,
    InvalidParameter,
    Fit,
    NotFitted,
    ShapeMismatch,
}

impl From<&ModelFitError> for FailureKind {
    fn from(err: &ModelFitError) -> Self {
        match err {
            ModelFitError::DegenerateFeature(_) => FailureKind::DegenerateFeature,
            ModelFitError::InvalidParameter { .. } => FailureKind::InvalidParameter,
            ModelFitError::Fit { .. } => FailureKind::Fit,
            ModelFitError::NotFitted { .. } => FailureKind::NotFitted,
            ModelFitError::ShapeMismatch { .. } => FailureKind::ShapeMismatch,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::DegenerateFeature => "DegenerateFeature",
            FailureKind::InvalidParameter => "InvalidParameter",
            FailureKind::Fit => "Fit",
            FailureKind::NotFitted => "NotFitted",
            FailureKind::ShapeMismatch => "ShapeMismatch",
        };
        write!(f, "{}", name)
    }
}

/// Scores of a candidate that completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    /// Mean fold accuracy in [0, 1]; the ranking metric
    pub cv_accuracy: f64,
    pub cv_std: f64,
    pub fold_accuracies: Vec<f64>,
    /// Accuracy on the holdout partition, diagnostic only
    pub holdout_accuracy: f64,
    pub confusion: ConfusionMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Scored(ModelScore),
    Failed { kind: FailureKind, message: String },
}

/// One row of the bench output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    /// Model kind identifier, e.g. `random_forest`
    pub model_kind: String,
    #[serde(flatten)]
    pub outcome: ModelOutcome,
}

impl ModelResult {
    pub fn score(&self) -> Option<&ModelScore> {
        match &self.outcome {
            ModelOutcome::Scored(score) => Some(score),
            ModelOutcome::Failed { .. } => None,
        }
    }

    pub fn cv_accuracy(&self) -> Option<f64> {
        self.score().map(|s| s.cv_accuracy)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ModelOutcome::Failed { .. })
    }
}

/// Evaluate every candidate in order.
///
/// The only fatal error is a fold assignment that cannot be built from the
/// training labels. The returned vector has one entry per candidate, in the
/// order given.
pub fn run_bench(
    candidates: &[Candidate],
    input: BenchInput<'_>,
    config: &BenchConfig,
) -> Result<Vec<ModelResult>, PartitionError> {
    let folds = stratified_folds(input.y_train, config.folds, config.seed)?;

    let pb = if config.show_progress {
        create_progress_bar(candidates.len() as u64, "Benchmarking")
    } else {
        indicatif::ProgressBar::hidden()
    };

    let mut results = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        pb.set_message(candidate.name.clone());
        let outcome = match evaluate_candidate(candidate, input, &folds, config.seed) {
            Ok(score) => {
                log::info!(
                    "{}: cv accuracy {:.4} (std {:.4}), holdout {:.4}",
                    candidate.name,
                    score.cv_accuracy,
                    score.cv_std,
                    score.holdout_accuracy
                );
                ModelOutcome::Scored(score)
            }
            Err(err) => {
                log::warn!("{} failed: {}", candidate.name, err);
                ModelOutcome::Failed {
                    kind: FailureKind::from(&err),
                    message: err.to_string(),
                }
            }
        };
        results.push(ModelResult {
            name: candidate.name.clone(),
            model_kind: candidate.spec.kind().to_string(),
            outcome,
        });
        pb.inc(1);
    }

    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed == 0 {
        finish_with_success(&pb, &format!("{} candidates evaluated", results.len()));
    } else {
        finish_with_warning(
            &pb,
            &format!("{} candidates evaluated, {} failed", results.len(), failed),
        );
    }

    Ok(results)
}

/// Holdout diagnostics plus k-fold cross-validation for one candidate
pub fn evaluate_candidate(
    candidate: &Candidate,
    input: BenchInput<'_>,
    folds: &[Fold],
    seed: u64,
) -> Result<ModelScore, ModelFitError> {
    if candidate.require_non_degenerate {
        if let Some(column) = degenerate_columns(input.x_train, input.feature_names)
            .into_iter()
            .next()
        {
            return Err(DegenerateFeatureError { column }.into());
        }
    }

    let mut model = candidate.spec.build(seed);
    model.fit(input.x_train, input.y_train)?;
    let holdout_predictions = model.predict(input.x_test)?;
    let holdout_accuracy = accuracy(&holdout_predictions, input.y_test);
    let confusion = ConfusionMatrix::from_predictions(&holdout_predictions, input.y_test);

    let fold_accuracies = folds
        .par_iter()
        .map(|fold| {
            let x_fit = input.x_train.select(Axis(0), &fold.train);
            let y_fit = input.y_train.select(Axis(0), &fold.train);
            let x_val = input.x_train.select(Axis(0), &fold.validation);
            let y_val = input.y_train.select(Axis(0), &fold.validation);

            let mut model = candidate.spec.build(seed);
            model.fit(&x_fit, &y_fit)?;
            let predictions = model.predict(&x_val)?;
            Ok(accuracy(&predictions, &y_val))
        })
        .collect::<Result<Vec<f64>, ModelFitError>>()?;

    log::debug!("{} fold accuracies: {:?}", candidate.name, fold_accuracies);

    let (cv_accuracy, cv_std) = mean_std(&fold_accuracies);
    Ok(ModelScore {
        cv_accuracy,
        cv_std,
        fold_accuracies,
        holdout_accuracy,
        confusion,
    })
}
