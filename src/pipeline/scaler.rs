//! Standardization fit on training rows only

use clap::ValueEnum;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::error::{DegenerateFeatureError, PipelineError};

/// Spreads at or below this are treated as zero
pub const ZERO_SPREAD: f64 = 1e-12;

/// What to do with a feature whose training spread is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroSpreadPolicy {
    /// Fail with a degenerate feature error
    #[default]
    Reject,
    /// Center the feature and leave it unscaled
    Passthrough,
}

/// Per-feature location and scale learned from the training partition
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit mean and population standard deviation per column.
    ///
    /// `feature_names` labels columns in error messages.
    pub fn fit(
        x_train: &Array2<f64>,
        feature_names: &[String],
        policy: ZeroSpreadPolicy,
    ) -> Result<Self, DegenerateFeatureError> {
        let columns = x_train.ncols();
        let column_name = |j: usize| {
            feature_names
                .get(j)
                .cloned()
                .unwrap_or_else(|| format!("feature_{}", j))
        };

        let Some(mean) = x_train.mean_axis(Axis(0)) else {
            // No rows at all: every feature is degenerate.
            return Err(DegenerateFeatureError {
                column: column_name(0),
            });
        };
        let std = x_train.std_axis(Axis(0), 0.0);

        let mut scale = Array1::<f64>::ones(columns);
        for (j, &s) in std.iter().enumerate() {
            if s > ZERO_SPREAD {
                scale[j] = s;
            } else if policy == ZeroSpreadPolicy::Reject {
                return Err(DegenerateFeatureError {
                    column: column_name(j),
                });
            } else {
                log::warn!("feature '{}' has zero spread; left unscaled", column_name(j));
            }
        }

        Ok(Self { mean, scale })
    }

    /// Apply `(x - mean) / scale` column-wise
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>, PipelineError> {
        if x.ncols() != self.mean.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.mean.len(),
                found: x.ncols(),
            });
        }
        Ok((x - &self.mean) / &self.scale)
    }
}

/// Names of columns whose spread is zero, in column order
pub fn degenerate_columns(x: &Array2<f64>, feature_names: &[String]) -> Vec<String> {
    x.std_axis(Axis(0), 0.0)
        .iter()
        .enumerate()
        .filter(|(_, s)| **s <= ZERO_SPREAD)
        .map(|(j, _)| {
            feature_names
                .get(j)
                .cloned()
                .unwrap_or_else(|| format!("feature_{}", j))
        })
        .collect()
}
