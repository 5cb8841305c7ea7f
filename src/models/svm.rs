use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "svm";

/// Support vector classifier with an RBF kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvmConfig {
    /// Penalty for misclassified points, applied to both classes
    pub c: f64,
    /// Kernel coefficient in `exp(-gamma * |x - y|^2)`.
    /// `None` uses `1 / (n_features * Var(X))` computed on the training rows.
    pub gamma: Option<f64>,
    /// Solver stopping tolerance
    pub eps: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            gamma: None,
            eps: 1e-3,
        }
    }
}

pub struct KernelSvm {
    config: SvmConfig,
    fitted: Option<(Svm<f64, bool>, usize)>,
}

impl KernelSvm {
    pub fn new(config: SvmConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

/// Gamma scaled to the data: `1 / (n_features * Var(X))` over all entries
pub fn scale_gamma(x: &Array2<f64>) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean = x.sum() / n;
    let variance = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    if variance > 0.0 {
        1.0 / (x.ncols() as f64 * variance)
    } else {
        1.0
    }
}

impl Classifier for KernelSvm {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        if self.config.c <= 0.0 {
            return Err(ModelFitError::invalid(NAME, "c must be positive"));
        }
        let gamma = self.config.gamma.unwrap_or_else(|| scale_gamma(x));
        if gamma <= 0.0 {
            return Err(ModelFitError::invalid(NAME, "gamma must be positive"));
        }

        let targets = y.mapv(|label| label == 1);
        let dataset = DatasetBase::new(x.to_owned(), targets);

        // The gaussian kernel is exp(-|x - y|^2 / eps), so eps = 1 / gamma.
        let model = Svm::<f64, bool>::params()
            .eps(self.config.eps)
            .pos_neg_weights(self.config.c, self.config.c)
            .gaussian_kernel(1.0 / gamma)
            .fit(&dataset)
            .map_err(|e| ModelFitError::fit(NAME, e))?;

        self.fitted = Some((model, x.ncols()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelFitError> {
        let (model, width) = self.fitted.as_ref().ok_or_else(|| ModelFitError::NotFitted {
            model: NAME.to_string(),
        })?;
        check_width(NAME, *width, x)?;
        let predictions: Array1<bool> = model.predict(x);
        Ok(predictions.mapv(usize::from))
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{accuracy, blobs};
    use ndarray::array;

    #[test]
    fn test_scale_gamma() {
        // Entries 0, 2, 0, 2: variance 1 over 2 columns.
        let x = array![[0.0, 2.0], [0.0, 2.0]];
        assert!((scale_gamma(&x) - 0.5).abs() < 1e-12);
        assert_eq!(scale_gamma(&array![[3.0, 3.0]]), 1.0);
    }

    #[test]
    fn test_separates_blobs() {
        let (x, y) = blobs(40, 2, 4.0, 5);
        let mut model = KernelSvm::new(SvmConfig::default());
        model.fit(&x, &y).unwrap();
        assert!(accuracy(&model.predict(&x).unwrap(), &y) > 0.9);
    }

    #[test]
    fn test_rejects_non_positive_c() {
        let (x, y) = blobs(5, 2, 4.0, 5);
        let mut model = KernelSvm::new(SvmConfig {
            c: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelFitError::InvalidParameter { .. })
        ));
    }
}
