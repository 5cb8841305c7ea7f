use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_bayes::GaussianNb;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "gaussian_nb";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Fraction of the largest feature variance added to every variance
    pub var_smoothing: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
        }
    }
}

/// Gaussian naive Bayes with per-class feature means and variances
pub struct GaussianNaiveBayes {
    config: NaiveBayesConfig,
    fitted: Option<(GaussianNb<f64, usize>, usize)>,
}

impl GaussianNaiveBayes {
    pub fn new(config: NaiveBayesConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Classifier for GaussianNaiveBayes {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        if self.config.var_smoothing < 0.0 {
            return Err(ModelFitError::invalid(
                NAME,
                "var_smoothing must be non-negative",
            ));
        }

        let dataset = DatasetBase::new(x.to_owned(), y.to_owned());
        let model = GaussianNb::<f64, usize>::params()
            .var_smoothing(self.config.var_smoothing)
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
        let predictions: Array1<usize> = model.predict(x);
        Ok(predictions)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{accuracy, blobs};

    #[test]
    fn test_separates_blobs() {
        let (x, y) = blobs(50, 3, 3.0, 11);
        let mut model = GaussianNaiveBayes::new(NaiveBayesConfig::default());
        model.fit(&x, &y).unwrap();
        assert!(accuracy(&model.predict(&x).unwrap(), &y) > 0.95);
    }

    #[test]
    fn test_width_checked_after_fit() {
        let (x, y) = blobs(10, 3, 3.0, 11);
        let mut model = GaussianNaiveBayes::new(NaiveBayesConfig::default());
        model.fit(&x, &y).unwrap();
        assert!(matches!(
            model.predict(&Array2::zeros((1, 2))),
            Err(ModelFitError::ShapeMismatch { expected: 3, found: 2, .. })
        ));
    }
}
