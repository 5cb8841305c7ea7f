use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "logistic_regression";

/// L2-regularized logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// L2 penalty strength
    pub alpha: f64,
    pub max_iterations: u64,
    pub fit_intercept: bool,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iterations: 100,
            fit_intercept: true,
        }
    }
}

pub struct LogisticRegressionModel {
    config: LogisticConfig,
    fitted: Option<(FittedLogisticRegression<f64, usize>, usize)>,
}

impl LogisticRegressionModel {
    pub fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Classifier for LogisticRegressionModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        if self.config.alpha < 0.0 {
            return Err(ModelFitError::invalid(NAME, "alpha must be non-negative"));
        }

        let dataset = DatasetBase::new(x.to_owned(), y.to_owned());
        let model = LogisticRegression::default()
            .alpha(self.config.alpha)
            .max_iterations(self.config.max_iterations)
            .with_intercept(self.config.fit_intercept)
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
