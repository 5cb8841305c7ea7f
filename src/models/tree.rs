use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "decision_tree";

/// Impurity measure used to score splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Gini,
    #[default]
    Entropy,
}

impl From<Criterion> for SplitQuality {
    fn from(criterion: Criterion) -> Self {
        match criterion {
            Criterion::Gini => SplitQuality::Gini,
            Criterion::Entropy => SplitQuality::Entropy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTreeConfig {
    pub criterion: Criterion,
    /// Unlimited when absent
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            criterion: Criterion::Entropy,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl DecisionTreeConfig {
    pub(crate) fn validate(&self, model: &str) -> Result<(), ModelFitError> {
        if self.min_samples_split < 2 {
            return Err(ModelFitError::invalid(model, "min_samples_split must be at least 2"));
        }
        if self.min_samples_leaf < 1 {
            return Err(ModelFitError::invalid(model, "min_samples_leaf must be at least 1"));
        }
        if self.max_depth == Some(0) {
            return Err(ModelFitError::invalid(model, "max_depth must be at least 1"));
        }
        Ok(())
    }

    /// Fit one linfa tree with these settings; every row weighs 1
    pub(crate) fn fit_tree(
        &self,
        model: &str,
        x: Array2<f64>,
        y: Array1<usize>,
    ) -> Result<DecisionTree<f64, usize>, ModelFitError> {
        let dataset = DatasetBase::new(x, y);
        DecisionTree::<f64, usize>::params()
            .split_quality(self.criterion.into())
            .max_depth(self.max_depth)
            .min_weight_split(self.min_samples_split as f32)
            .min_weight_leaf(self.min_samples_leaf as f32)
            .fit(&dataset)
            .map_err(|e| ModelFitError::fit(model, e))
    }
}

/// Single CART-style tree
pub struct DecisionTreeModel {
    config: DecisionTreeConfig,
    fitted: Option<(DecisionTree<f64, usize>, usize)>,
}

impl DecisionTreeModel {
    pub fn new(config: DecisionTreeConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Classifier for DecisionTreeModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        self.config.validate(NAME)?;
        let tree = self.config.fit_tree(NAME, x.to_owned(), y.to_owned())?;
        self.fitted = Some((tree, x.ncols()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelFitError> {
        let (tree, width) = self.fitted.as_ref().ok_or_else(|| ModelFitError::NotFitted {
            model: NAME.to_string(),
        })?;
        check_width(NAME, *width, x)?;
        let predictions: Array1<usize> = tree.predict(x);
        Ok(predictions)
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
