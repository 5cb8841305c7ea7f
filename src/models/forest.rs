use linfa::traits::Predict;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{Criterion, DecisionTreeConfig};
use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "random_forest";

/// Number of features each tree sees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    #[default]
    Sqrt,
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    /// Resolve against the feature count, always at least 1
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = n_features as f64;
        let m = match self {
            MaxFeatures::Sqrt => n.sqrt().floor() as usize,
            MaxFeatures::Log2 => n.log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(c) => *c,
        };
        m.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub criterion: Criterion,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    /// Draw each tree's rows with replacement
    pub bootstrap: bool,
    /// Overrides the run seed for this forest
    pub seed: Option<u64>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 1000,
            criterion: Criterion::Entropy,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 4,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: None,
        }
    }
}

impl RandomForestConfig {
    fn tree_config(&self) -> DecisionTreeConfig {
        DecisionTreeConfig {
            criterion: self.criterion,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

struct Member {
    tree: DecisionTree<f64, usize>,
    features: Vec<usize>,
}

/// Bagged decision trees, each grown on a random feature subspace.
///
/// The subspace is drawn once per tree, not at every split: linfa-trees has
/// no per-split feature sampling. Trees are therefore less decorrelated than
/// in a per-split random forest.
///
/// Tree `t` draws its rows and features from `StdRng::seed_from_u64(seed + t)`,
/// so a fit is reproducible no matter how rayon schedules the trees.
/// Prediction is a majority vote with ties going to the smaller label.
pub struct RandomForest {
    config: RandomForestConfig,
    seed: u64,
    fitted: Option<Fitted>,
}

struct Fitted {
    members: Vec<Member>,
    width: usize,
    classes: usize,
}

impl RandomForest {
    pub fn new(config: RandomForestConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            fitted: None,
        }
    }

    fn grow(
        &self,
        tree_config: &DecisionTreeConfig,
        x: &Array2<f64>,
        y: &Array1<usize>,
        t: usize,
    ) -> Result<Member, ModelFitError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
        let rows = x.nrows();
        let n_features = x.ncols();

        let row_sample: Vec<usize> = if self.config.bootstrap {
            (0..rows).map(|_| rng.gen_range(0..rows)).collect()
        } else {
            (0..rows).collect()
        };
        let m = self.config.max_features.resolve(n_features);
        let mut features = index::sample(&mut rng, n_features, m).into_vec();
        features.sort_unstable();

        let x_sub = x.select(Axis(0), &row_sample).select(Axis(1), &features);
        let y_sub = y.select(Axis(0), &row_sample);
        let tree = tree_config.fit_tree(NAME, x_sub, y_sub)?;
        Ok(Member { tree, features })
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        if self.config.n_estimators == 0 {
            return Err(ModelFitError::invalid(NAME, "n_estimators must be at least 1"));
        }
        if x.ncols() == 0 {
            return Err(ModelFitError::fit(NAME, "no features"));
        }
        let tree_config = self.config.tree_config();
        tree_config.validate(NAME)?;

        let members = (0..self.config.n_estimators)
            .into_par_iter()
            .map(|t| self.grow(&tree_config, x, y, t))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "random forest: grew {} trees on {} of {} features each",
            members.len(),
            self.config.max_features.resolve(x.ncols()),
            x.ncols()
        );

        self.fitted = Some(Fitted {
            members,
            width: x.ncols(),
            classes: y.iter().copied().max().unwrap_or(0) + 1,
        });
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelFitError> {
        let fitted = self.fitted.as_ref().ok_or_else(|| ModelFitError::NotFitted {
            model: NAME.to_string(),
        })?;
        check_width(NAME, fitted.width, x)?;

        let mut votes = Array2::<usize>::zeros((x.nrows(), fitted.classes));
        for member in &fitted.members {
            let view = x.select(Axis(1), &member.features);
            let predictions: Array1<usize> = member.tree.predict(&view);
            for (row, &label) in predictions.iter().enumerate() {
                if label < fitted.classes {
                    votes[[row, label]] += 1;
                }
            }
        }

        let predictions = votes
            .rows()
            .into_iter()
            .map(|counts| {
                counts
                    .iter()
                    .enumerate()
                    .fold((0usize, 0usize), |best, (label, &count)| {
                        if count > best.1 {
                            (label, count)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect::<Vec<usize>>();

        Ok(Array1::from_vec(predictions))
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
