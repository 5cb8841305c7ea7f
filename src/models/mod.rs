//! Candidate classifiers behind one fit/predict interface
//!
//! Every candidate is described by a [`ModelSpec`] (kind plus
//! hyperparameters). The bench builds a fresh, unfit [`Classifier`] from the
//! spec whenever it needs one, so no fitted state survives between folds or
//! runs. Adding a model means adding a spec variant and an arm in
//! [`ModelSpec::build`]; the bench loop does not change.

pub mod forest;
pub mod knn;
pub mod logistic;
pub mod naive_bayes;
pub mod svm;
pub mod tree;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::pipeline::error::ModelFitError;

pub use forest::{RandomForest, RandomForestConfig};
pub use knn::{KNearestNeighbors, KnnConfig};
pub use logistic::{LogisticConfig, LogisticRegressionModel};
pub use naive_bayes::{GaussianNaiveBayes, NaiveBayesConfig};
pub use svm::{KernelSvm, SvmConfig};
pub use tree::{DecisionTreeConfig, DecisionTreeModel};

/// Binary classifier over a dense feature matrix with 0/1 labels
pub trait Classifier {
    /// Fit on rows of `x` with labels `y`
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError>;

    /// Predict a 0/1 label for each row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelFitError>;

    /// Short identifier of the model kind
    fn name(&self) -> &'static str;
}

/// Model kind and hyperparameters, tagged by `kind` in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    LogisticRegression(LogisticConfig),
    Knn(KnnConfig),
    Svm(SvmConfig),
    GaussianNb(NaiveBayesConfig),
    DecisionTree(DecisionTreeConfig),
    RandomForest(RandomForestConfig),
}

impl ModelSpec {
    /// Build a fresh, unfit classifier.
    ///
    /// `seed` feeds stochastic models that carry no seed of their own.
    pub fn build(&self, seed: u64) -> Box<dyn Classifier> {
        match self {
            ModelSpec::LogisticRegression(cfg) => Box::new(LogisticRegressionModel::new(cfg.clone())),
            ModelSpec::Knn(cfg) => Box::new(KNearestNeighbors::new(cfg.clone())),
            ModelSpec::Svm(cfg) => Box::new(KernelSvm::new(cfg.clone())),
            ModelSpec::GaussianNb(cfg) => Box::new(GaussianNaiveBayes::new(cfg.clone())),
            ModelSpec::DecisionTree(cfg) => Box::new(DecisionTreeModel::new(cfg.clone())),
            ModelSpec::RandomForest(cfg) => {
                Box::new(RandomForest::new(cfg.clone(), cfg.seed.unwrap_or(seed)))
            }
        }
    }

    /// Identifier used in the JSON `kind` field
    pub fn kind(&self) -> &'static str {
        match self {
            ModelSpec::LogisticRegression(_) => "logistic_regression",
            ModelSpec::Knn(_) => "knn",
            ModelSpec::Svm(_) => "svm",
            ModelSpec::GaussianNb(_) => "gaussian_nb",
            ModelSpec::DecisionTree(_) => "decision_tree",
            ModelSpec::RandomForest(_) => "random_forest",
        }
    }
}

/// A named entry in the benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name used in reports and charts
    pub name: String,
    /// Fail this candidate when any training feature has zero spread
    #[serde(default)]
    pub require_non_degenerate: bool,
    #[serde(flatten)]
    pub spec: ModelSpec,
}

impl Candidate {
    pub fn new(name: impl Into<String>, spec: ModelSpec) -> Self {
        Self {
            name: name.into(),
            require_non_degenerate: false,
            spec,
        }
    }

    pub fn requiring_non_degenerate(mut self) -> Self {
        self.require_non_degenerate = true;
        self
    }
}

/// The six reference candidates with their reference hyperparameters
pub fn default_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(
            "Logistic regression",
            ModelSpec::LogisticRegression(LogisticConfig::default()),
        ),
        Candidate::new("KNN", ModelSpec::Knn(KnnConfig::default())),
        Candidate::new("kernel SVM", ModelSpec::Svm(SvmConfig::default())),
        Candidate::new("Naive bayes", ModelSpec::GaussianNb(NaiveBayesConfig::default())),
        Candidate::new(
            "Decision tree",
            ModelSpec::DecisionTree(DecisionTreeConfig::default()),
        ),
        Candidate::new(
            "Random forest",
            ModelSpec::RandomForest(RandomForestConfig::default()),
        ),
    ]
}

/// Reject a feature matrix whose width differs from the fitted width
pub(crate) fn check_width(model: &str, expected: usize, x: &Array2<f64>) -> Result<(), ModelFitError> {
    if x.ncols() != expected {
        return Err(ModelFitError::ShapeMismatch {
            model: model.to_string(),
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}

/// Reject empty training data or mismatched label counts
pub(crate) fn check_training_data(
    model: &str,
    x: &Array2<f64>,
    y: &Array1<usize>,
) -> Result<(), ModelFitError> {
    if x.nrows() == 0 {
        return Err(ModelFitError::fit(model, "no training rows"));
    }
    if x.nrows() != y.len() {
        return Err(ModelFitError::fit(
            model,
            format!("{} rows but {} labels", x.nrows(), y.len()),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two Gaussian-ish blobs, class 1 shifted by `gap` on every feature
    pub fn blobs(per_class: usize, features: usize, gap: f64, seed: u64) -> (Array2<f64>, Array1<usize>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = per_class * 2;
        let mut x = Array2::<f64>::zeros((rows, features));
        let mut y = Array1::<usize>::zeros(rows);
        for i in 0..rows {
            let class = i % 2;
            y[i] = class;
            for j in 0..features {
                let noise: f64 = rng.gen_range(-1.0..1.0);
                x[[i, j]] = noise + class as f64 * gap;
            }
        }
        (x, y)
    }

    pub fn accuracy(pred: &Array1<usize>, truth: &Array1<usize>) -> f64 {
        let hits = pred.iter().zip(truth.iter()).filter(|(a, b)| a == b).count();
        hits as f64 / truth.len() as f64
    }
}
