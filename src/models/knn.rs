use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::{check_training_data, check_width, Classifier};
use crate::pipeline::error::ModelFitError;

const NAME: &str = "knn";

/// k-nearest-neighbours with a Minkowski metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnnConfig {
    /// Neighbours consulted per prediction
    pub k: usize,
    /// Minkowski exponent (1 = Manhattan, 2 = Euclidean)
    pub p: f64,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self { k: 10, p: 2.0 }
    }
}

/// Brute-force neighbour search over the stored training rows.
///
/// Ties in distance are broken by training row order; ties in the vote go
/// to the smaller label.
pub struct KNearestNeighbors {
    config: KnnConfig,
    train: Option<(Array2<f64>, Array1<usize>)>,
}

impl KNearestNeighbors {
    pub fn new(config: KnnConfig) -> Self {
        Self {
            config,
            train: None,
        }
    }

    /// Minkowski distance without the final root, which preserves ordering
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        let p = self.config.p;
        if p == 2.0 {
            a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
        } else if p == 1.0 {
            a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
        } else {
            a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs().powf(p)).sum()
        }
    }
}

impl Classifier for KNearestNeighbors {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<(), ModelFitError> {
        check_training_data(NAME, x, y)?;
        if self.config.k == 0 {
            return Err(ModelFitError::invalid(NAME, "k must be at least 1"));
        }
        if !(self.config.p >= 1.0) {
            return Err(ModelFitError::invalid(NAME, "p must be at least 1"));
        }
        if self.config.k > x.nrows() {
            return Err(ModelFitError::invalid(
                NAME,
                format!("k = {} exceeds {} training rows", self.config.k, x.nrows()),
            ));
        }
        self.train = Some((x.to_owned(), y.to_owned()));
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>, ModelFitError> {
        let (train_x, train_y) = self.train.as_ref().ok_or_else(|| ModelFitError::NotFitted {
            model: NAME.to_string(),
        })?;
        check_width(NAME, train_x.ncols(), x)?;

        let classes = train_y.iter().copied().max().unwrap_or(0) + 1;
        let k = self.config.k;

        let predictions = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut neighbours: Vec<(f64, usize)> = train_x
                    .rows()
                    .into_iter()
                    .enumerate()
                    .map(|(i, train_row)| (self.distance(row, train_row), i))
                    .collect();
                neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

                let mut votes = vec![0usize; classes];
                for &(_, i) in neighbours.iter().take(k) {
                    votes[train_y[i]] += 1;
                }
                // First maximum wins, so ties go to the smaller label.
                votes
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{accuracy, blobs};
    use ndarray::array;

    #[test]
    fn test_majority_of_neighbours() {
        let x = array![[0.0], [0.1], [0.2], [5.0], [5.1]];
        let y = array![0usize, 0, 0, 1, 1];
        let mut model = KNearestNeighbors::new(KnnConfig { k: 3, p: 2.0 });
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&array![[0.05], [4.9]]).unwrap();
        // Second query sees 5.0, 5.1 and 0.2: two votes for class 1.
        assert_eq!(pred, array![0, 1]);
    }

    #[test]
    fn test_vote_tie_goes_to_smaller_label() {
        let x = array![[0.0], [1.0]];
        let y = array![1usize, 0];
        let mut model = KNearestNeighbors::new(KnnConfig { k: 2, p: 2.0 });
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&array![[0.0]]).unwrap(), array![0]);
    }

    #[test]
    fn test_manhattan_metric() {
        let x = array![[0.0, 0.0], [3.0, 0.0], [2.0, 2.0]];
        let y = array![0usize, 1, 0];
        let model = KNearestNeighbors::new(KnnConfig { k: 1, p: 1.0 });
        let d_a = model.distance(array![2.6, 0.9].view(), array![3.0, 0.0].view());
        let d_b = model.distance(array![2.6, 0.9].view(), array![2.0, 2.0].view());
        assert!((d_a - 1.3).abs() < 1e-12);
        assert!((d_b - 1.7).abs() < 1e-12);

        let mut model = model;
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&array![[2.6, 0.9]]).unwrap(), array![1]);
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let x = array![[0.0], [1.0]];
        let y = array![0usize, 1];
        let mut model = KNearestNeighbors::new(KnnConfig { k: 3, p: 2.0 });
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelFitError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_separates_blobs() {
        let (x, y) = blobs(40, 4, 3.0, 9);
        let mut model = KNearestNeighbors::new(KnnConfig::default());
        model.fit(&x, &y).unwrap();
        assert!(accuracy(&model.predict(&x).unwrap(), &y) > 0.95);
    }
}
