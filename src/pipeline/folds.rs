//! Stratified k-fold assignment for cross-validation

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::PartitionError;

/// One cross-validation fold: rows to fit on and rows to score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Assign rows to `k` folds, keeping class proportions roughly equal.
///
/// Rows of each class (ascending label order) are shuffled with a generator
/// seeded once from `seed`, then dealt round-robin with a counter that runs
/// across classes, so fold sizes differ by at most one. Index lists inside a
/// fold are sorted ascending.
pub fn stratified_folds(
    labels: &Array1<usize>,
    k: usize,
    seed: u64,
) -> Result<Vec<Fold>, PartitionError> {
    let rows = labels.len();
    if k < 2 || k > rows {
        return Err(PartitionError::InvalidFolds { folds: k, rows });
    }

    let mut classes: Vec<usize> = labels.iter().copied().collect();
    classes.sort_unstable();
    classes.dedup();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignment = vec![0usize; rows];
    let mut counter = 0usize;

    for class in classes {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| if l == class { Some(i) } else { None })
            .collect();
        if members.len() < k {
            log::warn!(
                "class {} has {} member(s), fewer than {} folds",
                class,
                members.len(),
                k
            );
        }
        members.shuffle(&mut rng);
        for row in members {
            assignment[row] = counter % k;
            counter += 1;
        }
    }

    let folds = (0..k)
        .map(|fold| {
            let (validation, train): (Vec<usize>, Vec<usize>) =
                (0..rows).partition(|&row| assignment[row] == fold);
            Fold { train, validation }
        })
        .collect();

    Ok(folds)
}
