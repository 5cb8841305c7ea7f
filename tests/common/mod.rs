//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use cytobench::models::{Candidate, KnnConfig, ModelSpec, NaiveBayesConfig, RandomForestConfig};

pub const HEADER: &str = "id,clump_thickness,uniformity_cell_size,uniformity_cell_shape,\
marginal_adhesion,single_epithelial_cell_size,bare_nuclei,bland_chromatin,normal_nucleoli,\
mitoses,class";

/// Shape of a generated Wisconsin-style file
#[derive(Debug, Clone, Copy)]
pub struct FixtureSpec {
    pub rows: usize,
    /// Rows whose `bare_nuclei` value is the `?` sentinel
    pub missing_rows: usize,
    pub header: bool,
    /// Write `mitoses` as the constant 1
    pub constant_mitoses: bool,
    pub seed: u64,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        Self {
            rows: 700,
            missing_rows: 16,
            header: true,
            constant_mitoses: false,
            seed: 42,
        }
    }
}

/// Label counts of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureCounts {
    /// Rows labelled 2 among rows without a sentinel
    pub complete_benign: usize,
    /// Rows labelled 4 among rows without a sentinel
    pub complete_malignant: usize,
    pub benign: usize,
    pub malignant: usize,
}

/// Indices of the rows that carry a sentinel, spread over the file
pub fn missing_row_indices(spec: &FixtureSpec) -> Vec<usize> {
    if spec.missing_rows == 0 {
        return Vec::new();
    }
    let stride = spec.rows / spec.missing_rows;
    (0..spec.missing_rows).map(|i| i * stride + stride / 2).collect()
}

/// Write a Wisconsin-style CSV: integer measurements 1..=10, labels 2/4.
///
/// Malignant rows draw most measurements from the upper half of the range,
/// so the classes are learnable but overlap a little.
pub fn write_fixture(dir: &Path, name: &str, spec: &FixtureSpec) -> (PathBuf, FixtureCounts) {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    if spec.header {
        writeln!(file, "{}", HEADER).unwrap();
    }

    let missing = missing_row_indices(spec);
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut counts = FixtureCounts {
        complete_benign: 0,
        complete_malignant: 0,
        benign: 0,
        malignant: 0,
    };

    for i in 0..spec.rows {
        let malignant = rng.gen_bool(0.35);
        let mut fields = vec![(1_000_000 + i).to_string()];
        for feature in 0..9 {
            let value: i64 = if malignant {
                rng.gen_range(4..=10)
            } else {
                rng.gen_range(1..=5)
            };
            let text = if feature == 5 && missing.contains(&i) {
                "?".to_string()
            } else if feature == 8 && spec.constant_mitoses {
                "1".to_string()
            } else {
                value.to_string()
            };
            fields.push(text);
        }
        fields.push(if malignant { "4" } else { "2" }.to_string());
        writeln!(file, "{}", fields.join(",")).unwrap();

        let complete = !missing.contains(&i);
        match (malignant, complete) {
            (true, true) => {
                counts.malignant += 1;
                counts.complete_malignant += 1;
            }
            (true, false) => counts.malignant += 1,
            (false, true) => {
                counts.benign += 1;
                counts.complete_benign += 1;
            }
            (false, false) => counts.benign += 1,
        }
    }

    (path, counts)
}

/// Temporary directory holding the default 700-row fixture
pub fn default_fixture() -> (TempDir, PathBuf, FixtureCounts) {
    let dir = TempDir::new().unwrap();
    let (path, counts) = write_fixture(dir.path(), "cells.csv", &FixtureSpec::default());
    (dir, path, counts)
}

/// Three quick candidates for end-to-end runs
pub fn quick_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("KNN", ModelSpec::Knn(KnnConfig::default())),
        Candidate::new("Naive bayes", ModelSpec::GaussianNb(NaiveBayesConfig::default())),
        Candidate::new(
            "Random forest",
            ModelSpec::RandomForest(RandomForestConfig {
                n_estimators: 20,
                ..Default::default()
            }),
        ),
    ]
}

/// JSON form of [`quick_candidates`], for the binary
pub const QUICK_MODELS_JSON: &str = r#"[
    {"name": "KNN", "kind": "knn"},
    {"name": "Naive bayes", "kind": "gaussian_nb"},
    {"name": "Random forest", "kind": "random_forest", "n_estimators": 20}
]"#;
