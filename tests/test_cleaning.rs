//! Tests for cleaning, label remapping and feature extraction

use cytobench::pipeline::{
    clean_dataset, load_dataset, rows_with_missing, split_features_target, DataIntegrityError,
    DatasetSchema, LabelMapping, LoadOptions, MissingPolicy,
};
use tempfile::TempDir;

mod common;

use common::{missing_row_indices, FixtureSpec};

#[test]
fn test_drop_policy_removes_sentinel_rows() {
    let (_dir, path, counts) = common::default_fixture();
    let (dataset, _) =
        load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap();

    let (cleaned, report) =
        clean_dataset(dataset, MissingPolicy::Drop, &LabelMapping::default()).unwrap();

    assert_eq!(cleaned.height(), 684);
    assert_eq!(report.rows_removed(), 16);
    assert_eq!(report.removed_rows, missing_row_indices(&FixtureSpec::default()));
    assert_eq!(report.negatives, counts.complete_benign);
    assert_eq!(report.positives, counts.complete_malignant);
    assert!(rows_with_missing(&cleaned.frame).is_empty());
}

#[test]
fn test_impute_policy_keeps_every_row() {
    let (_dir, path, counts) = common::default_fixture();
    let (dataset, _) =
        load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap();

    let (cleaned, report) =
        clean_dataset(dataset, MissingPolicy::ImputeMedian, &LabelMapping::default()).unwrap();

    assert_eq!(cleaned.height(), 700);
    assert_eq!(report.values_imputed, 16);
    assert_eq!(report.rows_removed(), 0);
    assert_eq!(report.negatives, counts.benign);
    assert_eq!(report.positives, counts.malignant);
}

#[test]
fn test_feature_matrix_follows_schema() {
    let (_dir, path, _) = common::default_fixture();
    let (dataset, _) =
        load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap();
    let (cleaned, _) =
        clean_dataset(dataset, MissingPolicy::Drop, &LabelMapping::default()).unwrap();

    let data = split_features_target(&cleaned).unwrap();
    assert_eq!(data.features.dim(), (684, 9));
    assert_eq!(data.feature_names[5], "bare_nuclei");
    assert!(data.targets.iter().all(|&t| t <= 1));
    assert!(data.features.iter().all(|&v| (1.0..=10.0).contains(&v)));
}

#[test]
fn test_unexpected_label_is_an_integrity_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("labels.csv");
    std::fs::write(&path, "id,a,class\n1,1,2\n2,?,4\n3,5,3\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let (dataset, _) = load_dataset(&path, &schema, &LoadOptions::default()).unwrap();
    let err = clean_dataset(dataset, MissingPolicy::Drop, &LabelMapping::default()).unwrap_err();

    // Zero-based input row, counted before the incomplete row was dropped
    match err {
        DataIntegrityError::UnmappedLabel { row, value, .. } => {
            assert_eq!(row, 2);
            assert_eq!(value, "3");
        }
        other => panic!("expected UnmappedLabel, got {:?}", other),
    }
}

#[test]
fn test_every_row_incomplete() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "id,a,class\n1,?,2\n2,?,4\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let (dataset, _) = load_dataset(&path, &schema, &LoadOptions::default()).unwrap();
    let err = clean_dataset(dataset, MissingPolicy::Drop, &LabelMapping::default()).unwrap_err();
    assert!(matches!(err, DataIntegrityError::EmptyAfterCleaning { removed: 2 }));
}

#[test]
fn test_custom_label_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.csv");
    std::fs::write(&path, "id,a,class\n1,1,-1\n2,2,1\n3,3,-1\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let (dataset, _) = load_dataset(&path, &schema, &LoadOptions::default()).unwrap();
    let (_, report) =
        clean_dataset(dataset, MissingPolicy::Drop, &LabelMapping::new(-1, 1)).unwrap();
    assert_eq!((report.negatives, report.positives), (2, 1));
}
