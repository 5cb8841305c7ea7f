//! Tests for dataset loading and schema resolution

use std::io::Write;

use cytobench::pipeline::{load_dataset, DatasetSchema, LoadError, LoadOptions};
use polars::prelude::*;
use tempfile::TempDir;

mod common;

use common::{write_fixture, FixtureSpec};

#[test]
fn test_load_fixture_with_sentinels() {
    let (_dir, path, _) = common::default_fixture();
    let (dataset, summary) =
        load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap();

    assert_eq!(dataset.height(), 700);
    assert_eq!(summary.rows, 700);
    assert_eq!(summary.columns.len(), 11);
    assert_eq!(summary.total_missing(), 16, "Every '?' should load as null");

    let incomplete = summary.incomplete_columns();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].name, "bare_nuclei");
    assert_eq!(
        dataset.frame.column("bare_nuclei").unwrap().dtype(),
        &DataType::Int64
    );
}

#[test]
fn test_headerless_file_takes_schema_names() {
    let dir = TempDir::new().unwrap();
    let spec = FixtureSpec {
        rows: 50,
        missing_rows: 2,
        header: false,
        ..Default::default()
    };
    let (path, _) = write_fixture(dir.path(), "cells.data", &spec);

    let options = LoadOptions {
        has_header: false,
        ..Default::default()
    };
    let (dataset, _) = load_dataset(&path, &DatasetSchema::default(), &options).unwrap();

    assert_eq!(dataset.height(), 50);
    let names: Vec<String> = dataset
        .frame
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, DatasetSchema::default().column_names());
}

#[test]
fn test_header_columns_reordered_to_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("small.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "label,x,y,key").unwrap();
    writeln!(file, "2,1,5,a").unwrap();
    writeln!(file, "4,3,?,b").unwrap();
    drop(file);

    let schema = DatasetSchema {
        id_column: "key".to_string(),
        measurement_columns: vec!["x".to_string(), "y".to_string()],
        label_column: "label".to_string(),
    };
    let (dataset, summary) = load_dataset(&path, &schema, &LoadOptions::default()).unwrap();

    let names: Vec<String> = dataset
        .frame
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["key", "x", "y", "label"]);
    assert_eq!(summary.total_missing(), 1);
}

#[test]
fn test_missing_file() {
    let err = load_dataset(
        std::path::Path::new("/nonexistent/cells.csv"),
        &DatasetSchema::default(),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert!(err.to_string().contains("/nonexistent/cells.csv"));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cells.xlsx");
    std::fs::write(&path, "irrelevant").unwrap();

    let err = load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat { ref extension, .. } if extension == "xlsx"));
}

#[test]
fn test_column_count_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("narrow.csv");
    std::fs::write(&path, "id,a,class\n1,2,2\n").unwrap();

    let err = load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::ColumnCount {
            expected: 11,
            found: 3
        }
    ));
}

#[test]
fn test_fractional_measurement_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frac.csv");
    std::fs::write(&path, "id,a,class\n1,2.5,2\n2,3.0,4\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let err = load_dataset(&path, &schema, &LoadOptions::default()).unwrap_err();
    match err {
        LoadError::NonIntegral { column, .. } => assert_eq!(column, "a"),
        other => panic!("expected NonIntegral, got {:?}", other),
    }
}

#[test]
fn test_load_parquet_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cells.parquet");

    let mut df = df! {
        "id" => [1i64, 2, 3],
        "a" => [Some(1i32), None, Some(3)],
        "class" => [2i64, 4, 2],
    }
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let (dataset, summary) = load_dataset(&path, &schema, &LoadOptions::default()).unwrap();

    assert_eq!(dataset.height(), 3);
    assert_eq!(summary.total_missing(), 1);
    assert_eq!(dataset.frame.column("a").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_custom_sentinel_and_separator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("semicolon.csv");
    std::fs::write(&path, "id;a;class\n1;NA;2\n2;3;4\n3;NA;2\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let options = LoadOptions {
        sentinel: "NA".to_string(),
        separator: b';',
        ..Default::default()
    };
    let (dataset, summary) = load_dataset(&path, &schema, &options).unwrap();

    assert_eq!(dataset.height(), 3);
    assert_eq!(summary.total_missing(), 2);
    assert_eq!(dataset.frame.column("a").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_default_token_is_text_under_custom_sentinel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.csv");
    std::fs::write(&path, "id;a;class\n1;NA;2\n2;?;4\n").unwrap();

    let schema = DatasetSchema {
        id_column: "id".to_string(),
        measurement_columns: vec!["a".to_string()],
        label_column: "class".to_string(),
    };
    let options = LoadOptions {
        sentinel: "NA".to_string(),
        separator: b';',
        ..Default::default()
    };
    let err = load_dataset(&path, &schema, &options).unwrap_err();
    match err {
        LoadError::NonIntegral { column, found } => {
            assert_eq!(column, "a");
            assert!(found.contains('?'), "unexpected detail: {}", found);
        }
        other => panic!("expected NonIntegral, got {:?}", other),
    }
}

#[test]
fn test_truncated_row_fails_to_load() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_fixture(dir.path(), "cells.csv", &FixtureSpec::default());
    let mut text = std::fs::read_to_string(&path).unwrap();
    text.push_str("9999,5,4\n");
    std::fs::write(&path, text).unwrap();

    let err = load_dataset(&path, &DatasetSchema::default(), &LoadOptions::default()).unwrap_err();
    match err {
        LoadError::MissingField { row, column, .. } => {
            assert_eq!(row, 700);
            assert_eq!(column, "uniformity_cell_shape");
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
}
