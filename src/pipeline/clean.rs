//! Dataset cleaning: missing value policy followed by label remapping

use serde::Serialize;

use super::error::DataIntegrityError;
use super::loader::Dataset;
use super::missing::{drop_rows, impute_median, rows_with_missing, MissingPolicy};
use super::target::{class_counts, remap_labels, LabelMapping};

/// What the cleaner did to the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub policy: MissingPolicy,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Original (0-based) indices of removed rows
    pub removed_rows: Vec<usize>,
    pub values_imputed: usize,
    /// Count of label 0 after remapping
    pub negatives: usize,
    /// Count of label 1 after remapping
    pub positives: usize,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> usize {
        self.removed_rows.len()
    }
}

/// Apply the missing value policy, then remap labels to 0/1.
///
/// Fails when no row survives or when a label is neither mapped value.
pub fn clean_dataset(
    dataset: Dataset,
    policy: MissingPolicy,
    mapping: &LabelMapping,
) -> Result<(Dataset, CleaningReport), DataIntegrityError> {
    let Dataset { mut frame, schema } = dataset;
    let rows_before = frame.height();

    let values_imputed = match policy {
        MissingPolicy::Drop => 0,
        MissingPolicy::ImputeMedian => impute_median(&mut frame, &schema.measurement_columns)?,
    };

    let removed_rows = rows_with_missing(&frame);
    let frame = drop_rows(&frame, &removed_rows)?;
    if !removed_rows.is_empty() {
        log::info!(
            "removed {} row(s) with missing values: {:?}",
            removed_rows.len(),
            removed_rows
        );
    }

    if frame.height() == 0 {
        return Err(DataIntegrityError::EmptyAfterCleaning {
            removed: removed_rows.len(),
        });
    }

    let row_ids: Vec<usize> = (0..rows_before)
        .filter(|i| removed_rows.binary_search(i).is_err())
        .collect();

    let mut frame = frame;
    remap_labels(&mut frame, &schema.label_column, mapping, &row_ids)?;

    let (negatives, positives) = class_counts(&frame, &schema.label_column)?;
    if negatives == 0 || positives == 0 {
        return Err(DataIntegrityError::SingleClass {
            column: schema.label_column.clone(),
        });
    }

    let report = CleaningReport {
        policy,
        rows_before,
        rows_after: frame.height(),
        removed_rows,
        values_imputed,
        negatives,
        positives,
    };

    Ok((Dataset { frame, schema }, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::schema::DatasetSchema;
    use polars::prelude::*;

    fn dataset(frame: DataFrame) -> Dataset {
        Dataset {
            frame,
            schema: DatasetSchema {
                id_column: "id".to_string(),
                measurement_columns: vec!["a".to_string(), "b".to_string()],
                label_column: "class".to_string(),
            },
        }
    }

    fn sample_frame() -> DataFrame {
        df! {
            "id" => [1i64, 2, 3, 4, 5],
            "a" => [Some(1i64), None, Some(3), Some(4), Some(5)],
            "b" => [Some(2i64), Some(2), Some(2), None, Some(7)],
            "class" => [2i64, 4, 2, 4, 4],
        }
        .unwrap()
    }

    #[test]
    fn test_drop_policy() {
        let (cleaned, report) =
            clean_dataset(dataset(sample_frame()), MissingPolicy::Drop, &LabelMapping::default())
                .unwrap();

        assert_eq!(cleaned.height(), 3);
        assert_eq!(report.removed_rows, vec![1, 3]);
        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 3);
        assert_eq!((report.negatives, report.positives), (2, 1));
        assert!(rows_with_missing(&cleaned.frame).is_empty());
    }

    #[test]
    fn test_impute_policy_keeps_rows() {
        let (cleaned, report) = clean_dataset(
            dataset(sample_frame()),
            MissingPolicy::ImputeMedian,
            &LabelMapping::default(),
        )
        .unwrap();

        assert_eq!(cleaned.height(), 5);
        assert_eq!(report.values_imputed, 2);
        assert!(report.removed_rows.is_empty());
    }

    #[test]
    fn test_everything_removed() {
        let frame = df! {
            "id" => [1i64, 2],
            "a" => [None::<i64>, None],
            "b" => [1i64, 2],
            "class" => [2i64, 4],
        }
        .unwrap();

        let err = clean_dataset(dataset(frame), MissingPolicy::Drop, &LabelMapping::default())
            .unwrap_err();
        assert!(matches!(err, DataIntegrityError::EmptyAfterCleaning { removed: 2 }));
    }

    #[test]
    fn test_unmapped_label_after_drop_points_at_input_row() {
        let frame = df! {
            "id" => [1i64, 2, 3],
            "a" => [None, Some(1i64), Some(2)],
            "b" => [1i64, 2, 3],
            "class" => [2i64, 4, 7],
        }
        .unwrap();

        let err = clean_dataset(dataset(frame), MissingPolicy::Drop, &LabelMapping::default())
            .unwrap_err();
        match err {
            DataIntegrityError::UnmappedLabel { row, .. } => assert_eq!(row, 2),
            other => panic!("expected UnmappedLabel, got {:?}", other),
        }
    }
}
