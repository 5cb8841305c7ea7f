//! Outcome label mapping
//!
//! Raw outcome labels arrive as two arbitrary integers (2 for benign and 4
//! for malignant in the Wisconsin data). This module remaps them to the 0/1
//! encoding every classifier expects.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::DataIntegrityError;

/// Mapping from the two raw label values to binary 0/1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    /// Raw value that maps to 0
    pub negative: i64,
    /// Raw value that maps to 1
    pub positive: i64,
}

impl Default for LabelMapping {
    fn default() -> Self {
        Self {
            negative: 2,
            positive: 4,
        }
    }
}

impl LabelMapping {
    pub fn new(negative: i64, positive: i64) -> Self {
        Self { negative, positive }
    }

    /// Binary class for a raw value, if it is one of the two mapped values
    pub fn map(&self, raw: i64) -> Option<i64> {
        if raw == self.negative {
            Some(0)
        } else if raw == self.positive {
            Some(1)
        } else {
            None
        }
    }
}

/// Replace the label column with its 0/1 encoding.
///
/// `row_ids` gives the original row number of each frame row so errors point
/// back at the input file. Fails on the first unmapped or missing label.
pub fn remap_labels(
    df: &mut DataFrame,
    column: &str,
    mapping: &LabelMapping,
    row_ids: &[usize],
) -> Result<(), DataIntegrityError> {
    let frame_error = |e: PolarsError| DataIntegrityError::Frame(e.to_string());

    let raw: Vec<Option<i64>> = df
        .column(column)
        .map_err(frame_error)?
        .cast(&DataType::Int64)
        .map_err(frame_error)?
        .i64()
        .map_err(frame_error)?
        .into_iter()
        .collect();

    let mut mapped = Vec::with_capacity(raw.len());
    for (i, value) in raw.iter().enumerate() {
        match value.and_then(|v| mapping.map(v)) {
            Some(binary) => mapped.push(binary),
            None => {
                return Err(DataIntegrityError::UnmappedLabel {
                    row: row_ids.get(i).copied().unwrap_or(i),
                    column: column.to_string(),
                    value: value.map_or_else(|| "null".to_string(), |v| v.to_string()),
                })
            }
        }
    }

    df.with_column(Column::new(column.into(), mapped))
        .map_err(frame_error)?;
    Ok(())
}

/// Count (negatives, positives) in an already remapped label column
pub fn class_counts(df: &DataFrame, column: &str) -> Result<(usize, usize), DataIntegrityError> {
    let labels = df
        .column(column)
        .map_err(|e| DataIntegrityError::Frame(e.to_string()))?
        .i64()
        .map_err(|e| DataIntegrityError::Frame(e.to_string()))?;

    let positives = labels.into_iter().filter(|v| *v == Some(1)).count();
    let negatives = labels.into_iter().filter(|v| *v == Some(0)).count();
    Ok((negatives, positives))
}
