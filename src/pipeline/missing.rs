//! Missing value detection and handling

use clap::ValueEnum;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::DataIntegrityError;

/// How rows with missing values are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Remove every row that has at least one missing field
    #[default]
    Drop,
    /// Fill missing measurements with the column median; rows missing the
    /// identifier or label are still removed.
    ///
    /// Medians come from every cleaned row, before the holdout is split off,
    /// so holdout rows contribute to the filled training values.
    ImputeMedian,
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingPolicy::Drop => write!(f, "drop"),
            MissingPolicy::ImputeMedian => write!(f, "impute-median"),
        }
    }
}

fn frame_error(e: PolarsError) -> DataIntegrityError {
    DataIntegrityError::Frame(e.to_string())
}

/// Indices of rows holding at least one null, ascending
pub fn rows_with_missing(df: &DataFrame) -> Vec<usize> {
    let mut flagged = vec![false; df.height()];
    for col in df.get_columns() {
        if col.null_count() == 0 {
            continue;
        }
        for (i, is_null) in col.is_null().into_iter().enumerate() {
            if is_null == Some(true) {
                flagged[i] = true;
            }
        }
    }

    flagged
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| if f { Some(i) } else { None })
        .collect()
}

/// Keep only the rows not listed in `drop` (sorted ascending)
pub fn drop_rows(df: &DataFrame, drop: &[usize]) -> Result<DataFrame, DataIntegrityError> {
    if drop.is_empty() {
        return Ok(df.clone());
    }
    let mut keep = vec![true; df.height()];
    for &row in drop {
        keep[row] = false;
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    df.filter(&mask).map_err(frame_error)
}

/// Median of the present values, rounded half-up to an integer
pub fn integer_median(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let sum = sorted[mid - 1] + sorted[mid];
        Some(sum.div_euclid(2) + sum.rem_euclid(2))
    }
}

/// Fill nulls in the named integer columns with each column's median.
///
/// Returns the number of values filled. A column with no present values is
/// left untouched.
pub fn impute_median(
    df: &mut DataFrame,
    columns: &[String],
) -> Result<usize, DataIntegrityError> {
    let mut filled = 0usize;

    for name in columns {
        let column = df.column(name).map_err(frame_error)?;
        let nulls = column.null_count();
        if nulls == 0 {
            continue;
        }

        let values: Vec<Option<i64>> = column
            .cast(&DataType::Int64)
            .map_err(frame_error)?
            .i64()
            .map_err(frame_error)?
            .into_iter()
            .collect();

        let present: Vec<i64> = values.iter().flatten().copied().collect();
        let Some(median) = integer_median(&present) else {
            log::warn!("column '{}' has no values to impute from", name);
            continue;
        };

        let completed: Vec<i64> = values.iter().map(|v| v.unwrap_or(median)).collect();
        df.with_column(Column::new(name.as_str().into(), completed))
            .map_err(frame_error)?;
        log::debug!("imputed {} value(s) in '{}' with median {}", nulls, name, median);
        filled += nulls;
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_missing() {
        let df = df! {
            "a" => [Some(1i64), None, Some(3), Some(4)],
            "b" => [Some(1i64), Some(2), Some(3), None],
            "c" => [1i64, 2, 3, 4],
        }
        .unwrap();

        assert_eq!(rows_with_missing(&df), vec![1, 3]);
    }

    #[test]
    fn test_drop_rows() {
        let df = df! {
            "a" => [1i64, 2, 3, 4],
        }
        .unwrap();

        let kept = drop_rows(&df, &[0, 2]).unwrap();
        let values: Vec<Option<i64>> = kept.column("a").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(2), Some(4)]);
    }

    #[test]
    fn test_integer_median() {
        assert_eq!(integer_median(&[]), None);
        assert_eq!(integer_median(&[5, 1, 3]), Some(3));
        assert_eq!(integer_median(&[1, 2, 3, 4]), Some(3)); // 2.5 rounds up
        assert_eq!(integer_median(&[1, 1, 3, 3]), Some(2));
    }

    #[test]
    fn test_impute_median_fills_nulls() {
        let mut df = df! {
            "a" => [Some(1i64), None, Some(5), Some(3)],
            "b" => [1i64, 2, 3, 4],
        }
        .unwrap();

        let filled = impute_median(&mut df, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(filled, 1);
        let values: Vec<Option<i64>> = df.column("a").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(3), Some(5), Some(3)]);
    }
}
