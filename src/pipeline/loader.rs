//! Dataset loader for delimited text and Parquet files

use std::path::{Path, PathBuf};

use polars::prelude::*;

use super::error::LoadError;
use super::schema::{ColumnRole, DatasetSchema};

/// Options controlling how the input file is parsed
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Literal token that marks a missing value
    pub sentinel: String,
    /// Field separator (CSV only)
    pub separator: u8,
    /// Whether the first line holds column names
    pub has_header: bool,
    /// Rows used for schema inference (CSV only)
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sentinel: "?".to_string(),
            separator: b',',
            has_header: true,
            infer_schema_length: 10000,
        }
    }
}

/// A loaded dataset and the schema its columns were resolved against
#[derive(Debug, Clone)]
pub struct Dataset {
    pub frame: DataFrame,
    pub schema: DatasetSchema,
}

impl Dataset {
    pub fn height(&self) -> usize {
        self.frame.height()
    }
}

/// Non-missing count for one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCompleteness {
    pub name: String,
    pub dtype: String,
    pub non_missing: usize,
    pub missing: usize,
}

/// Row count and per-column completeness of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessSummary {
    pub rows: usize,
    pub columns: Vec<ColumnCompleteness>,
    pub memory_mb: f64,
}

impl CompletenessSummary {
    pub fn from_frame(df: &DataFrame) -> Self {
        let rows = df.height();
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let missing = col.null_count();
                ColumnCompleteness {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    non_missing: rows - missing,
                    missing,
                }
            })
            .collect();

        Self {
            rows,
            columns,
            memory_mb: df.estimated_size() as f64 / (1024.0 * 1024.0),
        }
    }

    /// Columns with at least one missing value
    pub fn incomplete_columns(&self) -> Vec<&ColumnCompleteness> {
        self.columns.iter().filter(|c| c.missing > 0).collect()
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

/// Load a dataset, resolve it against the schema and summarize completeness.
///
/// The sentinel token is registered as the CSV null value, so missing entries
/// arrive as nulls. A short row or an empty field is not a missing value and
/// fails with [`LoadError::MissingField`]. Measurement and label columns must
/// be integral.
pub fn load_dataset(
    path: &Path,
    schema: &DatasetSchema,
    options: &LoadOptions,
) -> Result<(Dataset, CompletenessSummary), LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = read_frame(path, options)?;
    let frame = resolve_schema(raw, schema, options.has_header, path)?;
    let frame = enforce_integral(frame, schema, path)?;

    let summary = CompletenessSummary::from_frame(&frame);
    log::info!(
        "loaded {} rows x {} columns from {} ({} missing values)",
        summary.rows,
        summary.columns.len(),
        path.display(),
        summary.total_missing()
    );

    Ok((
        Dataset {
            frame,
            schema: schema.clone(),
        },
        summary,
    ))
}

fn read_frame(path: &Path, options: &LoadOptions) -> Result<DataFrame, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let malformed = |e: PolarsError| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    match extension.as_str() {
        "csv" | "data" | "txt" => {
            let parse_options = CsvParseOptions::default()
                .with_separator(options.separator)
                .with_null_values(Some(NullValues::AllColumnsSingle(
                    options.sentinel.as_str().into(),
                )));

            if let Some((row, column)) = first_absent_field(path, options)? {
                return Err(LoadError::MissingField {
                    path: path.to_path_buf(),
                    row,
                    column,
                });
            }

            CsvReadOptions::default()
                .with_has_header(options.has_header)
                .with_infer_schema_length(Some(options.infer_schema_length))
                .with_parse_options(parse_options)
                .try_into_reader_with_file_path(Some(PathBuf::from(path)))
                .map_err(malformed)?
                .finish()
                .map_err(malformed)
        }
        "parquet" => {
            let file = std::fs::File::open(path).map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            ParquetReader::new(file).finish().map_err(malformed)
        }
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

/// First (row, column) whose field is absent from the file.
///
/// The file is read as plain text with no null token, so only ragged rows and
/// empty fields come back null; sentinel cells stay as their literal text.
/// Rows are zero-based and exclude the header.
fn first_absent_field(
    path: &Path,
    options: &LoadOptions,
) -> Result<Option<(usize, String)>, LoadError> {
    let malformed = |e: PolarsError| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let parse_options = CsvParseOptions::default()
        .with_separator(options.separator)
        .with_missing_is_null(!options.sentinel.is_empty());
    let raw = CsvReadOptions::default()
        .with_has_header(options.has_header)
        .with_infer_schema_length(Some(0))
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .map_err(malformed)?
        .finish()
        .map_err(malformed)?;

    let mut first: Option<(usize, String)> = None;
    for column in raw.get_columns() {
        if column.null_count() == 0 {
            continue;
        }
        let row = column
            .as_materialized_series()
            .is_null()
            .into_iter()
            .position(|is_null| is_null == Some(true));
        if let Some(row) = row {
            if first.as_ref().map_or(true, |(earliest, _)| row < *earliest) {
                first = Some((row, column.name().to_string()));
            }
        }
    }
    Ok(first)
}

/// Name headerless columns from the schema, or check a header against it,
/// and return the frame in schema column order.
fn resolve_schema(
    mut df: DataFrame,
    schema: &DatasetSchema,
    has_header: bool,
    path: &Path,
) -> Result<DataFrame, LoadError> {
    if df.width() != schema.width() {
        return Err(LoadError::ColumnCount {
            expected: schema.width(),
            found: df.width(),
        });
    }

    let names = schema.column_names();
    let frame_error = |e: PolarsError| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if !has_header {
        df.set_column_names(names.iter().map(String::as_str))
            .map_err(frame_error)?;
        return Ok(df);
    }

    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &names {
        if !available.contains(name) {
            return Err(LoadError::MissingColumn {
                column: name.clone(),
                available,
            });
        }
    }

    df.select(names.iter().map(String::as_str))
        .map_err(frame_error)
}

/// Cast measurement and label columns to Int64, rejecting fractional or
/// textual content. The identifier column is left as read.
fn enforce_integral(
    mut df: DataFrame,
    schema: &DatasetSchema,
    path: &Path,
) -> Result<DataFrame, LoadError> {
    let frame_error = |e: PolarsError| LoadError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    for name in schema.column_names() {
        if schema.role_of(&name) == Some(ColumnRole::Identifier) {
            continue;
        }

        let column = df.column(&name).map_err(frame_error)?.clone();
        let dtype = column.dtype().clone();

        if dtype.is_integer() {
            if dtype != DataType::Int64 {
                let cast = column.cast(&DataType::Int64).map_err(frame_error)?;
                df.with_column(cast).map_err(frame_error)?;
            }
            continue;
        }

        if dtype.is_float() {
            let floats = column.cast(&DataType::Float64).map_err(frame_error)?;
            let fractional = floats
                .f64()
                .map_err(frame_error)?
                .into_iter()
                .flatten()
                .find(|v| v.fract() != 0.0 || !v.is_finite());
            if let Some(value) = fractional {
                return Err(LoadError::NonIntegral {
                    column: name,
                    found: format!("value {}", value),
                });
            }
            let cast = column.cast(&DataType::Int64).map_err(frame_error)?;
            df.with_column(cast).map_err(frame_error)?;
            continue;
        }

        // An all-null column reads as String; it still carries no stray text.
        if column.null_count() == column.len() {
            let cast = column.cast(&DataType::Int64).map_err(frame_error)?;
            df.with_column(cast).map_err(frame_error)?;
            continue;
        }

        let sample = column
            .cast(&DataType::String)
            .ok()
            .and_then(|c| {
                c.str()
                    .ok()
                    .and_then(|s| s.into_iter().flatten().find(|v| v.parse::<i64>().is_err()))
                    .map(|v| format!("text '{}'", v))
            })
            .unwrap_or_else(|| format!("dtype {}", dtype));

        return Err(LoadError::NonIntegral {
            column: name,
            found: sample,
        });
    }

    Ok(df)
}
