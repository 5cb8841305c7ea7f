//! Error types for the benchmarking pipeline.
//!
//! Each stage has its own error enum so callers can tell a bad input file
//! from a dataset that cleaned down to nothing. The fatal stages are gathered
//! into [`PipelineError`]; [`ModelFitError`] stays local to a single candidate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file does not exist.
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// File extension is not one of the supported formats.
    #[error("unsupported file format '{extension}' for {}. Supported formats: csv, data, txt, parquet", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The reader could not parse the file.
    #[error("failed to parse {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    /// A row has fewer fields than the file has columns, or an empty field.
    #[error("{}: row {row} has no value for column '{column}'", path.display())]
    MissingField {
        path: PathBuf,
        row: usize,
        column: String,
    },

    /// Column count differs from the schema.
    #[error("schema mismatch: expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// A schema column is absent from the file header.
    #[error("column '{column}' not found in input. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A measurement or label column holds something other than integers.
    #[error("column '{column}' must hold integer values, found {found}")]
    NonIntegral { column: String, found: String },

    /// The schema file could not be read.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

/// Errors raised while cleaning the dataset.
#[derive(Debug, Error)]
pub enum DataIntegrityError {
    /// Every row was removed by the missing value policy.
    #[error("dataset is empty after cleaning ({removed} row(s) removed)")]
    EmptyAfterCleaning { removed: usize },

    /// A label outside the two configured raw values.
    #[error("row {row}: label '{value}' in column '{column}' is neither the negative nor the positive value")]
    UnmappedLabel {
        row: usize,
        column: String,
        value: String,
    },

    /// Only one outcome class survived cleaning.
    #[error("column '{column}' holds a single class after cleaning; two are required")]
    SingleClass { column: String },

    /// A missing value reached the feature splitter.
    #[error("row {row}: column '{column}' is missing after cleaning")]
    MissingAfterCleaning { row: usize, column: String },

    /// Underlying frame operation failed.
    #[error("data frame operation failed: {0}")]
    Frame(String),
}

/// A feature column with zero spread.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("feature '{column}' has zero spread and cannot be standardized")]
pub struct DegenerateFeatureError {
    pub column: String,
}

/// Errors raised by the train/test partitioner and the fold builder.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("holdout fraction must be strictly between 0 and 1, got {0}")]
    InvalidFraction(f64),

    #[error("features have {features} rows but targets have {targets}")]
    LengthMismatch { features: usize, targets: usize },

    #[error("holdout fraction {fraction} on {rows} rows leaves an empty {side} partition")]
    EmptyPartition {
        fraction: f64,
        rows: usize,
        side: &'static str,
    },

    #[error("cannot build {folds} folds from {rows} rows (need 2 <= folds <= rows)")]
    InvalidFolds { folds: usize, rows: usize },
}

/// A single candidate's failure to fit or evaluate.
#[derive(Debug, Error)]
pub enum ModelFitError {
    #[error(transparent)]
    DegenerateFeature(#[from] DegenerateFeatureError),

    #[error("{model}: invalid parameter: {message}")]
    InvalidParameter { model: String, message: String },

    #[error("{model}: fit failed: {message}")]
    Fit { model: String, message: String },

    #[error("{model}: predict called before fit")]
    NotFitted { model: String },

    #[error("{model}: expected {expected} feature columns, got {found}")]
    ShapeMismatch {
        model: String,
        expected: usize,
        found: usize,
    },
}

impl ModelFitError {
    pub fn fit(model: &str, err: impl std::fmt::Display) -> Self {
        ModelFitError::Fit {
            model: model.to_string(),
            message: err.to_string(),
        }
    }

    pub fn invalid(model: &str, message: impl Into<String>) -> Self {
        ModelFitError::InvalidParameter {
            model: model.to_string(),
            message: message.into(),
        }
    }
}

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    DegenerateFeature(#[from] DegenerateFeatureError),

    #[error("feature matrix has {found} columns but the scaler was fit on {expected}")]
    ShapeMismatch { expected: usize, found: usize },
}
