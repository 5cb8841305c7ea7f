//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{LoadOptions, MissingPolicy, ZeroSpreadPolicy};

/// cytobench - Compare classifiers on a cytology dataset with cross-validation
#[derive(Parser, Debug)]
#[command(name = "cytobench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV/.data/.txt or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Token that marks a missing value in the input
    #[arg(long, default_value = "?")]
    pub sentinel: String,

    /// Field separator for delimited input (single ASCII character)
    #[arg(long, default_value = ",", value_parser = validate_separator)]
    pub separator: u8,

    /// The input has no header line; columns are named from the schema
    #[arg(long, default_value = "false")]
    pub no_header: bool,

    /// JSON file describing the id, measurement and label columns.
    /// Defaults to the Wisconsin breast cancer layout.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// How to treat rows with missing values.
    /// Prompted interactively when omitted and missing values exist;
    /// "drop" under --no-confirm.
    #[arg(long, value_enum)]
    pub missing_policy: Option<MissingPolicy>,

    /// Raw label value of the negative class (maps to 0)
    #[arg(long, default_value = "2", allow_hyphen_values = true)]
    pub negative_label: i64,

    /// Raw label value of the positive class (maps to 1)
    #[arg(long, default_value = "4", allow_hyphen_values = true)]
    pub positive_label: i64,

    /// Fraction of rows held out for the test partition, strictly between 0 and 1
    #[arg(long, default_value = "0.2", value_parser = validate_holdout)]
    pub holdout: f64,

    /// Seed for the partition, the folds and stochastic models
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Number of cross-validation folds (at least 2)
    #[arg(long, default_value = "10", value_parser = validate_folds)]
    pub folds: usize,

    /// JSON file with the candidate list. Defaults to the six reference models.
    #[arg(long)]
    pub models: Option<PathBuf>,

    /// Leave zero-spread features unscaled instead of failing the run
    #[arg(long, default_value = "false")]
    pub allow_constant_features: bool,

    /// Directory for HTML charts.
    /// Defaults to '<input stem>_plots' next to the input file.
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Skip writing HTML charts
    #[arg(long, default_value = "false")]
    pub no_plots: bool,

    /// Write run metadata and results to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Skip interactive prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only)
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sentinel: self.sentinel.clone(),
            separator: self.separator,
            has_header: !self.no_header,
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn zero_spread_policy(&self) -> ZeroSpreadPolicy {
        if self.allow_constant_features {
            ZeroSpreadPolicy::Passthrough
        } else {
            ZeroSpreadPolicy::Reject
        }
    }

    /// Chart directory, or `None` when charts are disabled.
    /// The derived directory sits beside the input with a '_plots' suffix.
    pub fn plot_dir(&self) -> Option<PathBuf> {
        if self.no_plots {
            return None;
        }
        Some(self.plot_dir.clone().unwrap_or_else(|| {
            let parent = self.input.parent().unwrap_or_else(|| Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("cytobench");
            parent.join(format!("{}_plots", stem))
        }))
    }
}

/// Validator for the holdout fraction
fn validate_holdout(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "holdout must be strictly between 0.0 and 1.0, got {}",
            value
        ))
    }
}

/// Validator for the fold count
fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid fold count", s))?;

    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the field separator
fn validate_separator(s: &str) -> Result<u8, String> {
    let value = match s {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!(
            "separator must be a single ASCII character, got '{}'",
            s
        )),
    }
}
