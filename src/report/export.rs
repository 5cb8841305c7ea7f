//! JSON export of a benchmark run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningReport, ModelResult, ModelScore};
use crate::report::summary::best_candidate;

/// Metadata about the run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub cytobench_version: String,
    pub input_file: String,
    pub label_column: String,
    pub holdout_fraction: f64,
    pub folds: usize,
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Headline numbers across all candidates
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub candidates: usize,
    pub scored: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_cv_accuracy: Option<f64>,
}

impl RunSummary {
    pub fn from_results(results: &[ModelResult]) -> Self {
        let failed = results.iter().filter(|r| r.is_failed()).count();
        let best = best_candidate(results);
        Self {
            candidates: results.len(),
            scored: results.len() - failed,
            failed,
            best_model: best.map(|r| r.name.clone()),
            best_cv_accuracy: best.and_then(|r| r.score()).map(|s: &ModelScore| s.cv_accuracy),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunExport<'a> {
    pub metadata: RunMetadata,
    pub summary: RunSummary,
    pub cleaning: &'a CleaningReport,
    pub results: &'a [ModelResult],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub label_column: &'a str,
    pub holdout_fraction: f64,
    pub folds: usize,
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Export the run to a pretty-printed JSON file
pub fn export_run(
    results: &[ModelResult],
    cleaning: &CleaningReport,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = RunExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            cytobench_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            label_column: params.label_column.to_string(),
            holdout_fraction: params.holdout_fraction,
            folds: params.folds,
            seed: params.seed,
            train_rows: params.train_rows,
            test_rows: params.test_rows,
        },
        summary: RunSummary::from_results(results),
        cleaning,
        results,
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize run results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    Ok(())
}
