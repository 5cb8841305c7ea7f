//! Text report and summary tables for a benchmark run

use std::fmt::Write as _;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleaningReport, CompletenessSummary, ModelOutcome, ModelResult};
use crate::utils::format_duration;

/// One line per candidate, in bench order.
///
/// Scored candidates show mean fold accuracy as a percentage with two
/// decimals; failed ones show the failure kind and message. The output
/// depends only on `results`.
pub fn format_report(results: &[ModelResult]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = match &result.outcome {
            ModelOutcome::Scored(score) => writeln!(
                out,
                "model name: {}, accuracy: {:.2}",
                result.name,
                score.cv_accuracy * 100.0
            ),
            ModelOutcome::Failed { kind, message } => writeln!(
                out,
                "model name: {}, accuracy: FAILED [{}] {}",
                result.name, kind, message
            ),
        };
    }
    out
}

/// Best scored candidate; earlier candidates win ties
pub fn best_candidate(results: &[ModelResult]) -> Option<&ModelResult> {
    results
        .iter()
        .filter_map(|r| r.cv_accuracy().map(|acc| (r, acc)))
        .fold(None, |best: Option<(&ModelResult, f64)>, (r, acc)| match best {
            Some((_, best_acc)) if best_acc >= acc => best,
            _ => Some((r, acc)),
        })
        .map(|(r, _)| r)
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!(
        "    {} {}",
        style(icon).cyan(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Per-column types and missing counts of the loaded frame
pub fn display_completeness(summary: &CompletenessSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Present").add_attribute(Attribute::Bold),
        Cell::new("Missing").add_attribute(Attribute::Bold),
    ]);
    for column in &summary.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(&column.dtype),
            Cell::new(column.non_missing),
            Cell::new(column.missing).fg(if column.missing == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
    }
    println!();
    print_indented(&table);
}

/// Results table plus timings, shown at the end of a run
#[derive(Debug, Default)]
pub struct BenchSummary {
    pub rows_loaded: usize,
    pub rows_removed: usize,
    pub values_imputed: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub load_time: Option<Duration>,
    pub clean_time: Option<Duration>,
    pub prepare_time: Option<Duration>,
    pub bench_time: Option<Duration>,
    pub plot_time: Option<Duration>,
}

impl BenchSummary {
    pub fn new(rows_loaded: usize) -> Self {
        Self {
            rows_loaded,
            ..Default::default()
        }
    }

    pub fn record_cleaning(&mut self, report: &CleaningReport) {
        self.rows_removed = report.rows_removed();
        self.values_imputed = report.values_imputed;
    }

    pub fn set_partition(&mut self, train_rows: usize, test_rows: usize) {
        self.train_rows = train_rows;
        self.test_rows = test_rows;
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_clean_time(&mut self, elapsed: Duration) {
        self.clean_time = Some(elapsed);
    }

    pub fn set_prepare_time(&mut self, elapsed: Duration) {
        self.prepare_time = Some(elapsed);
    }

    pub fn set_bench_time(&mut self, elapsed: Duration) {
        self.bench_time = Some(elapsed);
    }

    pub fn set_plot_time(&mut self, elapsed: Duration) {
        self.plot_time = Some(elapsed);
    }

    /// Table of candidate scores, with the best cross-validated score highlighted
    pub fn results_table(results: &[ModelResult]) -> Table {
        let best = best_candidate(results).map(|r| r.name.as_str());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Model").add_attribute(Attribute::Bold),
            Cell::new("CV accuracy").add_attribute(Attribute::Bold),
            Cell::new("CV std").add_attribute(Attribute::Bold),
            Cell::new("Holdout").add_attribute(Attribute::Bold),
        ]);

        for result in results {
            match &result.outcome {
                ModelOutcome::Scored(score) => {
                    let mut acc = Cell::new(format!("{:.2}%", score.cv_accuracy * 100.0));
                    if Some(result.name.as_str()) == best {
                        acc = acc.fg(Color::Green).add_attribute(Attribute::Bold);
                    }
                    table.add_row(vec![
                        Cell::new(&result.name),
                        acc,
                        Cell::new(format!("{:.2}", score.cv_std * 100.0)),
                        Cell::new(format!("{:.2}%", score.holdout_accuracy * 100.0)),
                    ]);
                }
                ModelOutcome::Failed { kind, .. } => {
                    table.add_row(vec![
                        Cell::new(&result.name),
                        Cell::new(format!("FAILED [{}]", kind)).fg(Color::Red),
                        Cell::new("-"),
                        Cell::new("-"),
                    ]);
                }
            }
        }
        table
    }

    pub fn display(&self, results: &[ModelResult]) {
        print_section("📋", "MODEL COMPARISON");
        print_indented(&Self::results_table(results));

        print_section("📝", "RUN SUMMARY");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![Cell::new("📁 Rows loaded"), Cell::new(self.rows_loaded)]);
        table.add_row(vec![
            Cell::new("🗑️  Rows removed"),
            Cell::new(self.rows_removed).fg(if self.rows_removed == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        if self.values_imputed > 0 {
            table.add_row(vec![
                Cell::new("🩹 Values imputed"),
                Cell::new(self.values_imputed).fg(Color::Yellow),
            ]);
        }
        table.add_row(vec![
            Cell::new("✂️  Train / test"),
            Cell::new(format!("{} / {}", self.train_rows, self.test_rows)),
        ]);
        if let Some(best) = best_candidate(results) {
            table.add_row(vec![
                Cell::new("🏆 Best model"),
                Cell::new(&best.name)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        let timings = [
            ("Load", self.load_time),
            ("Clean", self.clean_time),
            ("Partition & scale", self.prepare_time),
            ("Benchmark", self.bench_time),
            ("Plots", self.plot_time),
        ];
        let mut total = Duration::ZERO;
        for (label, elapsed) in timings {
            if let Some(elapsed) = elapsed {
                total += elapsed;
                table.add_row(vec![
                    Cell::new(format!("⏱  {}", label)),
                    Cell::new(format_duration(elapsed)),
                ]);
            }
        }
        table.add_row(vec![
            Cell::new("⏱  Total"),
            Cell::new(format_duration(total)).add_attribute(Attribute::Bold),
        ]);

        print_indented(&table);
    }
}
