//! cytobench: classifier benchmarking CLI
//!
//! Loads a cytology dataset, cleans it, and ranks candidate classifiers by
//! cross-validated accuracy.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use cytobench::cli::{load_candidates, select_missing_policy, Cli};
use cytobench::pipeline::{
    clean_dataset, load_dataset, prepare_partitions, rows_with_missing, run_bench,
    split_features_target, BenchConfig, DatasetSchema, LabelMapping, MissingPolicy,
};
use cytobench::report::{export_run, format_report, write_all_plots, BenchSummary, ExportParams};
use cytobench::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
    RunCard,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let schema = match &cli.schema {
        Some(path) => DatasetSchema::from_json_file(path)?,
        None => DatasetSchema::default(),
    };
    let candidates = load_candidates(cli.models.as_deref())?;
    let plot_dir = cli.plot_dir();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(&RunCard {
        input: &cli.input,
        label_column: &schema.label_column,
        plot_dir: plot_dir.as_deref(),
        candidates: candidates.len(),
        holdout: cli.holdout,
        folds: cli.folds,
        seed: cli.seed,
    });

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading input file...");
    let (dataset, completeness) = load_dataset(&cli.input, &schema, &cli.load_options())
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    finish_with_success(&spinner, "Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", completeness.rows);
    println!("      Columns: {}", completeness.columns.len());
    println!("      Estimated memory: {:.2} MB", completeness.memory_mb);

    let mut summary = BenchSummary::new(completeness.rows);
    cytobench::report::display_completeness(&completeness);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Clean
    print_step_header(2, "Clean Dataset");
    let step_start = Instant::now();
    let incomplete_rows = rows_with_missing(&dataset.frame).len();
    let policy = match cli.missing_policy {
        Some(policy) => policy,
        None if incomplete_rows == 0 || cli.no_confirm => MissingPolicy::Drop,
        None => select_missing_policy(incomplete_rows)?,
    };
    if incomplete_rows == 0 {
        print_info("No missing values found");
    } else {
        print_count(
            "row(s) with missing values",
            incomplete_rows,
            Some(&format!("(policy: {})", policy)),
        );
    }

    let mapping = LabelMapping::new(cli.negative_label, cli.positive_label);
    let (dataset, cleaning) = clean_dataset(dataset, policy, &mapping)?;
    if cleaning.values_imputed > 0 {
        print_success(&format!(
            "Imputed {} missing measurement(s)",
            cleaning.values_imputed
        ));
    }
    if cleaning.rows_removed() > 0 {
        print_success(&format!("Removed {} row(s)", cleaning.rows_removed()));
    }
    println!(
        "      Classes: {} negative ({} → 0), {} positive ({} → 1)",
        style(cleaning.negatives).yellow().bold(),
        mapping.negative,
        style(cleaning.positives).yellow().bold(),
        mapping.positive
    );
    summary.record_cleaning(&cleaning);
    let clean_elapsed = step_start.elapsed();
    summary.set_clean_time(clean_elapsed);
    print_step_time(clean_elapsed);

    // Step 3: Partition and scale
    print_step_header(3, "Partition & Scale");
    let step_start = Instant::now();
    let data = split_features_target(&dataset)?;
    let prepared = prepare_partitions(&data, cli.holdout, cli.seed, cli.zero_spread_policy())?;
    let train_rows = prepared.split.train_indices.len();
    let test_rows = prepared.split.test_indices.len();
    print_success(&format!(
        "{} training rows, {} holdout rows, {} features",
        train_rows,
        test_rows,
        data.feature_names.len()
    ));
    summary.set_partition(train_rows, test_rows);
    let prepare_elapsed = step_start.elapsed();
    summary.set_prepare_time(prepare_elapsed);
    print_step_time(prepare_elapsed);

    // Step 4: Benchmark
    print_step_header(4, "Cross-Validation Benchmark");
    let step_start = Instant::now();
    let config = BenchConfig {
        folds: cli.folds,
        seed: cli.seed,
        show_progress: true,
    };
    let results = run_bench(&candidates, prepared.bench_input(), &config)?;
    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        print_warning(&format!("{} candidate(s) failed", failed));
    }
    let bench_elapsed = step_start.elapsed();
    summary.set_bench_time(bench_elapsed);
    print_step_time(bench_elapsed);

    println!();
    print!("{}", format_report(&results));

    // Step 5: Charts and export
    if plot_dir.is_some() || cli.export.is_some() {
        print_step_header(5, "Save Results");
        let step_start = Instant::now();

        if let Some(dir) = &plot_dir {
            let spinner = create_spinner("Rendering charts...");
            let class_labels = [
                format!("negative ({})", mapping.negative),
                format!("positive ({})", mapping.positive),
            ];
            let written = write_all_plots(dir, &results, &data, &class_labels)?;
            finish_with_success(
                &spinner,
                &format!("Wrote {} chart(s) to {}", written.len(), dir.display()),
            );
        }

        if let Some(path) = &cli.export {
            let input_file = cli.input.display().to_string();
            export_run(
                &results,
                &cleaning,
                path,
                &ExportParams {
                    input_file: &input_file,
                    label_column: &schema.label_column,
                    holdout_fraction: cli.holdout,
                    folds: cli.folds,
                    seed: cli.seed,
                    train_rows,
                    test_rows,
                },
            )?;
            print_success(&format!("Results exported to {}", path.display()));
        }

        let plot_elapsed = step_start.elapsed();
        summary.set_plot_time(plot_elapsed);
        print_step_time(plot_elapsed);
    }

    // Display summary
    summary.display(&results);

    // Final completion message
    print_completion();

    Ok(())
}
