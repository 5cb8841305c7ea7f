//! Plotly HTML charts: model comparison and per-feature class means

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot};

use crate::pipeline::{FeatureTargets, ModelResult};

pub const MODEL_COMPARISON_FILE: &str = "model_comparison.html";

/// Bar chart of cross-validated accuracy (percent) per scored candidate.
///
/// Failed candidates are left off the chart.
pub fn model_comparison_plot(results: &[ModelResult]) -> Plot {
    let (names, accuracies): (Vec<String>, Vec<f64>) = results
        .iter()
        .filter_map(|r| r.cv_accuracy().map(|acc| (r.name.clone(), acc * 100.0)))
        .unzip();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(names, accuracies).name("CV accuracy"));
    plot.set_layout(
        Layout::new()
            .title("Cross-validated accuracy by model")
            .x_axis(Axis::new().title("Model"))
            .y_axis(Axis::new().title("Accuracy (%)")),
    );
    plot
}

/// Mean of every feature within each outcome class, indexed `[feature][class]`
pub fn class_means(data: &FeatureTargets) -> Vec<[f64; 2]> {
    let mut sums = vec![[0.0f64; 2]; data.features.ncols()];
    let mut counts = [0usize; 2];
    for (row, &label) in data.features.rows().into_iter().zip(data.targets.iter()) {
        let class = label.min(1);
        counts[class] += 1;
        for (j, value) in row.iter().enumerate() {
            sums[j][class] += value;
        }
    }
    sums.into_iter()
        .map(|s| {
            let mean = |c: usize| if counts[c] == 0 { 0.0 } else { s[c] / counts[c] as f64 };
            [mean(0), mean(1)]
        })
        .collect()
}

/// Bar chart of one feature's mean value per class
pub fn feature_plot(feature: &str, means: [f64; 2], class_labels: &[String; 2]) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(Bar::new(class_labels.to_vec(), means.to_vec()).name(feature));
    plot.set_layout(
        Layout::new()
            .title(format!("{} by class", feature).as_str())
            .x_axis(Axis::new().title("Class"))
            .y_axis(Axis::new().title(format!("Mean {}", feature).as_str())),
    );
    plot
}

/// `feature_<name>.html` with anything outside `[A-Za-z0-9_-]` replaced by `_`
pub fn feature_file_name(feature: &str) -> String {
    let safe: String = feature
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("feature_{}.html", safe)
}

/// Write a plot as a standalone HTML page
pub fn write_plot(plot: &Plot, path: &Path) -> Result<()> {
    std::fs::write(path, plot.to_html())
        .with_context(|| format!("Failed to write chart to {}", path.display()))
}

/// Write the comparison chart and one chart per feature into `dir`.
///
/// Returns the written paths, comparison chart first.
pub fn write_all_plots(
    dir: &Path,
    results: &[ModelResult],
    data: &FeatureTargets,
    class_labels: &[String; 2],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(data.feature_names.len() + 1);

    let path = dir.join(MODEL_COMPARISON_FILE);
    write_plot(&model_comparison_plot(results), &path)?;
    written.push(path);

    for (name, means) in data.feature_names.iter().zip(class_means(data)) {
        let path = dir.join(feature_file_name(name));
        write_plot(&feature_plot(name, means, class_labels), &path)?;
        written.push(path);
    }

    log::info!("wrote {} chart(s) to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_class_means() {
        let data = FeatureTargets {
            features: array![[1.0, 10.0], [3.0, 20.0], [5.0, 40.0]],
            targets: array![0usize, 0, 1],
            feature_names: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(class_means(&data), vec![[2.0, 5.0], [15.0, 40.0]]);
    }

    #[test]
    fn test_feature_file_name() {
        assert_eq!(feature_file_name("bare_nuclei"), "feature_bare_nuclei.html");
        assert_eq!(feature_file_name("cell size/shape"), "feature_cell_size_shape.html");
    }
}
