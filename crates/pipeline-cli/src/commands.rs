//! Pipeline Commands

use crate::config::PipelineConfig;
use crate::{FeaturesArgs, NormalizeArgs};
use anyhow::{bail, Context, Result};
use curve_io::{write_features, BatchProcessor, BatchSummary, Dataset};
use curve_normalizer::Normalizer;
use feature_engine::{FeatureBuilder, LabeledFeatures};
use std::fs;
use tracing::{info, warn};

/// Normalize the raw dataset into the processed layout
pub fn run_normalize(mut config: PipelineConfig, args: NormalizeArgs) -> Result<BatchSummary> {
    if let Some(dir) = args.raw_dir {
        config.paths.raw_dir = dir;
    }
    if let Some(dir) = args.processed_dir {
        config.paths.processed_dir = dir;
    }
    if let Some(length) = args.segment_length {
        config.normalizer.segment_length = length;
    }
    if config.normalizer.segment_length == 0 {
        bail!("segment length must be positive");
    }

    info!(
        "Normalizing {} -> {} (segment length {})",
        config.paths.raw_dir.display(),
        config.paths.processed_dir.display(),
        config.normalizer.segment_length
    );

    let dataset = Dataset::new(&config.paths.raw_dir, &config.paths.processed_dir);
    let processor = BatchProcessor::new(dataset, Normalizer::new(config.normalizer), config.columns);
    let summary = processor
        .process_all()
        .context("Failed to prepare the processed directory")?;

    info!(
        "Normalization complete: {} curves written, {} discarded",
        summary.total_written(),
        summary.total_discarded()
    );

    if let Some(path) = args.summary {
        fs::write(&path, summary.to_json()?)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(summary)
}

/// Build the selected feature matrix from the processed dataset
pub fn run_features(mut config: PipelineConfig, args: FeaturesArgs) -> Result<LabeledFeatures> {
    if let Some(dir) = args.processed_dir {
        config.paths.processed_dir = dir;
    }
    if let Some(path) = args.output {
        config.paths.features_path = path;
    }
    if let Some(level) = args.fdr_level {
        if !(level > 0.0 && level < 1.0) {
            bail!("fdr level must lie in (0, 1), got {}", level);
        }
        config.features.selection.fdr_level = level;
    }

    let dataset = Dataset::new(&config.paths.raw_dir, &config.paths.processed_dir);
    let set = dataset
        .load_labeled_set()
        .context("Failed to load normalized curves")?;

    let features = FeatureBuilder::new(config.features)
        .build(set.curves(), set.labels())
        .context("Feature extraction failed")?;

    for exclusion in &features.report.excluded {
        if let Some(name) = set.names().get(exclusion.index) {
            warn!("{} left out of the feature matrix: {}", name, exclusion.reason);
        }
    }

    if let Some(parent) = config.paths.features_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    write_features(&features, &config.paths.features_path)?;

    info!(
        "Feature matrix written to {} ({} curves x {} features, {} cells imputed)",
        config.paths.features_path.display(),
        features.matrix.n_rows(),
        features.matrix.n_columns(),
        features.report.imputed_cells
    );

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_io::read_table;
    use curve_model::Label;
    use std::fmt::Write as _;
    use tempfile::tempdir;

    fn raw_curve(rows: usize, offset: f64, wiggle: f64) -> String {
        let mut text = String::from("timecorr,pdcsap_flux\n");
        for i in 0..rows {
            let t = i as f64 * 0.02;
            writeln!(text, "{},{}", t, offset + wiggle * (t * 7.0).sin()).unwrap();
        }
        text
    }

    #[test]
    fn test_normalize_then_features() {
        let root = tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.paths.raw_dir = root.path().join("raw");
        config.paths.processed_dir = root.path().join("processed");
        config.paths.features_path = root.path().join("out").join("features.csv");

        for (label, wiggle) in [(Label::Positive, 50.0), (Label::Negative, 0.5)] {
            let dir = config.paths.raw_dir.join(label.dir_name());
            fs::create_dir_all(&dir).unwrap();
            for k in 0..4 {
                let text = raw_curve(120 + k * 10, 1000.0 + k as f64, wiggle);
                fs::write(dir.join(format!("tic{}.csv", k)), text).unwrap();
            }
        }

        let summary_path = root.path().join("summary.json");
        let summary = run_normalize(
            config.clone(),
            NormalizeArgs {
                raw_dir: None,
                processed_dir: None,
                segment_length: Some(300),
                summary: Some(summary_path.clone()),
            },
        )
        .unwrap();
        assert_eq!(summary.total_written(), 8);
        assert!(summary_path.exists());

        let features = run_features(
            config.clone(),
            FeaturesArgs {
                processed_dir: None,
                output: None,
                fdr_level: None,
            },
        )
        .unwrap();
        assert_eq!(features.labels.len(), 8);
        assert_eq!(features.matrix.n_rows(), 8);
        assert!(!features.matrix.has_non_finite());

        let written = read_table(&config.paths.features_path).unwrap();
        assert_eq!(written.row_count(), 8);
        assert!(written.has_column("id"));
        assert!(written.has_column("label"));
    }

    #[test]
    fn test_zero_segment_length_is_rejected() {
        let result = run_normalize(
            PipelineConfig::default(),
            NormalizeArgs {
                raw_dir: None,
                processed_dir: None,
                segment_length: Some(0),
                summary: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_features_without_curves_fails() {
        let root = tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.paths.processed_dir = root.path().join("processed");

        let result = run_features(
            config,
            FeaturesArgs {
                processed_dir: None,
                output: Some(root.path().join("features.csv")),
                fdr_level: None,
            },
        );
        assert!(result.is_err());
    }
}
