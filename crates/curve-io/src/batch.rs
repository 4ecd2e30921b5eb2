//! Per-Class Normalization Batch

use crate::csv_io::{read_curve, write_normalized, ColumnMapping};
use crate::dataset::{file_name, Dataset};
use crate::StorageError;
use curve_model::{CurveError, Label};
use curve_normalizer::Normalizer;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info, warn};

/// Counts for one class directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub label: Label,
    /// Files found in the raw directory
    pub found: usize,
    /// Normalized curves written
    pub written: usize,
    /// Curves rejected by the normalizer
    pub rejected: usize,
    /// Files that could not be read or written
    pub failed: usize,
}

impl ClassSummary {
    fn new(label: Label, found: usize) -> Self {
        Self {
            label,
            found,
            written: 0,
            rejected: 0,
            failed: 0,
        }
    }
}

/// Counts for a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub classes: Vec<ClassSummary>,
}

impl BatchSummary {
    /// Summary of one class, if it was processed
    pub fn class(&self, label: Label) -> Option<&ClassSummary> {
        self.classes.iter().find(|c| c.label == label)
    }

    /// Normalized curves written across classes
    pub fn total_written(&self) -> usize {
        self.classes.iter().map(|c| c.written).sum()
    }

    /// Curves rejected or failed across classes
    pub fn total_discarded(&self) -> usize {
        self.classes.iter().map(|c| c.rejected + c.failed).sum()
    }

    /// Pretty JSON report
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

enum FileOutcome {
    Written,
    Rejected(CurveError),
}

/// Normalizes every raw curve of the dataset into the mirrored output layout
pub struct BatchProcessor {
    dataset: Dataset,
    normalizer: Normalizer,
    mapping: ColumnMapping,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(dataset: Dataset, normalizer: Normalizer, mapping: ColumnMapping) -> Self {
        Self {
            dataset,
            normalizer,
            mapping,
        }
    }

    /// Process both classes. Only failing to prepare the output layout is fatal.
    pub fn process_all(&self) -> Result<BatchSummary, StorageError> {
        self.dataset.prepare_output()?;

        let mut summary = BatchSummary::default();
        for label in Label::ALL {
            summary.classes.push(self.process_class(label)?);
        }
        Ok(summary)
    }

    /// Process one class directory
    pub fn process_class(&self, label: Label) -> Result<ClassSummary, StorageError> {
        let files = self.dataset.list_raw(label)?;
        let out_dir = self.dataset.processed_class_dir(label);
        info!("Processing {} curves of class '{}'", files.len(), label);

        let mut summary = ClassSummary::new(label, files.len());
        for path in &files {
            let name = file_name(path);
            match self.process_file(path, &out_dir.join(&name)) {
                Ok(FileOutcome::Written) => {
                    summary.written += 1;
                    counter!("curves_processed_total", "class" => label.dir_name()).increment(1);
                }
                Ok(FileOutcome::Rejected(reason)) => {
                    summary.rejected += 1;
                    counter!("curves_rejected_total", "class" => label.dir_name()).increment(1);
                    warn!("{} was discarded ({})", name, reason);
                }
                Err(e) => {
                    summary.failed += 1;
                    counter!("curves_failed_total", "class" => label.dir_name()).increment(1);
                    error!("Error processing {}: {}", name, e);
                }
            }
        }

        info!(
            "Class '{}' done: {} written, {} rejected, {} failed",
            label, summary.written, summary.rejected, summary.failed
        );
        Ok(summary)
    }

    fn process_file(&self, input: &Path, output: &Path) -> Result<FileOutcome, StorageError> {
        let table = read_curve(input, &self.mapping)?;
        match self.normalizer.normalize(&table, &file_name(input)) {
            Ok(curve) => {
                write_normalized(&curve, output)?;
                Ok(FileOutcome::Written)
            }
            Err(reason) => Ok(FileOutcome::Rejected(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_io::read_table;
    use curve_model::{FLUX_COLUMN, TIME_COLUMN};
    use curve_normalizer::NormalizerConfig;
    use std::fmt::Write as _;
    use std::fs;
    use tempfile::tempdir;

    fn raw_csv(rows: usize) -> String {
        let mut text = String::from("timecorr,pdcsap_flux\n");
        for i in 0..rows {
            writeln!(text, "{},{}", i as f64 * 0.02, 1000.0 + (i % 5) as f64).unwrap();
        }
        text
    }

    #[test]
    fn test_process_all_mirrors_layout() {
        let root = tempdir().unwrap();
        let dataset = Dataset::new(root.path().join("raw"), root.path().join("processed"));
        let positive = dataset.raw_class_dir(Label::Positive);
        let negative = dataset.raw_class_dir(Label::Negative);
        fs::create_dir_all(&positive).unwrap();
        fs::create_dir_all(&negative).unwrap();

        fs::write(positive.join("tic1.csv"), raw_csv(150)).unwrap();
        fs::write(positive.join("tic2.csv"), raw_csv(40)).unwrap();
        fs::write(negative.join("tic3.csv"), raw_csv(300)).unwrap();
        fs::write(negative.join("tic4.csv"), "timecorr,sap_flux\n0,1\n").unwrap();
        fs::write(negative.join("tic5.csv"), "timecorr,pdcsap_flux\n0,1,2\n").unwrap();

        let normalizer = Normalizer::new(NormalizerConfig {
            segment_length: 200,
            ..Default::default()
        });
        let processor = BatchProcessor::new(dataset.clone(), normalizer, ColumnMapping::default());
        let summary = processor.process_all().unwrap();

        let pos = summary.class(Label::Positive).unwrap();
        assert_eq!((pos.found, pos.written, pos.rejected, pos.failed), (2, 1, 1, 0));
        let neg = summary.class(Label::Negative).unwrap();
        assert_eq!((neg.found, neg.written, neg.rejected, neg.failed), (3, 1, 1, 1));
        assert_eq!(summary.total_written(), 2);
        assert_eq!(summary.total_discarded(), 3);

        let out = read_table(dataset.processed_class_dir(Label::Positive).join("tic1.csv")).unwrap();
        assert_eq!(out.row_count(), 200);
        assert_eq!(out.column(TIME_COLUMN).unwrap()[150], None);
        assert!(out.column(FLUX_COLUMN).unwrap()[149].is_some());

        let out = read_table(dataset.processed_class_dir(Label::Negative).join("tic3.csv")).unwrap();
        assert_eq!(out.row_count(), 200);
        assert!(!dataset.processed_class_dir(Label::Negative).join("tic4.csv").exists());
    }

    #[test]
    fn test_summary_json() {
        let summary = BatchSummary {
            classes: vec![ClassSummary::new(Label::Positive, 3)],
        };
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"label\": 1"));
        assert!(json.contains("\"found\": 3"));
    }
}
