//! Labelled Directory Layout

use crate::csv_io::read_table;
use crate::StorageError;
use curve_model::{Label, LabeledCurveSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Raw and processed roots, each with one subdirectory per class
#[derive(Debug, Clone)]
pub struct Dataset {
    raw_dir: PathBuf,
    processed_dir: PathBuf,
}

impl Dataset {
    /// Create a dataset over the given roots
    pub fn new(raw_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            processed_dir: processed_dir.into(),
        }
    }

    /// Raw input directory for a class
    pub fn raw_class_dir(&self, label: Label) -> PathBuf {
        self.raw_dir.join(label.dir_name())
    }

    /// Normalized output directory for a class
    pub fn processed_class_dir(&self, label: Label) -> PathBuf {
        self.processed_dir.join(label.dir_name())
    }

    /// Create both output class directories
    pub fn prepare_output(&self) -> Result<(), StorageError> {
        for label in Label::ALL {
            let dir = self.processed_class_dir(label);
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        Ok(())
    }

    /// Raw CSV files of a class, sorted by name
    pub fn list_raw(&self, label: Label) -> Result<Vec<PathBuf>, StorageError> {
        list_csv(&self.raw_class_dir(label))
    }

    /// Normalized CSV files of a class, sorted by name
    pub fn list_processed(&self, label: Label) -> Result<Vec<PathBuf>, StorageError> {
        list_csv(&self.processed_class_dir(label))
    }

    /// Load every normalized curve with its class label.
    ///
    /// Unreadable files are logged and skipped.
    pub fn load_labeled_set(&self) -> Result<LabeledCurveSet, StorageError> {
        let mut set = LabeledCurveSet::new();

        for label in Label::ALL {
            for path in self.list_processed(label)? {
                match read_table(&path) {
                    Ok(table) => set.push(file_name(&path), table, label),
                    Err(e) => error!("Skipping {}: {}", path.display(), e),
                }
            }
        }

        info!(
            "Loaded {} normalized curves ({} positive, {} negative)",
            set.len(),
            set.count(Label::Positive),
            set.count(Label::Negative)
        );
        Ok(set)
    }
}

/// File name as a display string
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn list_csv(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    if !dir.is_dir() {
        warn!("Directory {} does not exist, no curves listed", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))? {
        let path = entry.map_err(|e| StorageError::io(dir, e))?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_raw_sorted_and_filtered() {
        let root = tempdir().unwrap();
        let dataset = Dataset::new(root.path().join("raw"), root.path().join("processed"));
        let dir = dataset.raw_class_dir(Label::Positive);
        fs::create_dir_all(&dir).unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt"] {
            fs::write(dir.join(name), "timecorr,pdcsap_flux\n").unwrap();
        }

        let files = dataset.list_raw(Label::Positive).unwrap();
        let names: Vec<_> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
        assert!(dataset.list_raw(Label::Negative).unwrap().is_empty());
    }

    #[test]
    fn test_load_labeled_set() {
        let root = tempdir().unwrap();
        let dataset = Dataset::new(root.path().join("raw"), root.path().join("processed"));
        dataset.prepare_output().unwrap();

        fs::write(
            dataset.processed_class_dir(Label::Positive).join("p1.csv"),
            "time,flux\n0,0.5\n",
        )
        .unwrap();
        fs::write(
            dataset.processed_class_dir(Label::Negative).join("n1.csv"),
            "time,flux\n0,-0.5\n1,\n",
        )
        .unwrap();
        fs::write(
            dataset.processed_class_dir(Label::Negative).join("n2.csv"),
            "time,flux\n0\n",
        )
        .unwrap();

        let set = dataset.load_labeled_set().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), &["p1.csv".to_string(), "n1.csv".to_string()]);
        assert_eq!(set.labels(), &[Label::Positive, Label::Negative]);
        assert_eq!(set.curves()[1].row_count(), 2);
    }
}
