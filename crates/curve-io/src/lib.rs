//! Light Curve Storage Layer
//!
//! Reads raw light curves from CSV, writes normalized curves and feature
//! matrices back to CSV, and drives the per-class normalization batch over the
//! `positive`/`negative` directory layout.

mod batch;
mod csv_io;
mod dataset;

pub use batch::{BatchProcessor, BatchSummary, ClassSummary};
pub use csv_io::{read_curve, read_table, write_features, write_normalized, ColumnMapping};
pub use dataset::Dataset;

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid table in {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: curve_model::CurveError,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        StorageError::Csv {
            path: path.into(),
            source,
        }
    }
}
