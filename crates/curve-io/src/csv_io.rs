//! CSV Reading and Writing

use crate::StorageError;
use curve_model::{CurveError, CurveTable, NormalizedCurve, FLUX_COLUMN, TIME_COLUMN};
use feature_engine::LabeledFeatures;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Source column names mapped onto the canonical `time`/`flux` columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Source column used as time
    pub time_source: String,
    /// Source column used as flux
    pub flux_source: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            time_source: "timecorr".to_string(),
            flux_source: "pdcsap_flux".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Canonical two-column table. Absent source columns stay absent.
    pub fn apply(&self, raw: &CurveTable) -> Result<CurveTable, CurveError> {
        let mut table = CurveTable::new();
        for (source, target) in [
            (self.time_source.as_str(), TIME_COLUMN),
            (self.flux_source.as_str(), FLUX_COLUMN),
        ] {
            if let Some(values) = raw.column(source) {
                table.push_column(target, values.to_vec())?;
            }
        }
        Ok(table)
    }
}

/// Read every column of a CSV file. Empty or non-numeric cells become missing.
pub fn read_table(path: impl AsRef<Path>) -> Result<CurveTable, StorageError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    parse_table(file, path)
}

/// Read a raw curve and map its source columns
pub fn read_curve(
    path: impl AsRef<Path>,
    mapping: &ColumnMapping,
) -> Result<CurveTable, StorageError> {
    let path = path.as_ref();
    let raw = read_table(path)?;
    mapping.apply(&raw).map_err(|source| StorageError::Table {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a normalized curve as `time,flux`; missing cells are left empty
pub fn write_normalized(curve: &NormalizedCurve, path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([TIME_COLUMN, FLUX_COLUMN])
        .map_err(|e| StorageError::csv(path, e))?;
    for point in curve.points() {
        writer
            .write_record([format_cell(point.time), format_cell(point.flux)])
            .map_err(|e| StorageError::csv(path, e))?;
    }

    flush(writer, path)?;
    debug!("Wrote {} rows to {}", curve.len(), path.display());
    Ok(())
}

/// Write the feature matrix as `id,label,<feature columns>`
pub fn write_features(features: &LabeledFeatures, path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    let matrix = &features.matrix;
    let header: Vec<&str> = ["id", "label"]
        .into_iter()
        .chain(matrix.names().iter().map(String::as_str))
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| StorageError::csv(path, e))?;

    for ((id, label), row) in matrix
        .ids()
        .iter()
        .zip(&features.labels)
        .zip(matrix.values().rows())
    {
        let record: Vec<String> = [id.to_string(), label.as_u8().to_string()]
            .into_iter()
            .chain(row.iter().map(|v| v.to_string()))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| StorageError::csv(path, e))?;
    }

    flush(writer, path)?;
    debug!(
        "Wrote {} x {} feature matrix to {}",
        matrix.n_rows(),
        matrix.n_columns(),
        path.display()
    );
    Ok(())
}

fn parse_table<R: Read>(input: R, path: &Path) -> Result<CurveTable, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| StorageError::csv(path, e))?
        .clone();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record.map_err(|e| StorageError::csv(path, e))?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(field.parse::<f64>().ok());
        }
    }

    let mut table = CurveTable::new();
    for (name, values) in headers.iter().zip(columns) {
        table
            .push_column(name, values)
            .map_err(|source| StorageError::Table {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(table)
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flush<W: Write>(mut writer: csv::Writer<W>, path: &Path) -> Result<(), StorageError> {
    writer.flush().map_err(|e| StorageError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_model::CurvePoint;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_raw_curve_with_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("star.csv");
        fs::write(
            &path,
            "time,timecorr,pdcsap_flux,quality\n\
             1.0,0.5,100.0,0\n\
             2.0,0.6,,0\n\
             3.0,0.7,nan,0\n\
             4.0,0.8,102.5,0\n",
        )
        .unwrap();

        let table = read_curve(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(
            table.column(TIME_COLUMN).unwrap(),
            &[Some(0.5), Some(0.6), Some(0.7), Some(0.8)]
        );
        assert_eq!(
            table.column(FLUX_COLUMN).unwrap(),
            &[Some(100.0), None, None, Some(102.5)]
        );
    }

    #[test]
    fn test_missing_source_column_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sap_only.csv");
        fs::write(&path, "timecorr,sap_flux\n0.1,5.0\n").unwrap();

        let table = read_curve(&path, &ColumnMapping::default()).unwrap();
        assert!(table.has_column(TIME_COLUMN));
        assert!(!table.has_column(FLUX_COLUMN));
    }

    #[test]
    fn test_ragged_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "timecorr,pdcsap_flux\n0.1,5.0\n0.2\n").unwrap();

        let result = read_table(&path);
        assert!(matches!(result, Err(StorageError::Csv { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = read_table(dir.path().join("nope.csv"));
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_normalized_curve_roundtrip_keeps_padding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let curve = NormalizedCurve::new(
            vec![
                CurvePoint::observed(0.0, -0.25),
                CurvePoint::observed(1.5, 1.0),
                CurvePoint::padding(),
            ],
            2,
            10.0,
            4.0,
        );

        write_normalized(&curve, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,flux\n0,-0.25\n"));

        let table = read_table(&path).unwrap();
        assert_eq!(table, curve.to_table());
    }
}
