//! Schema and Row Count Validation

use curve_model::{CurveError, CurveTable, FLUX_COLUMN, TIME_COLUMN};
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Name of the time column
    pub time_field: String,
    /// Name of the flux column
    pub flux_field: String,
    /// Fewest complete rows a curve may have
    pub min_valid_rows: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            time_field: TIME_COLUMN.to_string(),
            flux_field: FLUX_COLUMN.to_string(),
            min_valid_rows: 100,
        }
    }
}

/// Validator for raw curve tables
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check that both required columns exist. No guessing of alternative names.
    pub fn validate_schema(&self, table: &CurveTable) -> Result<(), CurveError> {
        let missing =
            table.missing_columns(&[self.config.time_field.as_str(), self.config.flux_field.as_str()]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CurveError::MissingFields(missing))
        }
    }

    /// Check the number of usable rows against the minimum
    pub fn validate_row_count(&self, rows: usize) -> Result<(), CurveError> {
        if rows < self.config.min_valid_rows {
            Err(CurveError::InsufficientData {
                rows,
                minimum: self.config.min_valid_rows,
            })
        } else {
            Ok(())
        }
    }

    /// Validate the table and return its complete `(time, flux)` rows in order
    pub fn clean(&self, table: &CurveTable) -> Result<Vec<(f64, f64)>, CurveError> {
        self.validate_schema(table)?;

        let rows = table
            .complete_pairs(&self.config.time_field, &self.config.flux_field)
            .ok_or_else(|| {
                CurveError::MissingFields(vec![
                    self.config.time_field.clone(),
                    self.config.flux_field.clone(),
                ])
            })?;

        self.validate_row_count(rows.len())?;
        Ok(rows)
    }
}
