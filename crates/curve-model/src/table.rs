//! Named Column Table

use crate::error::CurveError;
use serde::{Deserialize, Serialize};

/// A single named column of optional values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Ordered set of equal-length numeric columns.
///
/// Cells are `Option<f64>`; a `NaN` handed to the table is stored as `None`
/// so missing values have exactly one representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveTable {
    columns: Vec<Column>,
    rows: usize,
}

impl CurveTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`CurveTable::push_column`]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, CurveError> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Builder-style helper for dense columns; `NaN` becomes missing
    pub fn with_values(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Self, CurveError> {
        self.with_column(name, values.into_iter().map(Some).collect())
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), CurveError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(CurveError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.rows {
            return Err(CurveError::ColumnLength {
                column: name,
                expected: self.rows,
                actual: values.len(),
            });
        }

        self.rows = values.len();
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Two-column table from columns zipped out of the same rows
    pub(crate) fn from_pair(
        first: &str,
        first_values: Vec<Option<f64>>,
        second: &str,
        second_values: Vec<Option<f64>>,
    ) -> Self {
        debug_assert_eq!(first_values.len(), second_values.len());
        debug_assert_ne!(first, second);

        let rows = first_values.len();
        let column = |name: &str, values: Vec<Option<f64>>| Column {
            name: name.to_string(),
            values: values.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect(),
        };
        Self {
            columns: vec![column(first, first_values), column(second, second_values)],
            rows,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Rename a column. Returns false if `from` is absent or `to` is taken.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from != to && self.has_column(to) {
            return false;
        }
        match self.columns.iter_mut().find(|c| c.name == from) {
            Some(column) => {
                column.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Names from `required` that the table does not have
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Rows of `(a, b)` where both cells are present, in table order.
    ///
    /// Returns `None` if either column is absent.
    pub fn complete_pairs(&self, a: &str, b: &str) -> Option<Vec<(f64, f64)>> {
        let left = self.column(a)?;
        let right = self.column(b)?;
        Some(
            left.iter()
                .zip(right)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_stored_as_missing() {
        let table = CurveTable::new()
            .with_values("flux", [1.0, f64::NAN, 3.0])
            .unwrap();
        assert_eq!(table.column("flux").unwrap(), &[Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_column_length_mismatch() {
        let result = CurveTable::new()
            .with_values("time", [0.0, 1.0])
            .unwrap()
            .with_values("flux", [1.0]);
        assert_eq!(
            result,
            Err(CurveError::ColumnLength {
                column: "flux".into(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_duplicate_column() {
        let result = CurveTable::new()
            .with_values("time", [0.0])
            .unwrap()
            .with_values("time", [1.0]);
        assert_eq!(result, Err(CurveError::DuplicateColumn("time".into())));
    }

    #[test]
    fn test_complete_pairs_skips_gaps() {
        let table = CurveTable::new()
            .with_column("time", vec![Some(0.0), None, Some(2.0), Some(3.0)])
            .unwrap()
            .with_column("flux", vec![Some(10.0), Some(11.0), None, Some(13.0)])
            .unwrap();

        assert_eq!(
            table.complete_pairs("time", "flux").unwrap(),
            vec![(0.0, 10.0), (3.0, 13.0)]
        );
        assert!(table.complete_pairs("time", "pdcsap_flux").is_none());
    }

    #[test]
    fn test_rename_and_missing_columns() {
        let mut table = CurveTable::new()
            .with_values("timecorr", [0.0])
            .unwrap()
            .with_values("pdcsap_flux", [1.0])
            .unwrap();

        assert_eq!(table.missing_columns(&["time", "flux"]), vec!["time", "flux"]);
        assert!(table.rename_column("timecorr", "time"));
        assert!(!table.rename_column("pdcsap_flux", "time"));
        assert!(!table.rename_column("sap_flux", "flux"));
        assert_eq!(table.missing_columns(&["time", "flux"]), vec!["flux"]);
    }
}
