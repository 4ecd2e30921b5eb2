//! Feature Matrix Keyed by Curve Id

use crate::error::FeatureError;
use curve_model::CurveId;
use ndarray::{Array2, ArrayView1, Axis};

/// One row of named features per curve id
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    ids: Vec<CurveId>,
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureTable {
    /// Create a table, checking that `values` is `ids.len() x names.len()`
    pub fn new(
        ids: Vec<CurveId>,
        names: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, FeatureError> {
        if values.dim() != (ids.len(), names.len()) {
            return Err(FeatureError::Shape(format!(
                "expected {}x{}, got {}x{}",
                ids.len(),
                names.len(),
                values.nrows(),
                values.ncols()
            )));
        }
        Ok(Self { ids, names, values })
    }

    /// Build from per-id rows that all follow the same column order
    pub fn from_rows(
        names: Vec<String>,
        rows: Vec<(CurveId, Vec<f64>)>,
    ) -> Result<Self, FeatureError> {
        let mut values = Array2::zeros((rows.len(), names.len()));
        let mut ids = Vec::with_capacity(rows.len());

        for (i, (id, row)) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(FeatureError::Shape(format!(
                    "row for curve {} has {} values, expected {}",
                    id,
                    row.len(),
                    names.len()
                )));
            }
            for (j, value) in row.into_iter().enumerate() {
                values[[i, j]] = value;
            }
            ids.push(id);
        }

        Self::new(ids, names, values)
    }

    /// Row keys in row order
    pub fn ids(&self) -> &[CurveId] {
        &self.ids
    }

    /// Column names in column order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dense values
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Mutable values, shape is fixed
    pub fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.ids.len()
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let j = self.names.iter().position(|n| n == name)?;
        Some(self.values.column(j))
    }

    /// Row by curve id
    pub fn row(&self, id: CurveId) -> Option<ArrayView1<'_, f64>> {
        let i = self.ids.iter().position(|&x| x == id)?;
        Some(self.values.row(i))
    }

    /// Whether any cell is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Copy keeping only the given columns, in the given order
    pub fn select_columns(&self, indices: &[usize]) -> Result<Self, FeatureError> {
        if let Some(&j) = indices.iter().find(|&&j| j >= self.names.len()) {
            return Err(FeatureError::Shape(format!(
                "column index {} out of range for {} columns",
                j,
                self.names.len()
            )));
        }

        Ok(Self {
            ids: self.ids.clone(),
            names: indices.iter().map(|&j| self.names[j].clone()).collect(),
            values: self.values.select(Axis(1), indices),
        })
    }
}
