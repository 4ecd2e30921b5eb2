//! Fixed-Length Normalized Curve

use crate::table::CurveTable;
use crate::{FLUX_COLUMN, TIME_COLUMN};
use serde::{Deserialize, Serialize};

/// One row of a normalized curve. Padding rows have both fields `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: Option<f64>,
    pub flux: Option<f64>,
}

impl CurvePoint {
    /// A real observation
    pub fn observed(time: f64, flux: f64) -> Self {
        Self {
            time: Some(time),
            flux: Some(flux),
        }
    }

    /// A padding row
    pub fn padding() -> Self {
        Self::default()
    }

    /// Whether this row is padding
    pub fn is_padding(&self) -> bool {
        self.time.is_none() && self.flux.is_none()
    }
}

/// Curve of exactly `segment_length` rows, flux centred on the median of
/// the real observations and scaled by their standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCurve {
    points: Vec<CurvePoint>,
    real_len: usize,
    median: f64,
    spread: f64,
}

impl NormalizedCurve {
    /// Assemble a curve from already-scaled points.
    ///
    /// `real_len` is the number of leading non-padding rows.
    pub fn new(points: Vec<CurvePoint>, real_len: usize, median: f64, spread: f64) -> Self {
        debug_assert!(real_len <= points.len());
        Self {
            points,
            real_len,
            median,
            spread,
        }
    }

    /// All rows including padding
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Total row count (the segment length)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no rows
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of real observations
    pub fn real_len(&self) -> usize {
        self.real_len
    }

    /// Number of padding rows appended
    pub fn padding_len(&self) -> usize {
        self.points.len() - self.real_len
    }

    /// Median subtracted from the original flux
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Divisor applied after centring
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Real observations only, as `(time, flux)` pairs
    pub fn observations(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| Some((p.time?, p.flux?)))
    }

    /// Two-column `time`/`flux` table view
    pub fn to_table(&self) -> CurveTable {
        let (time, flux) = self.points.iter().map(|p| (p.time, p.flux)).unzip();
        CurveTable::from_pair(TIME_COLUMN, time, FLUX_COLUMN, flux)
    }
}

impl From<NormalizedCurve> for CurveTable {
    fn from(curve: NormalizedCurve) -> Self {
        curve.to_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedCurve {
        let points = vec![
            CurvePoint::observed(0.0, -1.0),
            CurvePoint::observed(1.0, 1.0),
            CurvePoint::padding(),
        ];
        NormalizedCurve::new(points, 2, 100.0, 2.0)
    }

    #[test]
    fn test_padding_accounting() {
        let curve = sample();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.real_len(), 2);
        assert_eq!(curve.padding_len(), 1);
        assert!(curve.points()[2].is_padding());
        assert!(!curve.points()[0].is_padding());
    }

    #[test]
    fn test_zero_time_is_not_padding() {
        let point = CurvePoint::observed(0.0, 0.0);
        assert!(!point.is_padding());
    }

    #[test]
    fn test_to_table_keeps_missing_markers() {
        let table = sample().to_table();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column(TIME_COLUMN).unwrap()[2], None);
        assert_eq!(table.column(FLUX_COLUMN).unwrap()[1], Some(1.0));
    }

    #[test]
    fn test_to_table_column_order() {
        let table = sample().to_table();
        let names: Vec<_> = table.column_names().collect();
        assert_eq!(names, vec![TIME_COLUMN, FLUX_COLUMN]);
        assert_eq!(table, CurveTable::from(sample()));
    }

    #[test]
    fn test_observations_skip_padding() {
        let obs: Vec<_> = sample().observations().collect();
        assert_eq!(obs, vec![(0.0, -1.0), (1.0, 1.0)]);
    }
}
