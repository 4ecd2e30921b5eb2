//! Long-Format Observation Table

use curve_model::CurveId;
use std::collections::BTreeMap;

/// One observation keyed by curve id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongRow {
    pub id: CurveId,
    pub time: f64,
    pub value: f64,
}

/// Observations of many curves stacked into one table.
///
/// Rows are kept in insertion order: curve order, then time order within a curve.
#[derive(Debug, Clone, Default)]
pub struct LongTable {
    rows: Vec<LongRow>,
}

impl LongTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all `(time, value)` observations of one curve
    pub fn push_curve(&mut self, id: CurveId, observations: &[(f64, f64)]) {
        self.rows.extend(
            observations
                .iter()
                .map(|&(time, value)| LongRow { id, time, value }),
        );
    }

    /// Append a single row
    pub fn push(&mut self, row: LongRow) {
        self.rows.push(row);
    }

    /// All rows
    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct ids in ascending order
    pub fn ids(&self) -> Vec<CurveId> {
        self.groups().into_keys().collect()
    }

    /// Values per id, each group sorted by time (stable for equal times)
    pub fn groups(&self) -> BTreeMap<CurveId, Vec<(f64, f64)>> {
        let mut groups: BTreeMap<CurveId, Vec<(f64, f64)>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.id).or_default().push((row.time, row.value));
        }
        for series in groups.values_mut() {
            series.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_curve_keeps_order() {
        let mut table = LongTable::new();
        table.push_curve(CurveId(0), &[(0.0, 1.0), (1.0, 2.0)]);
        table.push_curve(CurveId(1), &[(0.0, 3.0)]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[2], LongRow { id: CurveId(1), time: 0.0, value: 3.0 });
        assert_eq!(table.ids(), vec![CurveId(0), CurveId(1)]);
    }

    #[test]
    fn test_groups_sorted_by_time() {
        let mut table = LongTable::new();
        table.push(LongRow { id: CurveId(3), time: 2.0, value: 20.0 });
        table.push(LongRow { id: CurveId(1), time: 5.0, value: 50.0 });
        table.push(LongRow { id: CurveId(3), time: 1.0, value: 10.0 });

        let groups = table.groups();
        assert_eq!(groups[&CurveId(3)], vec![(1.0, 10.0), (2.0, 20.0)]);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![CurveId(1), CurveId(3)]);
    }
}
