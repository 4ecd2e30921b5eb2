//! Column-wise Imputation of Undefined Feature Values

use crate::matrix::FeatureTable;
use crate::statistics::{quantile, sorted};
use ndarray::Axis;

/// Replace non-finite cells in place, column by column:
/// `-inf` with the finite minimum, `+inf` with the finite maximum and `NaN`
/// with the finite median. Columns without any finite value become 0.
///
/// Returns the number of replaced cells.
pub fn impute(table: &mut FeatureTable) -> usize {
    let mut replaced = 0;

    for mut column in table.values_mut().axis_iter_mut(Axis(1)) {
        let finite: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() == column.len() {
            continue;
        }

        let (low, high, median) = if finite.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sorted = sorted(&finite);
            (sorted[0], sorted[sorted.len() - 1], quantile(&sorted, 0.5))
        };

        for value in column.iter_mut() {
            if value.is_nan() {
                *value = median;
            } else if *value == f64::INFINITY {
                *value = high;
            } else if *value == f64::NEG_INFINITY {
                *value = low;
            } else {
                continue;
            }
            replaced += 1;
        }
    }

    replaced
}
