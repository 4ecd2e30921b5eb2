//! Robust Scaling Statistics

/// Median of the values, averaging the two middle elements for even counts.
///
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation (divisor `n`)
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Centre and divisor applied to a curve's flux
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustScale {
    pub median: f64,
    pub spread: f64,
}

impl RobustScale {
    /// Compute from real observations. A zero spread is replaced by 1.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let median = median(values)?;
        let std = population_std(values)?;
        let spread = if std > 0.0 { std } else { 1.0 };
        Some(Self { median, spread })
    }

    /// Apply the scaling to one value
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.median) / self.spread
    }
}
