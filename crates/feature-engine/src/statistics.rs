//! Per-Series Statistics

/// Central moments and range of a flux series
#[derive(Debug, Clone, Default)]
pub struct StatisticalFeatures {
    pub mean: f64,
    /// Population variance (divisor `n`)
    pub variance: f64,
    pub std_dev: f64,
    /// Third standardized moment, 0 for a flat series
    pub skewness: f64,
    /// Excess kurtosis, 0 for a flat series
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    /// Mean of `|x[i+1] - x[i]|`
    pub mean_abs_change: f64,
    /// Crossings of the mean, counted as by [`number_crossing`]
    pub mean_crossings: usize,
}

impl StatisticalFeatures {
    /// Moments of `values`; all zero for an empty slice
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let [m2, m3, m4] = values.iter().fold([0.0; 3], |[a, b, c], &v| {
            let d = v - mean;
            let d2 = d * d;
            [a + d2, b + d2 * d, c + d2 * d2]
        });
        let variance = m2 / n;
        let std_dev = variance.sqrt();
        let (skewness, kurtosis) = if std_dev > 0.0 {
            (m3 / n / variance.powf(1.5), m4 / n / (variance * variance) - 3.0)
        } else {
            (0.0, 0.0)
        };

        let mean_abs_change = if values.len() > 1 {
            values.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let mean_crossings = number_crossing(values, mean);

        Self {
            mean,
            variance,
            std_dev,
            skewness,
            kurtosis,
            min,
            max,
            mean_abs_change,
            mean_crossings,
        }
    }
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending. Returns NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Ascending copy of the values
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Autocorrelation at `lag`; NaN when undefined
pub fn autocorrelation(values: &[f64], lag: usize, mean: f64, variance: f64) -> f64 {
    let n = values.len();
    if lag >= n || variance == 0.0 {
        return f64::NAN;
    }
    let sum: f64 = values[..n - lag]
        .iter()
        .zip(&values[lag..])
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum();
    sum / ((n - lag) as f64 * variance)
}

/// Non-linearity measure `mean(x[i + 2lag] * x[i + lag] * x[i])`
pub fn c3(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if 2 * lag >= n {
        return 0.0;
    }
    let terms = n - 2 * lag;
    (0..terms)
        .map(|i| values[i + 2 * lag] * values[i + lag] * values[i])
        .sum::<f64>()
        / terms as f64
}

/// Complexity estimate `sqrt(sum(diff(x)^2))`
pub fn cid_ce(values: &[f64]) -> f64 {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]) * (w[1] - w[0]))
        .sum::<f64>()
        .sqrt()
}

/// Shannon entropy of an equal-width histogram with `bins` bins
pub fn binned_entropy(values: &[f64], min: f64, max: f64, bins: usize) -> f64 {
    if values.is_empty() || bins == 0 || max <= min {
        return 0.0;
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let n = values.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

/// Longest run of consecutive values satisfying `pred`
pub fn longest_strike(values: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &v in values {
        if pred(v) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Number of times the series crosses level `m`
pub fn number_crossing(values: &[f64], m: f64) -> usize {
    values.windows(2).filter(|w| (w[0] > m) != (w[1] > m)).count()
}

/// Least-squares fit of the values against their index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub rvalue: f64,
    pub stderr: f64,
}

impl LinearTrend {
    /// Fit `values[i] = slope * i + intercept`
    pub fn fit(values: &[f64]) -> Self {
        let n = values.len();
        if n < 2 {
            return Self {
                slope: f64::NAN,
                intercept: f64::NAN,
                rvalue: f64::NAN,
                stderr: f64::NAN,
            };
        }

        let nf = n as f64;
        let x_mean = (nf - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / nf;

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            let dy = y - y_mean;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;
        let (rvalue, stderr) = if syy == 0.0 {
            (f64::NAN, 0.0)
        } else {
            let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
            let stderr = if n > 2 {
                ((1.0 - r * r) * syy / sxx / (nf - 2.0)).sqrt()
            } else {
                0.0
            };
            (r, stderr)
        };

        Self {
            slope,
            intercept,
            rvalue,
            stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments() {
        let stats = StatisticalFeatures::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!((stats.min, stats.max), (2.0, 9.0));
        assert!(stats.skewness > 0.0);
    }

    #[test]
    fn test_symmetric_series_has_no_skew() {
        let stats = StatisticalFeatures::compute(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert!(stats.skewness.abs() < 1e-12);
        assert!((stats.kurtosis - (-1.3)).abs() < 1e-12);
    }

    #[test]
    fn test_changes_and_mean_crossings() {
        // mean is 5
        let stats = StatisticalFeatures::compute(&[3.0, 7.0, 4.0, 8.0, 2.0, 6.0]);
        assert_eq!(stats.mean_crossings, 5);
        assert_eq!(stats.mean_abs_change, 4.2);
    }

    #[test]
    fn test_flat_and_empty_series() {
        let flat = StatisticalFeatures::compute(&[3.0; 8]);
        assert_eq!((flat.std_dev, flat.skewness, flat.kurtosis), (0.0, 0.0, 0.0));
        assert_eq!(StatisticalFeatures::compute(&[]).mean, 0.0);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_autocorrelation_of_alternating_series() {
        let values = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let ac = autocorrelation(&values, 1, 0.0, 1.0);
        assert!((ac + 1.0).abs() < 1e-12);
        assert!(autocorrelation(&values, 1, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_linear_trend_exact_line() {
        let values: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let trend = LinearTrend::fit(&values);
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 3.0).abs() < 1e-12);
        assert!((trend.rvalue - 1.0).abs() < 1e-12);
        assert!(trend.stderr.abs() < 1e-9);
    }

    #[test]
    fn test_binned_entropy_bounds() {
        assert_eq!(binned_entropy(&[1.0; 5], 1.0, 1.0, 10), 0.0);
        let uniform: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let entropy = binned_entropy(&uniform, 0.0, 9.0, 10);
        assert!((entropy - (10.0f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_strikes_and_crossings() {
        let values = [1.0, 2.0, -1.0, 3.0, 4.0, 5.0, -2.0];
        assert_eq!(longest_strike(&values, |v| v > 0.0), 3);
        assert_eq!(number_crossing(&values, 0.0), 3);
        assert_eq!(cid_ce(&[0.0, 3.0, 7.0]), 5.0);
        assert_eq!(c3(&[1.0, 2.0, 3.0], 2), 0.0);
    }
}
