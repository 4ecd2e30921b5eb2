//! Per-Curve Feature Extraction

use crate::error::FeatureError;
use crate::fft::FftAnalyzer;
use crate::long_table::LongTable;
use crate::matrix::FeatureTable;
use crate::statistics::{
    autocorrelation, binned_entropy, c3, cid_ce, longest_strike, number_crossing, quantile,
    sorted, LinearTrend, StatisticalFeatures,
};
use tracing::debug;

/// Pluggable extraction of one feature row per curve id.
///
/// Implementations may reorder or drop ids; callers must key on
/// [`FeatureTable::ids`] rather than on row position.
pub trait FeatureExtractor {
    /// Compute features for every id in the long table
    fn extract(&self, table: &LongTable) -> Result<FeatureTable, FeatureError>;
}

const QUANTILES: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
const AUTOCORRELATION_LAGS: usize = 10;
const C3_LAGS: usize = 3;
const SIGMA_RATIOS: [f64; 3] = [1.0, 2.0, 3.0];
const ENTROPY_BINS: usize = 10;

/// Generic time-series statistics over the value column
#[derive(Debug, Clone)]
pub struct StatisticalExtractor {
    value_name: String,
}

impl StatisticalExtractor {
    /// Create an extractor whose column names are prefixed with `value_name`
    pub fn new(value_name: impl Into<String>) -> Self {
        Self {
            value_name: value_name.into(),
        }
    }

    /// Feature names in the order [`StatisticalExtractor::compute`] emits them
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [
            "length",
            "sum_values",
            "mean",
            "median",
            "minimum",
            "maximum",
            "variance",
            "standard_deviation",
            "skewness",
            "kurtosis",
            "abs_energy",
            "root_mean_square",
            "mean_change",
            "mean_abs_change",
            "mean_second_derivative_central",
            "count_above_mean",
            "count_below_mean",
            "longest_strike_above_mean",
            "longest_strike_below_mean",
            "first_location_of_maximum",
            "last_location_of_maximum",
            "first_location_of_minimum",
            "last_location_of_minimum",
            "number_crossing_mean",
            "number_crossing_m__m_0",
            "cid_ce",
            "binned_entropy__max_bins_10",
            "variation_coefficient",
            "variance_larger_than_standard_deviation",
            "has_large_standard_deviation__r_0.25",
            "linear_trend__attr_slope",
            "linear_trend__attr_intercept",
            "linear_trend__attr_rvalue",
            "linear_trend__attr_stderr",
            "fft_power__band_low",
            "fft_power__band_medium",
            "fft_power__band_high",
            "fft_total_power",
            "fft_dominant_frequency",
            "fft_spectral_centroid",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        names.extend(QUANTILES.iter().map(|q| format!("quantile__q_{q}")));
        names.extend(SIGMA_RATIOS.iter().map(|r| format!("ratio_beyond_r_sigma__r_{r}")));
        names.extend((1..=AUTOCORRELATION_LAGS).map(|lag| format!("autocorrelation__lag_{lag}")));
        names.extend((1..=C3_LAGS).map(|lag| format!("c3__lag_{lag}")));

        names
            .into_iter()
            .map(|name| format!("{}__{}", self.value_name, name))
            .collect()
    }

    /// Compute the feature row for one time-ordered series
    pub fn compute(&self, values: &[f64], fft: &mut FftAnalyzer) -> Vec<f64> {
        let n = values.len();
        let nf = n as f64;
        let stats = StatisticalFeatures::compute(values);
        let sorted = sorted(values);
        let median = quantile(&sorted, 0.5);
        let abs_energy: f64 = values.iter().map(|v| v * v).sum();
        let trend = LinearTrend::fit(values);
        let spectrum = fft.analyze(values);

        let mean_change = if n >= 2 {
            (values[n - 1] - values[0]) / (nf - 1.0)
        } else {
            f64::NAN
        };
        let mean_second_derivative = if n >= 3 {
            values
                .windows(3)
                .map(|w| (w[2] - 2.0 * w[1] + w[0]) / 2.0)
                .sum::<f64>()
                / (nf - 2.0)
        } else {
            f64::NAN
        };

        let first_max = values.iter().position(|&v| v == stats.max).unwrap_or(0);
        let last_max = values.iter().rposition(|&v| v == stats.max).unwrap_or(0);
        let first_min = values.iter().position(|&v| v == stats.min).unwrap_or(0);
        let last_min = values.iter().rposition(|&v| v == stats.min).unwrap_or(0);

        let variation_coefficient = if stats.mean != 0.0 {
            stats.std_dev / stats.mean
        } else {
            f64::NAN
        };

        let mut row = vec![
            nf,
            values.iter().sum(),
            stats.mean,
            median,
            stats.min,
            stats.max,
            stats.variance,
            stats.std_dev,
            stats.skewness,
            stats.kurtosis,
            abs_energy,
            (abs_energy / nf).sqrt(),
            mean_change,
            stats.mean_abs_change,
            mean_second_derivative,
            values.iter().filter(|&&v| v > stats.mean).count() as f64,
            values.iter().filter(|&&v| v < stats.mean).count() as f64,
            longest_strike(values, |v| v > stats.mean) as f64,
            longest_strike(values, |v| v < stats.mean) as f64,
            first_max as f64 / nf,
            (last_max + 1) as f64 / nf,
            first_min as f64 / nf,
            (last_min + 1) as f64 / nf,
            stats.mean_crossings as f64,
            number_crossing(values, 0.0) as f64,
            cid_ce(values),
            binned_entropy(values, stats.min, stats.max, ENTROPY_BINS),
            variation_coefficient,
            bool_feature(stats.variance > stats.std_dev),
            bool_feature(stats.std_dev > 0.25 * (stats.max - stats.min)),
            trend.slope,
            trend.intercept,
            trend.rvalue,
            trend.stderr,
            spectrum.power_low,
            spectrum.power_medium,
            spectrum.power_high,
            spectrum.total_power,
            spectrum.dominant_frequency,
            spectrum.spectral_centroid,
        ];

        row.extend(QUANTILES.iter().map(|&q| quantile(&sorted, q)));
        row.extend(SIGMA_RATIOS.iter().map(|&r| {
            values
                .iter()
                .filter(|&&v| (v - stats.mean).abs() > r * stats.std_dev)
                .count() as f64
                / nf
        }));
        row.extend(
            (1..=AUTOCORRELATION_LAGS)
                .map(|lag| autocorrelation(values, lag, stats.mean, stats.variance)),
        );
        row.extend((1..=C3_LAGS).map(|lag| c3(values, lag)));

        row
    }
}

impl Default for StatisticalExtractor {
    fn default() -> Self {
        Self::new(curve_model::FLUX_COLUMN)
    }
}

impl FeatureExtractor for StatisticalExtractor {
    fn extract(&self, table: &LongTable) -> Result<FeatureTable, FeatureError> {
        let mut fft = FftAnalyzer::new();
        let names = self.feature_names();

        let rows: Vec<_> = table
            .groups()
            .into_iter()
            .map(|(id, series)| {
                let values: Vec<f64> = series.into_iter().map(|(_, v)| v).collect();
                (id, self.compute(&values, &mut fft))
            })
            .collect();

        debug!(
            "Extracted {} features for {} curves",
            names.len(),
            rows.len()
        );

        FeatureTable::from_rows(names, rows)
    }
}

fn bool_feature(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
