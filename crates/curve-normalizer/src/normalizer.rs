//! Fixed-Length Curve Normalization

use crate::stats::RobustScale;
use crate::validator::{ValidationConfig, Validator};
use curve_model::{CurveError, CurvePoint, CurveTable, NormalizedCurve};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Which rows to keep when a curve is longer than the segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// First `segment_length` rows
    #[default]
    Prefix,
    /// Window of `segment_length` rows centred in the curve
    Centered,
}

/// Normalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Exact row count of every normalized curve
    pub segment_length: usize,
    /// Window selection for long curves
    pub truncation: TruncationPolicy,
    /// Schema and minimum row settings
    #[serde(flatten)]
    pub validation: ValidationConfig,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            segment_length: 2000,
            truncation: TruncationPolicy::Prefix,
            validation: ValidationConfig::default(),
        }
    }
}

/// Outcome of normalizing a batch, in input order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub outcomes: Vec<(String, Result<NormalizedCurve, CurveError>)>,
}

impl BatchOutcome {
    /// Number of curves that normalized successfully
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    /// Number of rejected curves
    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }

    /// Keep only the accepted curves, preserving order
    pub fn into_accepted(self) -> Vec<(String, NormalizedCurve)> {
        self.outcomes
            .into_iter()
            .filter_map(|(id, r)| r.ok().map(|curve| (id, curve)))
            .collect()
    }
}

/// Converts raw curve tables into fixed-length normalized curves
#[derive(Debug, Clone)]
pub struct Normalizer {
    validator: Validator,
    segment_length: usize,
    truncation: TruncationPolicy,
}

impl Normalizer {
    /// Create a new normalizer
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            validator: Validator::new(config.validation),
            segment_length: config.segment_length,
            truncation: config.truncation,
        }
    }

    /// Target row count
    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    /// Normalize one curve. Rejections are logged and returned, never panicked on.
    pub fn normalize(
        &self,
        table: &CurveTable,
        identifier: &str,
    ) -> Result<NormalizedCurve, CurveError> {
        let result = self.try_normalize(table);
        match &result {
            Ok(curve) => debug!(
                "{}: normalized {} real rows (+{} padding), median={:.6}, spread={:.6}",
                identifier,
                curve.real_len(),
                curve.padding_len(),
                curve.median(),
                curve.spread()
            ),
            Err(e) => warn!("{}: curve rejected: {}", identifier, e),
        }
        result
    }

    /// Normalize a sequence of named tables independently
    pub fn normalize_batch<I, S>(&self, curves: I) -> BatchOutcome
    where
        I: IntoIterator<Item = (S, CurveTable)>,
        S: Into<String>,
    {
        let outcomes: Vec<_> = curves
            .into_iter()
            .map(|(identifier, table)| {
                let identifier = identifier.into();
                let result = self.normalize(&table, &identifier);
                (identifier, result)
            })
            .collect();

        let outcome = BatchOutcome { outcomes };
        info!(
            "Normalized batch: {} accepted, {} rejected",
            outcome.accepted_count(),
            outcome.rejected_count()
        );
        outcome
    }

    fn try_normalize(&self, table: &CurveTable) -> Result<NormalizedCurve, CurveError> {
        let rows = self.validator.clean(table)?;
        let rows = self.select_window(&rows);

        let fluxes: Vec<f64> = rows.iter().map(|&(_, flux)| flux).collect();
        let scale = RobustScale::from_values(&fluxes).ok_or(CurveError::InsufficientData {
            rows: 0,
            minimum: self.validator.config().min_valid_rows,
        })?;

        let real_len = rows.len();
        let mut points = Vec::with_capacity(self.segment_length);
        points.extend(
            rows.iter()
                .map(|&(time, flux)| CurvePoint::observed(time, scale.apply(flux))),
        );
        points.resize(self.segment_length, CurvePoint::padding());

        Ok(NormalizedCurve::new(points, real_len, scale.median, scale.spread))
    }

    fn select_window<'a>(&self, rows: &'a [(f64, f64)]) -> &'a [(f64, f64)] {
        if rows.len() <= self.segment_length {
            return rows;
        }
        let start = match self.truncation {
            TruncationPolicy::Prefix => 0,
            TruncationPolicy::Centered => (rows.len() - self.segment_length) / 2,
        };
        &rows[start..start + self.segment_length]
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}
