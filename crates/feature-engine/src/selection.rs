//! Supervised Feature Selection
//!
//! Each feature is tested for association with the binary label: a Fisher
//! exact test for binary-valued features, a Mann-Whitney U test for
//! real-valued ones. The resulting p-values go through a Benjamini-Hochberg
//! (or, for dependent hypotheses, Benjamini-Yekutieli) procedure at a fixed
//! false discovery rate. Constant features are never relevant.

use crate::error::FeatureError;
use crate::matrix::FeatureTable;
use curve_model::Label;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Discrete, Hypergeometric, Normal};
use tracing::{debug, warn};

/// Pluggable selection of label-relevant feature columns
pub trait FeatureSelector {
    /// Indices of the columns to keep, ascending.
    ///
    /// `labels[i]` is the label of `features.ids()[i]`.
    fn select(&self, features: &FeatureTable, labels: &[Label]) -> Result<Vec<usize>, FeatureError>;
}

/// Selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Expected share of irrelevant features among the selected ones
    pub fdr_level: f64,
    /// Use Benjamini-Hochberg instead of Benjamini-Yekutieli
    pub hypotheses_independent: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fdr_level: 0.05,
            hypotheses_independent: false,
        }
    }
}

/// Hypothesis-test based selector
#[derive(Debug, Clone, Default)]
pub struct RelevanceSelector {
    config: SelectionConfig,
}

impl RelevanceSelector {
    /// Create a new selector
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// p-value of one column, `None` when the column is constant
    fn p_value(&self, column: &[f64], positive: &[bool]) -> Result<Option<f64>, FeatureError> {
        let mut distinct: Vec<f64> = Vec::new();
        for &v in column {
            if !distinct.contains(&v) {
                distinct.push(v);
                if distinct.len() > 2 {
                    break;
                }
            }
        }

        match distinct.len() {
            0 | 1 => Ok(None),
            2 => {
                let flags: Vec<bool> = column.iter().map(|&v| v == distinct[1]).collect();
                fisher_exact_p_value(&flags, positive).map(Some)
            }
            _ => {
                let (pos, neg): (Vec<(f64, bool)>, Vec<(f64, bool)>) = column
                    .iter()
                    .copied()
                    .zip(positive.iter().copied())
                    .partition(|&(_, p)| p);
                let pos: Vec<f64> = pos.into_iter().map(|(v, _)| v).collect();
                let neg: Vec<f64> = neg.into_iter().map(|(v, _)| v).collect();
                mann_whitney_p_value(&pos, &neg).map(Some)
            }
        }
    }
}

impl FeatureSelector for RelevanceSelector {
    fn select(&self, features: &FeatureTable, labels: &[Label]) -> Result<Vec<usize>, FeatureError> {
        if labels.len() != features.n_rows() {
            return Err(FeatureError::Shape(format!(
                "{} labels for {} feature rows",
                labels.len(),
                features.n_rows()
            )));
        }

        let positive: Vec<bool> = labels.iter().map(|&l| l == Label::Positive).collect();
        let n_positive = positive.iter().filter(|&&p| p).count();
        if n_positive == 0 || n_positive == positive.len() {
            warn!(
                "Feature selection needs both classes, got {} positive of {}; no feature is relevant",
                n_positive,
                positive.len()
            );
            return Ok(Vec::new());
        }

        let mut tested = Vec::new();
        for (j, column) in features.values().columns().into_iter().enumerate() {
            let column = column.to_vec();
            if let Some(p) = self.p_value(&column, &positive)? {
                tested.push((j, p));
            }
        }

        let p_values: Vec<f64> = tested.iter().map(|&(_, p)| p).collect();
        let rejected = benjamini_procedure(
            &p_values,
            self.config.fdr_level,
            self.config.hypotheses_independent,
        );

        let selected: Vec<usize> = tested
            .iter()
            .zip(rejected)
            .filter(|(_, relevant)| *relevant)
            .map(|(&(j, _), _)| j)
            .collect();

        debug!(
            "Relevance test: {} columns, {} non-constant, {} relevant",
            features.n_columns(),
            tested.len(),
            selected.len()
        );
        Ok(selected)
    }
}

/// Two-sided Mann-Whitney U test with tie correction and continuity
/// correction, normal approximation.
pub fn mann_whitney_p_value(x: &[f64], y: &[f64]) -> Result<f64, FeatureError> {
    let n1 = x.len();
    let n2 = y.len();
    if n1 == 0 || n2 == 0 {
        return Err(FeatureError::Selection(
            "Mann-Whitney test needs two non-empty samples".to_string(),
        ));
    }

    let mut combined: Vec<(f64, bool)> = x
        .iter()
        .map(|&v| (v, true))
        .chain(y.iter().map(|&v| (v, false)))
        .collect();
    combined.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Average ranks over ties
    let n = combined.len();
    let mut rank_sum_x = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && combined[j + 1].0 == combined[i].0 {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        rank_sum_x += combined[i..=j].iter().filter(|(_, from_x)| *from_x).count() as f64 * avg_rank;
        i = j + 1;
    }

    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, n as f64);
    let u1 = rank_sum_x - n1f * (n1f + 1.0) / 2.0;
    let u = u1.max(n1f * n2f - u1);
    let mu = n1f * n2f / 2.0;
    let sigma = (n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)))).sqrt();
    if !(sigma > 0.0) {
        return Ok(1.0);
    }

    let z = (u - mu - 0.5) / sigma;
    let normal = Normal::new(0.0, 1.0).map_err(|e| FeatureError::Selection(e.to_string()))?;
    Ok((2.0 * normal.sf(z)).clamp(0.0, 1.0))
}

/// Two-sided Fisher exact test of independence between two binary variables
pub fn fisher_exact_p_value(feature: &[bool], positive: &[bool]) -> Result<f64, FeatureError> {
    if feature.len() != positive.len() {
        return Err(FeatureError::Selection(format!(
            "Fisher test samples differ in length: {} vs {}",
            feature.len(),
            positive.len()
        )));
    }

    let population = feature.len() as u64;
    let successes = feature.iter().filter(|&&f| f).count() as u64;
    let draws = positive.iter().filter(|&&p| p).count() as u64;
    let observed = feature
        .iter()
        .zip(positive)
        .filter(|&(&f, &p)| f && p)
        .count() as u64;

    let dist = Hypergeometric::new(population, successes, draws)
        .map_err(|e| FeatureError::Selection(e.to_string()))?;

    let lower = (draws + successes).saturating_sub(population);
    let upper = successes.min(draws);
    let p_observed = dist.pmf(observed);
    let threshold = p_observed * (1.0 + 1e-7);

    let p: f64 = (lower..=upper)
        .map(|k| dist.pmf(k))
        .filter(|&p| p <= threshold)
        .sum();
    Ok(p.min(1.0))
}

/// Step-up false discovery rate procedure.
///
/// Returns, per input p-value, whether its null hypothesis is rejected
/// (the feature is relevant). With `independent == false` the
/// Benjamini-Yekutieli correction for arbitrary dependence is applied.
pub fn benjamini_procedure(p_values: &[f64], fdr_level: f64, independent: bool) -> Vec<bool> {
    let m = p_values.len();
    let mut rejected = vec![false; m];
    if m == 0 {
        return rejected;
    }

    let correction = if independent {
        1.0
    } else {
        (1..=m).map(|i| 1.0 / i as f64).sum()
    };

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let cutoff = order
        .iter()
        .enumerate()
        .filter(|&(k, &idx)| p_values[idx] <= (k + 1) as f64 / (m as f64 * correction) * fdr_level)
        .map(|(k, _)| k + 1)
        .last();

    if let Some(count) = cutoff {
        for &idx in &order[..count] {
            rejected[idx] = true;
        }
    }
    rejected
}
