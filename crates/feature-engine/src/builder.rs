//! Labelled Feature Matrix Assembly

use crate::error::FeatureError;
use crate::features::{FeatureExtractor, StatisticalExtractor};
use crate::impute::impute;
use crate::long_table::LongTable;
use crate::matrix::FeatureTable;
use crate::selection::{FeatureSelector, RelevanceSelector, SelectionConfig};
use curve_model::{CurveError, CurveId, CurveTable, Label, FLUX_COLUMN, TIME_COLUMN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Feature builder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureBuilderConfig {
    /// Fewest complete rows a curve needs to be used
    pub min_rows: usize,
    /// Name of the time column
    pub time_field: String,
    /// Name of the flux column
    pub flux_field: String,
    /// Relevance test settings
    pub selection: SelectionConfig,
}

impl Default for FeatureBuilderConfig {
    fn default() -> Self {
        Self {
            min_rows: 10,
            time_field: TIME_COLUMN.to_string(),
            flux_field: FLUX_COLUMN.to_string(),
            selection: SelectionConfig::default(),
        }
    }
}

/// A curve left out of the feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    /// Position in the input slice
    pub index: usize,
    pub reason: CurveError,
}

/// What happened to the input while building
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Number of curves submitted
    pub input_count: usize,
    /// Curves dropped during revalidation
    pub excluded: Vec<Exclusion>,
    /// Input position of each surviving curve, indexed by `CurveId`
    pub source_index: Vec<usize>,
    /// Feature columns before selection
    pub extracted_columns: usize,
    /// Cells replaced by imputation
    pub imputed_cells: usize,
}

/// Selected features with labels aligned to `matrix.ids()`
#[derive(Debug, Clone)]
pub struct LabeledFeatures {
    pub matrix: FeatureTable,
    pub labels: Vec<Label>,
    pub report: BuildReport,
}

impl LabeledFeatures {
    /// Label of a curve id
    pub fn label_of(&self, id: CurveId) -> Option<Label> {
        let i = self.matrix.ids().iter().position(|&x| x == id)?;
        self.labels.get(i).copied()
    }
}

/// Turns labelled normalized curves into a filtered feature matrix
pub struct FeatureBuilder<E = StatisticalExtractor, S = RelevanceSelector> {
    config: FeatureBuilderConfig,
    extractor: E,
    selector: S,
}

impl FeatureBuilder {
    /// Builder with the statistical extractor and relevance selector
    pub fn new(config: FeatureBuilderConfig) -> Self {
        let extractor = StatisticalExtractor::new(config.flux_field.clone());
        let selector = RelevanceSelector::new(config.selection.clone());
        Self::with_components(config, extractor, selector)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(FeatureBuilderConfig::default())
    }
}

impl<E: FeatureExtractor, S: FeatureSelector> FeatureBuilder<E, S> {
    /// Builder with custom extraction and selection
    pub fn with_components(config: FeatureBuilderConfig, extractor: E, selector: S) -> Self {
        Self {
            config,
            extractor,
            selector,
        }
    }

    /// Build the feature matrix for `curves[i]` labelled `labels[i]`.
    ///
    /// Curves that fail revalidation are excluded together with their label.
    /// Fails only on a length mismatch or when no curve survives.
    pub fn build(
        &self,
        curves: &[CurveTable],
        labels: &[Label],
    ) -> Result<LabeledFeatures, FeatureError> {
        if curves.len() != labels.len() {
            return Err(FeatureError::LengthMismatch {
                curves: curves.len(),
                labels: labels.len(),
            });
        }

        let mut report = BuildReport {
            input_count: curves.len(),
            ..Default::default()
        };
        let mut long = LongTable::new();
        let mut label_by_id: HashMap<CurveId, Label> = HashMap::new();

        for (index, (curve, &label)) in curves.iter().zip(labels).enumerate() {
            match self.revalidate(curve) {
                Ok(observations) => {
                    let id = CurveId(report.source_index.len());
                    long.push_curve(id, &observations);
                    label_by_id.insert(id, label);
                    report.source_index.push(index);
                }
                Err(reason) => {
                    warn!("Curve {} excluded from feature extraction: {}", index, reason);
                    report.excluded.push(Exclusion { index, reason });
                }
            }
        }

        if long.is_empty() {
            return Err(FeatureError::EmptyBatch);
        }

        info!(
            "Extracting features from {} of {} curves ({} observations)",
            report.source_index.len(),
            report.input_count,
            long.len()
        );

        let mut features = self.extractor.extract(&long)?;
        report.extracted_columns = features.n_columns();
        debug!(
            "Extracted features: {} x {}",
            features.n_rows(),
            features.n_columns()
        );

        report.imputed_cells = impute(&mut features);

        let aligned = align_labels(&features, &label_by_id)?;
        if aligned.len() < label_by_id.len() {
            warn!(
                "Extractor returned {} of {} curves; labels realigned",
                aligned.len(),
                label_by_id.len()
            );
        }

        let selected = self.selector.select(&features, &aligned)?;
        let matrix = features.select_columns(&selected)?;

        info!(
            "Selected {} of {} features",
            matrix.n_columns(),
            report.extracted_columns
        );
        if matrix.n_columns() == 0 {
            warn!("No relevant features were selected; check the data and the labels");
        }

        Ok(LabeledFeatures {
            matrix,
            labels: aligned,
            report,
        })
    }

    /// Complete `(time, flux)` rows of a curve, or the reason it is unusable
    fn revalidate(&self, curve: &CurveTable) -> Result<Vec<(f64, f64)>, CurveError> {
        let missing =
            curve.missing_columns(&[self.config.time_field.as_str(), self.config.flux_field.as_str()]);
        if !missing.is_empty() {
            return Err(CurveError::MissingFields(missing));
        }

        let observations = curve
            .complete_pairs(&self.config.time_field, &self.config.flux_field)
            .unwrap_or_default();

        if observations.len() < self.config.min_rows {
            return Err(CurveError::InsufficientData {
                rows: observations.len(),
                minimum: self.config.min_rows,
            });
        }
        Ok(observations)
    }
}

/// Labels in the row order of `features`, looked up by id
fn align_labels(
    features: &FeatureTable,
    label_by_id: &HashMap<CurveId, Label>,
) -> Result<Vec<Label>, FeatureError> {
    features
        .ids()
        .iter()
        .map(|id| label_by_id.get(id).copied().ok_or(FeatureError::UnknownCurve(*id)))
        .collect()
}
