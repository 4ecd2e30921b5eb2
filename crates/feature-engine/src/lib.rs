//! Light Curve Feature Engine
//!
//! Reshapes labelled normalized curves into a long `(id, time, flux)` table,
//! extracts a generic statistical feature set per curve, imputes undefined
//! values and keeps the features that are significantly associated with the
//! class label.

mod builder;
mod error;
mod features;
mod fft;
mod impute;
mod long_table;
mod matrix;
mod selection;
mod statistics;

pub use builder::{BuildReport, Exclusion, FeatureBuilder, FeatureBuilderConfig, LabeledFeatures};
pub use error::FeatureError;
pub use features::{FeatureExtractor, StatisticalExtractor};
pub use fft::{FftAnalyzer, FrequencyBands, SpectralFeatures};
pub use impute::impute;
pub use long_table::{LongRow, LongTable};
pub use matrix::FeatureTable;
pub use selection::{
    benjamini_procedure, fisher_exact_p_value, mann_whitney_p_value, FeatureSelector,
    RelevanceSelector, SelectionConfig,
};
pub use statistics::StatisticalFeatures;
