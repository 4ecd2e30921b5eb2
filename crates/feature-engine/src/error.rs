//! Feature Engine Error Types

use curve_model::CurveId;
use thiserror::Error;

/// Errors during feature building
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Curves and labels are not index-aligned
    #[error("curve/label count mismatch: {curves} curves, {labels} labels")]
    LengthMismatch { curves: usize, labels: usize },

    /// Every curve was excluded during revalidation
    #[error("no valid data to extract features from")]
    EmptyBatch,

    /// Extraction produced a row for an id that was never submitted
    #[error("feature row for unknown curve id {0}")]
    UnknownCurve(CurveId),

    /// Matrix dimensions disagree with ids or names
    #[error("invalid feature table shape: {0}")]
    Shape(String),

    /// Statistical test could not be evaluated
    #[error("feature selection failed: {0}")]
    Selection(String),
}
