//! Light Curve Data Model
//!
//! Shared types passed between the normalizer, the feature builder and the
//! I/O layer: column tables, fixed-length normalized curves and class labels.

mod curve;
mod error;
mod label;
mod set;
mod table;

pub use curve::{CurvePoint, NormalizedCurve};
pub use error::CurveError;
pub use label::{CurveId, Label};
pub use set::LabeledCurveSet;
pub use table::{Column, CurveTable};

/// Canonical name of the time column
pub const TIME_COLUMN: &str = "time";

/// Canonical name of the flux column
pub const FLUX_COLUMN: &str = "flux";
