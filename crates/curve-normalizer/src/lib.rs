//! Light Curve Normalization
//!
//! Turns a raw `(time, flux)` table into a fixed-length curve: schema check,
//! removal of incomplete rows, truncation or padding to the segment length,
//! and median/standard-deviation scaling computed from real observations only.

mod normalizer;
mod stats;
mod validator;

pub use normalizer::{BatchOutcome, Normalizer, NormalizerConfig, TruncationPolicy};
pub use stats::{median, population_std, RobustScale};
pub use validator::{Validator, ValidationConfig};
