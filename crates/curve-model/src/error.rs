//! Curve Error Types

use thiserror::Error;

/// Errors raised while validating or normalizing a single curve
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// One or more required columns are absent
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Too few usable observations
    #[error("too few valid rows: {rows} < {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    /// Column length disagrees with the rest of the table
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column name already present in the table
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Label outside the binary {0, 1} domain
    #[error("invalid label '{0}', expected 0/1 or negative/positive")]
    InvalidLabel(String),
}

impl CurveError {
    /// Whether the error comes from schema validation
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            CurveError::MissingFields(_) | CurveError::ColumnLength { .. } | CurveError::DuplicateColumn(_)
        )
    }

    /// Whether the curve was rejected for having too little data
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, CurveError::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        let err = CurveError::MissingFields(vec!["time".into(), "flux".into()]);
        assert_eq!(err.to_string(), "missing required fields: time, flux");
        assert!(err.is_schema());
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = CurveError::InsufficientData { rows: 42, minimum: 100 };
        assert_eq!(err.to_string(), "too few valid rows: 42 < 100");
        assert!(err.is_insufficient_data());
    }
}
