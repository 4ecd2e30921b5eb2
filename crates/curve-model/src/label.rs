//! Class Labels and Curve Identifiers

use crate::error::CurveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary class label of a light curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    /// No transit (0)
    Negative,
    /// Transit present (1)
    Positive,
}

impl Label {
    /// Both classes, in the order batches are processed
    pub const ALL: [Label; 2] = [Label::Positive, Label::Negative];

    /// Numeric value (0 or 1)
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    /// Directory name used by the dataset layout
    pub fn dir_name(self) -> &'static str {
        match self {
            Label::Negative => "negative",
            Label::Positive => "positive",
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for Label {
    type Error = CurveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(CurveError::InvalidLabel(other.to_string())),
        }
    }
}

impl FromStr for Label {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "negative" => Ok(Label::Negative),
            "1" | "positive" => Ok(Label::Positive),
            other => Err(CurveError::InvalidLabel(other.to_string())),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Dense identifier of a curve among those that survived validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveId(pub usize);

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_u8() {
        assert_eq!(Label::try_from(0).unwrap(), Label::Negative);
        assert_eq!(Label::try_from(1).unwrap(), Label::Positive);
        assert!(Label::try_from(2).is_err());
    }

    #[test]
    fn test_label_from_str() {
        assert_eq!("positive".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!(" 0 ".parse::<Label>().unwrap(), Label::Negative);
        assert!("maybe".parse::<Label>().is_err());
    }

    #[test]
    fn test_label_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Label::Positive).unwrap(), "1");
        let label: Label = serde_json::from_str("0").unwrap();
        assert_eq!(label, Label::Negative);
        assert!(serde_json::from_str::<Label>("3").is_err());
    }
}
