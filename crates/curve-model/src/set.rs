//! Labelled Curve Collection

use crate::label::Label;
use crate::table::CurveTable;

/// Curves and their labels, index-aligned by insertion order
#[derive(Debug, Clone, Default)]
pub struct LabeledCurveSet {
    names: Vec<String>,
    curves: Vec<CurveTable>,
    labels: Vec<Label>,
}

impl LabeledCurveSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one named curve with its label
    pub fn push(&mut self, name: impl Into<String>, curve: CurveTable, label: Label) {
        self.names.push(name.into());
        self.curves.push(curve);
        self.labels.push(label);
    }

    /// Curve names (usually source file names)
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Curves in insertion order
    pub fn curves(&self) -> &[CurveTable] {
        &self.curves
    }

    /// Labels, `labels()[i]` belongs to `curves()[i]`
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of curves
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Number of curves with the given label
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }
}
