// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// A training/test example exists in two forms:
//
//   RawExample      → the label string and the original text,
//                     kept for traceability and error analysis
//   LabeledExample  → the dense label index and the feature
//                     vector the classifier actually consumes
//
// A DataSet keeps the two forms in parallel sequences.

use serde::{Deserialize, Serialize};

use crate::domain::sparse_vector::SparseVector;

/// The example as the featurizer saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExample {
    pub label: String,
    pub text:  String,
}

impl RawExample {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text:  text.into(),
        }
    }
}

/// The example as the classifier sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    /// Position of the gold label in the shared LabelIndex
    pub label: usize,

    pub features: SparseVector,
}

impl LabeledExample {
    pub fn new(label: usize, features: SparseVector) -> Self {
        Self { label, features }
    }
}

/// One entry of a ranking produced by a [`Scorer`](crate::domain::traits::Scorer).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}
