// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Capabilities shared by several concrete types:
//
//   Scorer       → anything that ranks a feature vector against a
//                  fixed weighting (learned or hand-authored)
//   Persistable  → anything whose full state round-trips to disk
//   ExampleSource→ anything that yields featurized examples
//
// Callers pick an implementation by composition, e.g. the answer
// extraction logic holds one Scorer for the question category
// and another for candidate answers.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use crate::domain::error::Result;
use crate::domain::example::ScoredLabel;
use crate::domain::labels::LabelIndex;
use crate::domain::sparse_vector::SparseVector;
use crate::data::dataset::DataSet;

// ─── Scorer ───────────────────────────────────────────────────────────────────
/// Ranks a feature vector.
///
/// Implementations:
///   - PassiveAggressiveClassifier → one entry per class, best first
///   - WeightedScorer              → a single entry, the weighted sum
pub trait Scorer {
    /// Scored labels sorted by descending score.
    fn score(&self, features: &SparseVector) -> Vec<ScoredLabel>;

    /// Best-scoring label, if the scorer has any.
    fn best(&self, features: &SparseVector) -> Option<ScoredLabel> {
        self.score(features).into_iter().next()
    }
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can produce featurized examples.
///
/// Implementations:
///   - FeaturizedLoader → JSON Lines written by the featurizer
pub trait ExampleSource {
    /// Read every example, indexing labels into `labels`.
    fn load_into(&self, labels: &mut LabelIndex) -> anyhow::Result<DataSet>;
}
