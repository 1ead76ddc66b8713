// ============================================================
// Layer 5 — Passive-Aggressive Classifier (PA-I)
// ============================================================
// Multi-class, multi-prototype, single-label Passive-Aggressive
// learner (Crammer et al., 2006, "Online Passive-Aggressive
// Algorithms", JMLR 7).
//
// The model is one sparse weight vector per label. For one
// example (x, y) a training step goes through:
//
//   1. competitor   s = argmax_{l != y} w[l]·x   (lowest index on ties)
//   2. margin       m = w[y]·x - w[s]·x
//   3. hinge loss   ℓ = 0 if m >= 1 else 1 - m
//   4. step size    τ = min(C, ℓ / (2 · x·x))
//   5. update       w[y] += τx,  w[s] -= τx
//
// Only w[y] and w[s] change. If x·x is zero there is no step
// size; the example is skipped and counted, and no NaN or ∞
// ever reaches the weights.
//
// C bounds how far one example may move the weights. Smaller
// values (0.01, 0.001, ...) train slower but steadier and often
// end up more accurate; validate it per task.
//
// Reference: Crammer et al. (2006), PA-I update, §3 and §7

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::dataset::DataSet;
use crate::domain::error::{CoreError, Result};
use crate::domain::example::ScoredLabel;
use crate::domain::labels::LabelIndex;
use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::{Persistable, Scorer};
use crate::infra::artifact;

/// Artifact format tag written into every saved model.
pub const ARTIFACT_FORMAT: &str = "pa-classifier";

/// Current artifact schema version.
pub const ARTIFACT_VERSION: u32 = 1;

// ─── Step / Epoch Results ─────────────────────────────────────────────────────

/// What one training step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Hinge loss before the update
    pub loss: f64,

    /// Runner-up label that was pushed down
    pub competitor: usize,

    /// Step size actually applied (0.0 when passive or skipped)
    pub tau: f64,

    /// True if x had zero magnitude and the update was skipped
    pub skipped: bool,
}

/// Aggregate of one pass over a DataSet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochSummary {
    pub total_loss: f64,
    pub examples:   usize,
    pub skipped:    usize,
}

// ─── Classifier ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PassiveAggressiveClassifier {
    aggressiveness:       f64,
    lenient_second_guess: bool,
    labels:               LabelIndex,
    weights:              Vec<SparseVector>,
}

impl PassiveAggressiveClassifier {
    /// Create a classifier with all-zero weights, one vector per label.
    ///
    /// `aggressiveness` is the PA-I bound C and must be positive.
    /// With `lenient_second_guess`, [`accuracy`](Self::accuracy) also
    /// counts a hit when the gold label is ranked second.
    pub fn new(aggressiveness: f64, labels: LabelIndex, lenient_second_guess: bool) -> Result<Self> {
        if !(aggressiveness.is_finite() && aggressiveness > 0.0) {
            return Err(CoreError::InvalidAggressiveness(aggressiveness));
        }

        let weights = vec![SparseVector::new(); labels.len()];
        Ok(Self {
            aggressiveness,
            lenient_second_guess,
            labels,
            weights,
        })
    }

    pub fn aggressiveness(&self) -> f64 {
        self.aggressiveness
    }

    pub fn lenient_second_guess(&self) -> bool {
        self.lenient_second_guess
    }

    pub fn set_lenient_second_guess(&mut self, lenient: bool) {
        self.lenient_second_guess = lenient;
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// Weight vector of one label.
    pub fn weights(&self, label: usize) -> Result<&SparseVector> {
        self.weights.get(label).ok_or(CoreError::UnknownIndex {
            index: label,
            size:  self.weights.len(),
        })
    }

    fn check_label(&self, label: usize) -> Result<()> {
        if label < self.weights.len() {
            Ok(())
        } else {
            Err(CoreError::UnknownIndex {
                index: label,
                size:  self.weights.len(),
            })
        }
    }

    // ─── Training ─────────────────────────────────────────────────────────────

    /// Highest-scoring label other than `y`, with its score.
    fn competitor(&self, x: &SparseVector, y: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for l in self.labels.indices().filter(|&l| l != y) {
            let s = self.weights[l].dot(x);
            // strict '>' keeps the lowest index on ties
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((l, s));
            }
        }
        best
    }

    /// Step size τ = min(C, loss / (2·x·x)).
    fn step_size(&self, x: &SparseVector, loss: f64) -> Result<f64> {
        let norm = x.dot(x);
        if norm == 0.0 {
            return Err(CoreError::DegenerateStep);
        }
        Ok(self.aggressiveness.min(loss / (2.0 * norm)))
    }

    /// Run one PA-I update for the example `(x, y)`.
    pub fn step(&mut self, x: &SparseVector, y: usize) -> Result<StepOutcome> {
        self.check_label(y)?;
        let (s, competitor_score) = self
            .competitor(x, y)
            .ok_or(CoreError::TooFewLabels(self.labels.len()))?;

        let margin = self.weights[y].dot(x) - competitor_score;
        let loss   = hinge_loss(margin);

        let tau = match self.step_size(x, loss) {
            Ok(tau) => tau,
            Err(CoreError::DegenerateStep) => {
                tracing::debug!("Skipping update for zero-magnitude example (label {})", y);
                return Ok(StepOutcome { loss, competitor: s, tau: 0.0, skipped: true });
            }
            Err(e) => return Err(e),
        };

        if tau > 0.0 {
            self.weights[y].add_scaled(x, tau);
            self.weights[s].add_scaled(x, -tau);
        }

        Ok(StepOutcome { loss, competitor: s, tau, skipped: false })
    }

    /// One pass over `data` in storage order. Returns the summed loss.
    pub fn train_epoch(&mut self, data: &DataSet) -> Result<EpochSummary> {
        if self.labels.len() < 2 {
            return Err(CoreError::TooFewLabels(self.labels.len()));
        }
        if data.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        let mut summary = EpochSummary::default();
        for point in data.points() {
            let outcome = self.step(&point.features, point.label)?;
            summary.total_loss += outcome.loss;
            summary.examples   += 1;
            if outcome.skipped {
                summary.skipped += 1;
            }
        }
        Ok(summary)
    }

    // ─── Inference ────────────────────────────────────────────────────────────

    /// `(label index, score)` for every label, best first.
    /// Equal scores keep ascending index order.
    pub fn rank(&self, x: &SparseVector) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .labels
            .indices()
            .map(|l| (l, self.weights[l].dot(x)))
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }

    /// Whether the ranking of `x` counts as correct for gold label `y`.
    fn is_hit(&self, x: &SparseVector, y: usize) -> bool {
        let ranked = self.rank(x);
        let at = |pos: usize| ranked.get(pos).map(|&(l, _)| l);

        at(0) == Some(y) || (self.lenient_second_guess && at(1) == Some(y))
    }

    /// Fraction of examples classified correctly.
    pub fn accuracy(&self, data: &DataSet) -> Result<f64> {
        if data.is_empty() {
            return Err(CoreError::EmptyDataset);
        }

        let hits = data
            .points()
            .iter()
            .filter(|p| self.is_hit(&p.features, p.label))
            .count();

        Ok(hits as f64 / data.len() as f64)
    }
}

/// Hinge loss for a unit margin requirement.
fn hinge_loss(margin: f64) -> f64 {
    if margin >= 1.0 {
        0.0
    } else {
        1.0 - margin
    }
}

impl Scorer for PassiveAggressiveClassifier {
    fn score(&self, features: &SparseVector) -> Vec<ScoredLabel> {
        let names: Vec<&str> = self.labels.labels().collect();
        self.rank(features)
            .into_iter()
            .map(|(l, score)| ScoredLabel::new(names[l], score))
            .collect()
    }
}

// ─── Persistence ──────────────────────────────────────────────────────────────
// Versioned JSON record:
//   { "format": "pa-classifier", "version": 1,
//     "aggressiveness": C, "lenient_second_guess": bool,
//     "labels": [label_0, label_1, ...],
//     "weights": [{feature: weight, ...}, ...] }
// weights[i] belongs to labels[i].

#[derive(Serialize)]
struct ClassifierRecordRef<'a> {
    format:               &'a str,
    version:              u32,
    aggressiveness:       f64,
    lenient_second_guess: bool,
    labels:               &'a LabelIndex,
    weights:              &'a [SparseVector],
}

#[derive(Deserialize)]
struct ClassifierRecord {
    aggressiveness:       f64,
    lenient_second_guess: bool,
    labels:               LabelIndex,
    weights:              Vec<SparseVector>,
}

impl Persistable for PassiveAggressiveClassifier {
    fn save(&self, path: &Path) -> Result<()> {
        let record = ClassifierRecordRef {
            format:               ARTIFACT_FORMAT,
            version:              ARTIFACT_VERSION,
            aggressiveness:       self.aggressiveness,
            lenient_second_guess: self.lenient_second_guess,
            labels:               &self.labels,
            weights:              &self.weights,
        };

        let bytes = serde_json::to_vec(&record)?;
        artifact::write_atomic(path, &bytes)?;

        tracing::debug!("Saved classifier ({} labels) to '{}'", self.labels.len(), path.display());
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let bytes = artifact::read_checked(path, ARTIFACT_FORMAT, ARTIFACT_VERSION)?;
        let record: ClassifierRecord = serde_json::from_slice(&bytes)?;

        if record.weights.len() != record.labels.len() {
            return Err(CoreError::CorruptArtifact(format!(
                "{} weight vectors for {} labels",
                record.weights.len(),
                record.labels.len()
            )));
        }
        if !(record.aggressiveness.is_finite() && record.aggressiveness > 0.0) {
            return Err(CoreError::CorruptArtifact(format!(
                "aggressiveness {} is not positive",
                record.aggressiveness
            )));
        }

        Ok(Self {
            aggressiveness:       record.aggressiveness,
            lenient_second_guess: record.lenient_second_guess,
            labels:               record.labels,
            weights:              record.weights,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example::RawExample;
    use tempfile::tempdir;

    fn one_hot(names: &[&str]) -> SparseVector {
        let mut v = SparseVector::new();
        for n in names {
            v.add(*n).unwrap();
        }
        v
    }

    fn labels(names: &[&str]) -> LabelIndex {
        let mut l = LabelIndex::new();
        for n in names {
            l.index_of(n);
        }
        l
    }

    /// Two labels, each with its own disjoint one-hot features.
    fn separable_pair() -> (LabelIndex, DataSet) {
        let labels = labels(&["A", "B"]);
        let mut data = DataSet::new();
        for i in 0..4 {
            let (a, b) = (format!("a{i}"), format!("b{i}"));
            data.push(RawExample::new("A", a.as_str()), 0, one_hot(&["bias", a.as_str(), "ax"]));
            data.push(RawExample::new("B", b.as_str()), 1, one_hot(&["bias", b.as_str(), "bx"]));
        }
        (labels, data)
    }

    /// 20 examples over 3 labels; each label owns two cue features.
    fn three_class_set() -> (LabelIndex, DataSet) {
        let names = ["LOC", "HUM", "NUM"];
        let cues = [["where", "place"], ["who", "person"], ["how_many", "count"]];
        let labels = labels(&names);
        let mut data = DataSet::new();
        for i in 0..20 {
            let y = i % 3;
            let mut x = one_hot(&[cues[y][i % 2], "question"]);
            x.add_value(format!("noise{}", i % 4), 0.5).unwrap();
            data.push(RawExample::new(names[y], format!("q{i}")), y, x);
        }
        (labels, data)
    }

    #[test]
    fn test_new_starts_at_zero() {
        let clf = PassiveAggressiveClassifier::new(0.1, labels(&["A", "B", "C"]), false).unwrap();
        for l in 0..3 {
            assert!(clf.weights(l).unwrap().is_empty());
        }
        assert!(clf.weights(3).is_err());
    }

    #[test]
    fn test_rejects_non_positive_c() {
        for c in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                PassiveAggressiveClassifier::new(c, labels(&["A", "B"]), false),
                Err(CoreError::InvalidAggressiveness(_))
            ));
        }
    }

    #[test]
    fn test_single_step_update() {
        let mut clf = PassiveAggressiveClassifier::new(10.0, labels(&["A", "B"]), false).unwrap();
        let x = one_hot(&["f1", "f2"]);

        // zero weights: margin 0, loss 1, tau = 1 / (2 * 2) = 0.25
        let out = clf.step(&x, 0).unwrap();
        assert_eq!(out.loss, 1.0);
        assert_eq!(out.competitor, 1);
        assert_eq!(out.tau, 0.25);
        assert!(!out.skipped);

        assert_eq!(clf.weights(0).unwrap().value("f1"), 0.25);
        assert_eq!(clf.weights(1).unwrap().value("f2"), -0.25);

        // margin is now 0.5 - (-0.5) = 1.0 → passive
        let again = clf.step(&x, 0).unwrap();
        assert_eq!(again.loss, 0.0);
        assert_eq!(again.tau, 0.0);
    }

    #[test]
    fn test_step_size_clipped_by_c() {
        let mut clf = PassiveAggressiveClassifier::new(0.01, labels(&["A", "B"]), false).unwrap();
        let out = clf.step(&one_hot(&["f"]), 1).unwrap();
        assert_eq!(out.tau, 0.01);
        assert_eq!(clf.weights(1).unwrap().value("f"), 0.01);
        assert_eq!(clf.weights(0).unwrap().value("f"), -0.01);
    }

    #[test]
    fn test_only_true_and_competitor_move() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B", "C"]), false).unwrap();
        // make C the strongest competitor for x
        clf.step(&one_hot(&["f"]), 2).unwrap();
        let before_b = clf.weights(1).unwrap().clone();

        let out = clf.step(&one_hot(&["f"]), 0).unwrap();
        assert_eq!(out.competitor, 2);
        assert_eq!(clf.weights(1).unwrap(), &before_b);
    }

    #[test]
    fn test_competitor_tie_takes_lowest_index() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B", "C"]), false).unwrap();
        let out = clf.step(&one_hot(&["f"]), 2).unwrap();
        assert_eq!(out.competitor, 0);
    }

    #[test]
    fn test_zero_vector_is_skipped() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B"]), false).unwrap();
        let before = clf.clone();

        let out = clf.step(&SparseVector::new(), 0).unwrap();
        assert!(out.skipped);
        assert_eq!(out.tau, 0.0);
        assert_eq!(out.loss, 1.0);
        assert_eq!(clf, before);

        // explicit zeros have zero magnitude as well
        let mut zeros = SparseVector::new();
        zeros.add_value("f", 0.0).unwrap();
        assert!(clf.step(&zeros, 1).unwrap().skipped);
        assert!(clf.weights(0).unwrap().value("f").is_finite());
    }

    #[test]
    fn test_epoch_counts_skipped() {
        let (labels, mut data) = separable_pair();
        data.push(RawExample::new("A", "empty"), 0, SparseVector::new());
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels, false).unwrap();
        let summary = clf.train_epoch(&data).unwrap();
        assert_eq!(summary.examples, 9);
        assert_eq!(summary.skipped, 1);
        assert!(summary.total_loss > 0.0);
    }

    #[test]
    fn test_unknown_label_in_data() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B"]), false).unwrap();
        let err = clf.step(&one_hot(&["f"]), 5).unwrap_err();
        assert!(matches!(err, CoreError::UnknownIndex { index: 5, size: 2 }));
    }

    #[test]
    fn test_single_label_cannot_train() {
        let mut data = DataSet::new();
        data.push(RawExample::new("A", "q"), 0, one_hot(&["f"]));
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A"]), false).unwrap();
        assert!(matches!(clf.train_epoch(&data), Err(CoreError::TooFewLabels(1))));
    }

    #[test]
    fn test_empty_dataset_errors() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B"]), false).unwrap();
        assert!(matches!(clf.train_epoch(&DataSet::new()), Err(CoreError::EmptyDataset)));
        assert!(matches!(clf.accuracy(&DataSet::new()), Err(CoreError::EmptyDataset)));
    }

    #[test]
    fn test_separable_pair_reaches_full_accuracy() {
        let (labels, data) = separable_pair();
        let mut clf = PassiveAggressiveClassifier::new(0.5, labels, false).unwrap();
        let mut losses = Vec::new();
        for _ in 0..5 {
            losses.push(clf.train_epoch(&data).unwrap().total_loss);
        }
        assert_eq!(clf.accuracy(&data).unwrap(), 1.0);
        assert!(losses.last().unwrap() < losses.first().unwrap());
    }

    #[test]
    fn test_three_class_convergence() {
        let (labels, data) = three_class_set();
        let mut clf = PassiveAggressiveClassifier::new(0.1, labels, false).unwrap();
        for _ in 0..100 {
            clf.train_epoch(&data).unwrap();
        }
        assert!(clf.accuracy(&data).unwrap() >= 0.95);
    }

    #[test]
    fn test_score_is_sorted_and_complete() {
        let (labels, data) = three_class_set();
        let mut clf = PassiveAggressiveClassifier::new(0.1, labels, false).unwrap();
        for _ in 0..100 {
            clf.train_epoch(&data).unwrap();
        }

        // example 4 is a HUM question with the "who" cue
        let ranking = clf.score(&data.points()[4].features);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].label, "HUM");
        assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_score_ties_in_index_order() {
        let clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B", "C"]), false).unwrap();
        let ranking = clf.score(&one_hot(&["f"]));
        let order: Vec<&str> = ranking.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_lenient_second_guess() {
        let mut clf = PassiveAggressiveClassifier::new(1.0, labels(&["A", "B", "C"]), false).unwrap();
        // A goes up for "f", B (the competitor) goes down, C stays at 0
        clf.step(&one_hot(&["f"]), 0).unwrap();

        let mut data = DataSet::new();
        let ranked = clf.rank(&one_hot(&["f"]));
        let second = ranked[1].0;
        data.push(RawExample::new("?", "q"), second, one_hot(&["f"]));

        assert_eq!(clf.accuracy(&data).unwrap(), 0.0);
        clf.set_lenient_second_guess(true);
        assert_eq!(clf.accuracy(&data).unwrap(), 1.0);
    }

    #[test]
    fn test_save_load_is_equivalent() {
        let (labels, data) = three_class_set();
        let mut clf = PassiveAggressiveClassifier::new(0.1, labels, true).unwrap();
        for _ in 0..7 {
            clf.train_epoch(&data).unwrap();
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        clf.save(&path).unwrap();
        let back = PassiveAggressiveClassifier::load(&path).unwrap();

        assert_eq!(back, clf);
        for p in data.points() {
            let a = clf.score(&p.features);
            let b = back.score(&p.features);
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(&b) {
                assert_eq!(x.label, y.label);
                assert_eq!(x.score.to_bits(), y.score.to_bits());
            }
        }
        assert_eq!(back.accuracy(&data).unwrap(), clf.accuracy(&data).unwrap());
    }

    #[test]
    fn test_load_rejects_other_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"format":"pa-classifier","version":99,"aggressiveness":0.1,
                "lenient_second_guess":false,"labels":[],"weights":[]}"#,
        )
        .unwrap();

        let err = PassiveAggressiveClassifier::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { version: 99, .. }));
    }

    #[test]
    fn test_load_rejects_misaligned_weights() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"format":"pa-classifier","version":1,"aggressiveness":0.1,
                "lenient_second_guess":false,"labels":["A","B"],"weights":[{}]}"#,
        )
        .unwrap();

        let err = PassiveAggressiveClassifier::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::CorruptArtifact(_)));
    }
}
