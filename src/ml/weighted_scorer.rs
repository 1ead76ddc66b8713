// ============================================================
// Layer 5 — Manually Weighted Scorer
// ============================================================
// A Scorer whose weights are written by hand instead of learned.
//
// Used where there is no training data for a decision, e.g.
// ranking answer candidates: every feature that marks a bad
// candidate gets a negative weight, and the candidate with the
// highest (least penalised) score wins.
//
// score(x) returns exactly one entry: (name, x·w).

use crate::domain::error::Result;
use crate::domain::example::ScoredLabel;
use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::Scorer;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedScorer {
    name:    String,
    weights: SparseVector,
}

impl WeightedScorer {
    pub fn new(name: impl Into<String>, weights: SparseVector) -> Self {
        Self {
            name: name.into(),
            weights,
        }
    }

    /// Builder-style weight assignment; duplicate names are rejected.
    pub fn with_weight(mut self, feature: impl Into<String>, weight: f64) -> Result<Self> {
        self.weights.add_value(feature, weight)?;
        Ok(self)
    }

    pub fn weights(&self) -> &SparseVector {
        &self.weights
    }
}

impl Scorer for WeightedScorer {
    fn score(&self, features: &SparseVector) -> Vec<ScoredLabel> {
        vec![ScoredLabel::new(self.name.clone(), features.dot(&self.weights))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::CoreError;

    fn penalties() -> WeightedScorer {
        WeightedScorer::new("BEST", SparseVector::new())
            .with_weight("cand_is_wh_word", -1.0)
            .unwrap()
            .with_weight("cand_in_question", -1.0)
            .unwrap()
    }

    #[test]
    fn test_single_weighted_sum() {
        let mut x = SparseVector::new();
        x.add("cand_in_question").unwrap();
        x.add("cand_is_entity").unwrap();

        let ranking = penalties().score(&x);
        assert_eq!(ranking, vec![ScoredLabel::new("BEST", -1.0)]);
    }

    #[test]
    fn test_best_prefers_clean_candidate() {
        let scorer = penalties();
        let clean = SparseVector::new();
        let mut bad = SparseVector::new();
        bad.add("cand_is_wh_word").unwrap();

        let a = scorer.best(&clean).unwrap().score;
        let b = scorer.best(&bad).unwrap().score;
        assert!(a > b);
    }

    #[test]
    fn test_duplicate_weight_rejected() {
        let res = penalties().with_weight("cand_in_question", -2.0);
        assert!(matches!(res, Err(CoreError::DuplicateFeature(_))));
    }
}
