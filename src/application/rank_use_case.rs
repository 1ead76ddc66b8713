// ============================================================
// Layer 2 — Rank Use Case
// ============================================================
// Loads a saved model once and ranks featurized examples with
// it. This is the hand-off point to downstream answer-extraction
// logic, which picks a strategy from the top category.

use std::path::Path;

use anyhow::Result;

use crate::domain::example::ScoredLabel;
use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::Scorer;
use crate::infra::checkpoint::load_model;
use crate::ml::passive_aggressive::PassiveAggressiveClassifier;

pub struct RankUseCase {
    model: PassiveAggressiveClassifier,
}

impl RankUseCase {
    pub fn new(model_path: &Path) -> Result<Self> {
        let model = load_model(model_path)?;
        tracing::info!("Model loaded: {} labels", model.labels().len());
        Ok(Self { model })
    }

    /// The `top` best labels for `features` (all of them if `top` is 0).
    pub fn rank(&self, features: &SparseVector, top: usize) -> Vec<ScoredLabel> {
        tracing::debug!("Ranking {} features:\n{}", features.len(), features);
        let mut ranking = self.model.score(features);
        if top > 0 {
            ranking.truncate(top);
        }
        ranking
    }
}
