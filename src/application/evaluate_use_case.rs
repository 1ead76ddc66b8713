// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Scores a saved model against an official test file.
//
//   1. Load the model artifact
//   2. Load the test examples, indexing labels into a copy of the
//      model's own LabelIndex so gold indices line up with the
//      weight vectors
//   3. Fine mode:   classifier accuracy (optionally lenient)
//      Coarse mode: compare only the category before ':' of the
//                   predicted and gold labels, so a fine-grained
//                   model can be scored on coarse categories

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::data::dataset::DataSet;
use crate::data::loader::{coarse_label, FeaturizedLoader};
use crate::domain::traits::{ExampleSource, Scorer};
use crate::infra::checkpoint::load_model;
use crate::ml::passive_aggressive::PassiveAggressiveClassifier;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateOutcome {
    pub examples: usize,
    pub accuracy: f64,

    /// Test labels the model has never seen (always counted as misses)
    pub unseen_labels: Vec<String>,
}

pub struct EvaluateUseCase {
    model_path: PathBuf,
    test_path:  PathBuf,
    coarse:     bool,
    lenient:    Option<bool>,
}

impl EvaluateUseCase {
    /// `lenient` overrides the flag stored in the model when set.
    pub fn new(
        model_path: impl Into<PathBuf>,
        test_path:  impl Into<PathBuf>,
        coarse:     bool,
        lenient:    Option<bool>,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            test_path:  test_path.into(),
            coarse,
            lenient,
        }
    }

    pub fn execute(&self) -> Result<EvaluateOutcome> {
        let mut model = load_model(&self.model_path)?;
        if let Some(lenient) = self.lenient {
            model.set_lenient_second_guess(lenient);
        }

        let mut labels = model.labels().clone();
        let known      = labels.len();
        let test       = FeaturizedLoader::new(&self.test_path).load_into(&mut labels)?;
        if test.is_empty() {
            bail!("Test data '{}' contains no examples", self.test_path.display());
        }

        let unseen_labels: Vec<String> = labels.labels().skip(known).map(str::to_string).collect();
        if !unseen_labels.is_empty() {
            tracing::warn!("Test set has {} labels unknown to the model: {:?}", unseen_labels.len(), unseen_labels);
        }

        let accuracy = if self.coarse {
            coarse_accuracy(&model, &test)
        } else {
            model.accuracy(&test)?
        };

        Ok(EvaluateOutcome {
            examples: test.len(),
            accuracy,
            unseen_labels,
        })
    }
}

/// Accuracy where only the coarse category has to match.
fn coarse_accuracy(model: &PassiveAggressiveClassifier, test: &DataSet) -> f64 {
    let lenient = model.lenient_second_guess();
    let hits = test
        .iter()
        .filter(|(raw, point)| {
            let gold    = coarse_label(&raw.label);
            let ranking = model.score(&point.features);
            let hit_at  = |pos: usize| ranking.get(pos).map_or(false, |s| coarse_label(&s.label) == gold);
            hit_at(0) || (lenient && hit_at(1))
        })
        .count();

    hits as f64 / test.len() as f64
}
