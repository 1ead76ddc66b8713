// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the training pool      (Layer 4 - data)
//   Step 2: Load the official test set  (Layer 4 - data, optional)
//   Step 3: Split train/validation      (Layer 4 - data)
//   Step 4: Checkpoints, save config    (Layer 6 - infra)
//   Step 5: Build or resume the model   (Layer 5 / 6)
//   Step 6: Run the epoch loop          (Layer 5 - ml)
//   Step 7: Save the final model        (Layer 6 - infra)
//   Step 8: Score the test set          (Layer 5 - ml, optional)
//
// The validation split comes out of the training pool. The
// official test set is only scored once, at the very end.
//
// With `resume`, the newest epoch checkpoint is picked up and
// training continues from the following epoch. The saved config
// must describe the same data and split, otherwise the
// validation examples would leak into training.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::FeaturizedLoader;
use crate::data::splitter::DEFAULT_SPLIT_SEED;
use crate::domain::labels::LabelIndex;
use crate::domain::traits::ExampleSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::passive_aggressive::PassiveAggressiveClassifier;
use crate::ml::trainer::{run_training, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_path:           String,
    pub test_path:            Option<String>,
    pub checkpoint_dir:       String,
    pub aggressiveness:       f64,
    pub epochs:               usize,
    pub split_fraction:       f64,
    pub seed:                 u64,
    pub lenient_second_guess: bool,
    pub coarse_labels:        bool,
    pub eval_every:           usize,
    pub checkpoint_every:     usize,

    #[serde(default)]
    pub resume:               bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_path:           "data/train".to_string(),
            test_path:            None,
            checkpoint_dir:       "checkpoints".to_string(),
            aggressiveness:       0.1,
            epochs:               1000,
            split_fraction:       0.9,
            seed:                 DEFAULT_SPLIT_SEED,
            lenient_second_guess: false,
            coarse_labels:        false,
            eval_every:           10,
            checkpoint_every:     10,
            resume:               false,
        }
    }
}

impl TrainConfig {
    /// Reject values the core would refuse later, before any I/O.
    pub fn validate(&self) -> Result<()> {
        if !(self.aggressiveness.is_finite() && self.aggressiveness > 0.0) {
            bail!("aggressiveness must be a positive number, got {}", self.aggressiveness);
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if !(self.split_fraction > 0.0 && self.split_fraction < 1.0) {
            bail!("split fraction must lie strictly between 0 and 1, got {}", self.split_fraction);
        }
        if self.eval_every == 0 || self.checkpoint_every == 0 {
            bail!("evaluation and checkpoint intervals must be at least 1");
        }
        Ok(())
    }

    /// Whether a run with `self` may continue the checkpoints of `saved`.
    fn check_resumable(&self, saved: &TrainConfig) -> Result<()> {
        if saved.train_path != self.train_path
            || saved.coarse_labels != self.coarse_labels
            || saved.seed != self.seed
            || saved.split_fraction != self.split_fraction
        {
            bail!(
                "Cannot resume: checkpoints in '{}' were trained on '{}' (seed {}, split {}, coarse {})",
                self.checkpoint_dir, saved.train_path, saved.seed, saved.split_fraction, saved.coarse_labels,
            );
        }
        if saved.aggressiveness != self.aggressiveness {
            tracing::warn!(
                "Resuming with C = {} (checkpoints used {}); the stored model keeps its own C",
                self.aggressiveness, saved.aggressiveness,
            );
        }
        Ok(())
    }
}

/// Result of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub report:        TrainingReport,
    pub model_path:    PathBuf,
    pub test_accuracy: Option<f64>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1-2: Load featurized examples ───────────────────────────────
        // One LabelIndex for both files, so test labels share numbering.
        let mut labels = LabelIndex::new();
        let pool = FeaturizedLoader::new(&cfg.train_path)
            .coarse(cfg.coarse_labels)
            .load_into(&mut labels)?;
        let test = match &cfg.test_path {
            Some(path) => Some(
                FeaturizedLoader::new(path)
                    .coarse(cfg.coarse_labels)
                    .load_into(&mut labels)?,
            ),
            None => None,
        };
        tracing::info!("Loaded {} training examples over {} labels", pool.len(), labels.len());

        // ── Step 3: Train / validation split ─────────────────────────────────
        let (train, val) = pool.split_with_seed(cfg.split_fraction, cfg.seed)?;
        tracing::info!("Split: {} train, {} validation", train.len(), val.len());

        // ── Step 4: Checkpoint directory and metrics ─────────────────────────
        let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 5: Fresh model, or the newest checkpoint ────────────────────
        let (completed, mut model) = if cfg.resume {
            cfg.check_resumable(&ckpt.load_config()?)?;
            let (epoch, mut model) = ckpt.load_latest()?;
            if model.labels() != &labels {
                bail!("Cannot resume: checkpoint labels differ from the training data");
            }
            model.set_lenient_second_guess(cfg.lenient_second_guess);
            tracing::info!("Resuming after epoch {}", epoch);
            (epoch, model)
        } else {
            let model = PassiveAggressiveClassifier::new(
                cfg.aggressiveness,
                labels,
                cfg.lenient_second_guess,
            )?;
            (0, model)
        };
        ckpt.save_config(cfg)?;

        // ── Step 6: Train ────────────────────────────────────────────────────
        let report = run_training(cfg, &mut model, &train, &val, &ckpt, &metrics, completed)?;

        // ── Step 7: Final model ──────────────────────────────────────────────
        let model_path = ckpt.save_final(&model)?;
        tracing::info!("Saved final model to '{}'", model_path.display());

        // ── Step 8: Official test set ────────────────────────────────────────
        let test_accuracy = match test {
            Some(test) if !test.is_empty() => Some(model.accuracy(&test)?),
            _ => None,
        };

        Ok(TrainOutcome { report, model_path, test_accuracy })
    }
}
