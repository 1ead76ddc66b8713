// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Drives the classifier for a fixed number of epochs:
//
//   for epoch in (completed + 1)..=epochs
//       train one pass over the training split (storage order,
//       no per-epoch reshuffle)
//       every eval_every epochs        → validation accuracy
//       every checkpoint_every epochs  → model_epoch_{n}.json
//       append a metrics.csv row
//   final validation accuracy, final model.json
//
// Any error from the core (unknown label, empty split, I/O)
// aborts the run; there is no partial recovery mid-epoch.

use anyhow::{Context, Result};

use crate::application::train_use_case::TrainConfig;
use crate::data::dataset::DataSet;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::passive_aggressive::PassiveAggressiveClassifier;

/// What a finished run achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,

    /// Summed loss of the last epoch
    pub final_loss: f64,

    /// Validation accuracy after the last epoch (None if the split was empty)
    pub val_accuracy: Option<f64>,

    pub best_val_accuracy: Option<f64>,
}

/// Validation accuracy, or None when there is nothing to validate on.
fn validate(model: &PassiveAggressiveClassifier, val: &DataSet) -> Result<Option<f64>> {
    if val.is_empty() {
        return Ok(None);
    }
    Ok(Some(model.accuracy(val)?))
}

/// Train `model` from epoch `completed + 1` up to `cfg.epochs`.
///
/// `completed` is 0 for a fresh model and the checkpoint's epoch when
/// resuming. If no epoch is left to run, `final_loss` is NaN.
pub fn run_training(
    cfg:       &TrainConfig,
    model:     &mut PassiveAggressiveClassifier,
    train:     &DataSet,
    val:       &DataSet,
    ckpt:      &CheckpointManager,
    metrics:   &MetricsLogger,
    completed: usize,
) -> Result<TrainingReport> {
    cfg.validate()?;
    if completed >= cfg.epochs {
        tracing::warn!("Nothing to train: {} of {} epochs already done", completed, cfg.epochs);
    }
    if val.is_empty() {
        tracing::warn!("Validation split is empty; accuracy will not be tracked");
    }

    let mut final_loss = f64::NAN;
    let mut best: Option<f64> = None;

    for epoch in (completed + 1)..=cfg.epochs {
        let summary = model
            .train_epoch(train)
            .with_context(|| format!("Training failed in epoch {epoch}"))?;
        final_loss = summary.total_loss;

        tracing::info!(
            "Epoch {:>4}/{} | loss over {} examples: {:.6}",
            epoch, cfg.epochs, summary.examples, summary.total_loss,
        );
        if summary.skipped > 0 {
            tracing::debug!("Epoch {}: {} zero-magnitude examples skipped", epoch, summary.skipped);
        }

        let val_accuracy = if epoch % cfg.eval_every == 0 {
            validate(model, val)?
        } else {
            None
        };

        let row = EpochMetrics::new(epoch, summary.total_loss, summary.skipped, val_accuracy);
        if let Some(acc) = val_accuracy {
            tracing::info!("Intermediate accuracy after {} epochs: {:.4}", epoch, acc);
            if row.is_improvement(best.unwrap_or(f64::NEG_INFINITY)) {
                best = Some(acc);
            }
        }
        metrics.log(&row)?;

        if epoch % cfg.checkpoint_every == 0 {
            ckpt.save_model(model, epoch)?;
        }
    }

    let val_accuracy = validate(model, val)?;
    if let Some(acc) = val_accuracy {
        best = Some(best.map_or(acc, |b| b.max(acc)));
        tracing::info!("Ended training after {} epochs, accuracy: {:.4}", cfg.epochs, acc);
    }

    Ok(TrainingReport {
        epochs: cfg.epochs,
        final_loss,
        val_accuracy,
        best_val_accuracy: best,
    })
}
