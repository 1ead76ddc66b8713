// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   summed hinge loss over the training split
//   - skipped:      zero-magnitude examples that were not updated
//   - val_accuracy: accuracy on the validation split, empty on
//                   epochs where it was not measured
//
// Output file: <checkpoint_dir>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,skipped,val_accuracy
//   1,4417.250000,0,
//   10,812.031250,0,0.842000
//
// How to read the metrics:
//   - train_loss should fall towards 0 on separable data
//   - val_accuracy flattening while train_loss keeps falling
//     means more epochs will not help

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Hinge loss summed over every training example
    pub train_loss: f64,

    /// Examples skipped because their feature vector was all zero
    pub skipped: usize,

    /// Validation accuracy, when it was measured this epoch
    pub val_accuracy: Option<f64>,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, skipped: usize, val_accuracy: Option<f64>) -> Self {
        Self { epoch, train_loss, skipped, val_accuracy }
    }

    /// Returns true if this epoch beat the best validation accuracy so far
    pub fn is_improvement(&self, best_accuracy: f64) -> bool {
        self.val_accuracy.map_or(false, |a| a > best_accuracy)
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");

        // Appending across runs keeps the header single
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,skipped,val_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        let accuracy = m
            .val_accuracy
            .map(|a| format!("{a:.6}"))
            .unwrap_or_default();

        writeln!(f, "{},{:.6},{},{}", m.epoch, m.train_loss, m.skipped, accuracy)?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_accuracy={:?}",
            m.epoch,
            m.train_loss,
            m.val_accuracy,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
