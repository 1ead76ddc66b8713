// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores classifiers and the training configuration
// inside one directory.
//
// Directory layout:
//   checkpoints/
//     model_epoch_10.json   ← classifier after epoch 10
//     model_epoch_20.json   ← classifier after epoch 20
//     ...
//     latest_epoch.json     ← number of the newest epoch checkpoint
//     model.json            ← final model written after training
//     train_config.json     ← the TrainConfig used for the run
//     metrics.csv           ← see metrics.rs
//
// Every model file is a versioned artifact written atomically
// (see artifact.rs), so a crash mid-save never corrupts an
// existing checkpoint.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::application::train_use_case::TrainConfig;
use crate::domain::traits::Persistable;
use crate::infra::artifact;
use crate::ml::passive_aggressive::PassiveAggressiveClassifier;

/// File name of the model written at the end of training.
pub const FINAL_MODEL: &str = "model.json";

const LATEST_EPOCH: &str = "latest_epoch.json";
const TRAIN_CONFIG: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    /// Directory where checkpoints are stored
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn epoch_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}.json"))
    }

    pub fn final_path(&self) -> PathBuf {
        self.dir.join(FINAL_MODEL)
    }

    /// Save the classifier as it stands after `epoch` and point
    /// latest_epoch.json at it.
    pub fn save_model(&self, model: &PassiveAggressiveClassifier, epoch: usize) -> Result<()> {
        let path = self.epoch_path(epoch);
        model
            .save(&path)
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let latest = self.dir.join(LATEST_EPOCH);
        artifact::write_atomic(&latest, serde_json::to_string(&epoch)?.as_bytes())
            .with_context(|| format!("Failed to write '{}'", latest.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Save the final model.
    pub fn save_final(&self, model: &PassiveAggressiveClassifier) -> Result<PathBuf> {
        let path = self.final_path();
        model
            .save(&path)
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;
        Ok(path)
    }

    /// Load the newest epoch checkpoint together with its epoch number.
    pub fn load_latest(&self) -> Result<(usize, PassiveAggressiveClassifier)> {
        let epoch = self.latest_epoch()?;
        let path  = self.epoch_path(epoch);

        tracing::info!("Loading checkpoint from epoch {}", epoch);
        Ok((epoch, load_model(&path)?))
    }

    /// Save the training configuration as pretty JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Read latest_epoch.json; fails if no epoch checkpoint exists yet.
    fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_EPOCH);

        let s = fs::read_to_string(&path).with_context(|| {
            format!("Cannot find '{}'. Has a checkpoint been saved?", path.display())
        })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

/// Load a classifier artifact from any path.
pub fn load_model(path: &Path) -> Result<PassiveAggressiveClassifier> {
    PassiveAggressiveClassifier::load(path)
        .with_context(|| format!("Cannot load model '{}'", path.display()))
}
