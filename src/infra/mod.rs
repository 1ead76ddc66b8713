// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to a single layer:
//
//   artifact.rs    — Versioned, atomically written model files.
//                    Checks the format/version header before a
//                    model body is decoded.
//
//   checkpoint.rs  — Checkpoint directory management: per-epoch
//                    models, the final model, latest_epoch.json
//                    and the saved TrainConfig.
//
//   metrics.rs     — Epoch-level metrics (loss, skipped examples,
//                    validation accuracy) appended to a CSV file.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Atomic writes and header checks for model artifacts
pub mod artifact;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
