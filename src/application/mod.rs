// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal each:
//
//   train    → load, split, train, checkpoint, save, test
//   evaluate → load a model and score it on a test file
//   rank     → load a model and rank single examples
//
// Rules for this layer:
//   - No learning math here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

/// The training workflow
pub mod train_use_case;

/// Accuracy of a saved model on a test file
pub mod evaluate_use_case;

/// Ranking of single featurized examples
pub mod rank_use_case;
