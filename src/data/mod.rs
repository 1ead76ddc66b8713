// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the featurizer's output and the classifier:
//
//   featurizer output (JSON Lines)
//       │
//       ▼
//   FeaturizedLoader  → parses examples, indexes labels
//       │
//       ▼
//   DataSet           → parallel raw / featurized sequences
//       │
//       ▼
//   splitter          → seeded shuffle, train/validation cut
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Parallel raw/featurized example collection
pub mod dataset;

/// Reads featurized examples from JSON Lines files
pub mod loader;

/// Seeded shuffle and train/validation split
pub mod splitter;
