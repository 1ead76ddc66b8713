// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// The learning core and the loop that drives it.
//
//   passive_aggressive.rs — PA-I multi-class classifier: one
//                           sparse weight vector per label,
//                           train / rank / accuracy / save / load
//
//   weighted_scorer.rs    — hand-authored weight vector behind the
//                           same Scorer trait as the classifier
//
//   trainer.rs            — epoch loop with periodic validation,
//                           checkpoints and metrics rows
//
// Reference: Crammer et al. (2006) Online Passive-Aggressive Algorithms

/// Multi-class Passive-Aggressive (PA-I) classifier
pub mod passive_aggressive;

/// Epoch loop with validation and checkpointing
pub mod trainer;

/// Manually weighted single-output scorer
pub mod weighted_scorer;
