//! Multi-class question classification with an online
//! Passive-Aggressive (PA-I) learner over sparse named features.
//!
//! Layers, from the outside in:
//!
//! - [`cli`]: argument parsing and printing
//! - [`application`]: train / evaluate / rank workflows
//! - [`domain`]: sparse vectors, labels, examples and the core traits
//! - [`data`]: datasets, loading and the seeded split
//! - [`ml`]: the classifier and the epoch loop
//! - [`infra`]: artifacts, checkpoints and metrics on disk

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;
