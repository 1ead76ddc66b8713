// ============================================================
// Layer 3 — Core Error Taxonomy
// ============================================================
// Every failure the learning core can report.
//
// The upper layers (application, cli, loaders) work with
// anyhow::Result and attach file/line context. The core layers
// return this typed enum instead so callers can match on the
// exact failure (e.g. an unsupported artifact version).
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

/// Result alias used by the domain, data and ml layers.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A feature name was emitted twice through the single-value `add` path.
    #[error("feature '{0}' already exists")]
    DuplicateFeature(String),

    /// A label index outside `[0, size)` was looked up.
    #[error("label index {index} is unknown (label count is {size})")]
    UnknownIndex { index: usize, size: usize },

    /// The example's feature vector has zero magnitude, so no step size exists.
    #[error("feature vector has zero magnitude; step size is undefined")]
    DegenerateStep,

    /// The artifact header names a format or version this build cannot read.
    #[error("unsupported model artifact: format '{format}', version {version}")]
    UnsupportedFormat { format: String, version: u32 },

    /// The artifact parsed but its contents are inconsistent.
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// Training or evaluation was asked to run over zero examples.
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("split fraction must lie strictly between 0 and 1, got {0}")]
    InvalidSplitFraction(f64),

    #[error("aggressiveness C must be positive and finite, got {0}")]
    InvalidAggressiveness(f64),

    /// A competitor class is needed for every update.
    #[error("training needs at least 2 labels, found {0}")]
    TooFewLabels(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
