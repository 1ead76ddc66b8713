// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits that define the core concepts:
// sparse vectors, labels, examples, errors and capabilities.
//
// Rules for this layer:
//   - NO file I/O
//   - NO training logic
//   - Only structs, enums, traits and their pure operations
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Typed errors for the learning core
pub mod error;

/// Raw and featurized example records, ranking entries
pub mod example;

/// Bidirectional label ↔ index mapping
pub mod labels;

/// Named-dimension sparse vector algebra
pub mod sparse_vector;

/// Scorer, Persistable and ExampleSource capabilities
pub mod traits;
