// ============================================================
// Layer 3 — Sparse Feature Vector
// ============================================================
// A vector over named dimensions where almost every dimension
// is zero. Only the features that were actually emitted are
// stored; every other name implicitly has the value 0.0.
//
// The same type plays two roles:
//   - an example's features, produced by the featurizer
//   - one row of the classifier's weight matrix
//
// Storage is a BTreeMap so iteration happens in key order.
// Dot products therefore always sum the overlapping features in
// the same order, which makes a.dot(b) and b.dot(a) bit-identical
// and keeps scores stable across a save/load cycle.
//
// Mutating operations:   add, add_value, sum, add_scaled, merge_average
// Functional operations: scale, with_prefix, cross, average
//
// Reference: Rust Book §8 (Collections), §10 (Traits)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{CoreError, Result};

/// Separator placed between the two source names of a crossed feature.
pub const CROSS_SEPARATOR: &str = "_X_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseVector {
    features: BTreeMap<String, f64>,
}

impl SparseVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight for `name`, or 0.0 if the feature is absent.
    pub fn value(&self, name: &str) -> f64 {
        self.features.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Number of stored features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate `(name, weight)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.features.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Add a binary feature (weight 1.0).
    ///
    /// Fails with [`CoreError::DuplicateFeature`] if the name is
    /// already present: one featurization pass must never emit
    /// the same name twice.
    pub fn add(&mut self, name: impl Into<String>) -> Result<()> {
        self.add_value(name, 1.0)
    }

    /// Add a feature with an explicit weight. Same duplicate rule as [`add`](Self::add).
    pub fn add_value(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        use std::collections::btree_map::Entry;

        match self.features.entry(name.into()) {
            Entry::Occupied(e) => Err(CoreError::DuplicateFeature(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }

    /// Inner product over the features both vectors share.
    ///
    /// Walks the smaller vector and probes the larger one. Both
    /// maps are ordered, so the overlapping terms are summed in
    /// the same order no matter which side is walked.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        small
            .features
            .iter()
            .filter_map(|(k, v)| large.features.get(k).map(|w| v * w))
            .sum()
    }

    /// In-place sum: every feature of `other` is added into `self`,
    /// creating it when absent.
    pub fn sum(&mut self, other: &SparseVector) {
        for (k, v) in &other.features {
            *self.features.entry(k.clone()).or_insert(0.0) += v;
        }
    }

    /// In-place `self += other * factor` without materialising the scaled copy.
    pub fn add_scaled(&mut self, other: &SparseVector, factor: f64) {
        for (k, v) in &other.features {
            *self.features.entry(k.clone()).or_insert(0.0) += v * factor;
        }
    }

    /// New vector with every weight multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> SparseVector {
        self.features
            .iter()
            .map(|(k, v)| (k.clone(), v * factor))
            .collect()
    }

    /// Pairwise averaging merge.
    ///
    /// Shared features become `(self + other) / 2`; features only in
    /// `other` are copied as-is. Chaining this over more than two
    /// vectors does NOT give their mean, use [`average`](Self::average).
    pub fn merge_average(&mut self, other: &SparseVector) {
        for (k, v) in &other.features {
            self.features
                .entry(k.clone())
                .and_modify(|cur| *cur = (*cur + v) / 2.0)
                .or_insert(*v);
        }
    }

    /// True N-way mean: sum every vector, then scale once by `1 / n`.
    /// An empty slice yields an empty vector.
    pub fn average(vectors: &[SparseVector]) -> SparseVector {
        if vectors.is_empty() {
            return SparseVector::new();
        }

        let mut acc = SparseVector::new();
        for v in vectors {
            acc.sum(v);
        }
        acc.scale(1.0 / vectors.len() as f64)
    }

    /// New vector with every name rewritten to `{prefix}_{name}`.
    pub fn with_prefix(&self, prefix: &str) -> SparseVector {
        self.features
            .iter()
            .map(|(k, v)| (format!("{prefix}_{k}"), *v))
            .collect()
    }

    /// Pairwise conjunction of two feature sets.
    ///
    /// Emits `{k1}_X_{k2}` with weight 1.0 for every pair. Source
    /// magnitudes are discarded: a crossed feature encodes only that
    /// both names were present.
    pub fn cross(&self, other: &SparseVector) -> SparseVector {
        let mut crossed = SparseVector::new();
        for k1 in self.features.keys() {
            for k2 in other.features.keys() {
                crossed
                    .features
                    .insert(format!("{k1}{CROSS_SEPARATOR}{k2}"), 1.0);
            }
        }
        crossed
    }
}

impl From<BTreeMap<String, f64>> for SparseVector {
    fn from(features: BTreeMap<String, f64>) -> Self {
        Self { features }
    }
}

impl From<std::collections::HashMap<String, f64>> for SparseVector {
    fn from(features: std::collections::HashMap<String, f64>) -> Self {
        features.into_iter().collect()
    }
}

impl FromIterator<(String, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for SparseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.features {
            writeln!(f, "{k} : {v}")?;
        }
        Ok(())
    }
}
