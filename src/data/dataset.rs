// ============================================================
// Layer 4 — DataSet
// ============================================================
// An ordered collection of examples held as two parallel
// sequences:
//
//   raw[i]     → (label string, original text)
//   points[i]  → (label index, feature vector)
//
// raw[i] and points[i] always describe the same example. Every
// reordering goes through one permutation applied to both.
//
// The LabelIndex is NOT stored here. It belongs to whoever loaded
// the data, and a split never renumbers labels, so both halves
// keep using the loader's index.

use crate::data::splitter::{self, DEFAULT_SPLIT_SEED};
use crate::domain::error::Result;
use crate::domain::example::{LabeledExample, RawExample};
use crate::domain::sparse_vector::SparseVector;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    raw:    Vec<RawExample>,
    points: Vec<LabeledExample>,
}

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one example in both forms.
    pub fn push(&mut self, raw: RawExample, label: usize, features: SparseVector) {
        self.raw.push(raw);
        self.points.push(LabeledExample::new(label, features));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn raw_points(&self) -> &[RawExample] {
        &self.raw
    }

    pub fn points(&self) -> &[LabeledExample] {
        &self.points
    }

    /// Iterate both forms together, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&RawExample, &LabeledExample)> {
        self.raw.iter().zip(self.points.iter())
    }

    /// Shuffle with the default seed and split off the first
    /// `floor(len * fraction)` examples.
    pub fn split(self, fraction: f64) -> Result<(DataSet, DataSet)> {
        self.split_with_seed(fraction, DEFAULT_SPLIT_SEED)
    }

    pub fn split_with_seed(self, fraction: f64, seed: u64) -> Result<(DataSet, DataSet)> {
        // Zipping keeps the two sequences in lock-step under the shuffle.
        let paired: Vec<(RawExample, LabeledExample)> =
            self.raw.into_iter().zip(self.points).collect();

        let (first, second) = splitter::split_train_val(paired, fraction, seed)?;
        Ok((Self::from_pairs(first), Self::from_pairs(second)))
    }

    fn from_pairs(pairs: Vec<(RawExample, LabeledExample)>) -> Self {
        let (raw, points) = pairs.into_iter().unzip();
        Self { raw, points }
    }
}
