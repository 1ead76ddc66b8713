// ============================================================
// Layer 3 — Label Index
// ============================================================
// Bidirectional mapping between class labels ("LOC:city",
// "HUM:ind", ...) and dense integer indices 0..N.
//
// Indices are handed out in first-seen order and never change,
// so the classifier's weight array can be addressed by index.
//
// On disk the index is just the ordered list of labels:
// position i holds the label whose index is i.

use std::collections::HashMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::domain::error::{CoreError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelIndex {
    index:   HashMap<String, usize>,
    reverse: Vec<String>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `label`, assigning the next free index on first sight.
    pub fn index_of(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.reverse.len();
        self.index.insert(label.to_string(), i);
        self.reverse.push(label.to_string());
        i
    }

    /// Index of an already known label, without inserting.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label for `index`; fails for an index that was never assigned.
    pub fn label_of(&self, index: usize) -> Result<&str> {
        self.reverse
            .get(index)
            .map(String::as_str)
            .ok_or(CoreError::UnknownIndex { index, size: self.len() })
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// All indices in ascending order. This is the canonical per-label
    /// iteration order (and the weight array's layout).
    pub fn indices(&self) -> Range<usize> {
        0..self.len()
    }

    /// Labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.reverse.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for LabelIndex {
    type Error = CoreError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(CoreError::CorruptArtifact(format!(
                    "label '{label}' appears more than once in the label table"
                )));
            }
        }
        Ok(Self { index, reverse: labels })
    }
}

impl From<LabelIndex> for Vec<String> {
    fn from(labels: LabelIndex) -> Self {
        labels.reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let mut labels = LabelIndex::new();
        let got: Vec<usize> = ["A", "B", "A", "C"]
            .iter()
            .map(|l| labels.index_of(l))
            .collect();
        assert_eq!(got, vec![0, 1, 0, 2]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_label_of_inverts_index_of() {
        let mut labels = LabelIndex::new();
        for l in ["DESC:def", "NUM:date", "LOC:city"] {
            let i = labels.index_of(l);
            assert_eq!(labels.label_of(i).unwrap(), l);
        }
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let mut labels = LabelIndex::new();
        labels.index_of("A");
        let err = labels.label_of(1).unwrap_err();
        assert!(matches!(err, CoreError::UnknownIndex { index: 1, size: 1 }));
    }

    #[test]
    fn test_get_does_not_insert() {
        let labels = LabelIndex::new();
        assert_eq!(labels.get("A"), None);
        assert!(labels.is_empty());
    }

    #[test]
    fn test_indices_are_restartable() {
        let mut labels = LabelIndex::new();
        labels.index_of("x");
        labels.index_of("y");
        let first: Vec<usize> = labels.indices().collect();
        let second: Vec<usize> = labels.indices().collect();
        assert_eq!(first, vec![0, 1]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serde_keeps_positions() {
        let mut labels = LabelIndex::new();
        labels.index_of("b");
        labels.index_of("a");
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"["b","a"]"#);
        let back: LabelIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, labels);
    }

    #[test]
    fn test_duplicate_labels_rejected_on_load() {
        let res: std::result::Result<LabelIndex, _> = serde_json::from_str(r#"["a","a"]"#);
        assert!(res.is_err());
    }
}
