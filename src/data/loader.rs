// ============================================================
// Layer 4 — Featurized Example Loader
// ============================================================
// Reads the featurizer's output: JSON Lines, one example per
// line.
//
//   {"label": "LOC:city", "text": "What is the capital of ...?",
//    "features": {"wh_what": 1.0, "lemma_capital": 1.0, ...}}
//
// The path may be a single file or a directory. Directory entries
// are read in sorted file-name order so that the example order
// (and therefore the seeded split) is the same on every machine.
//
// Labels are indexed into a LabelIndex owned by the caller, so a
// train file and a test file loaded one after the other share the
// same numbering.
//
// Coarse mode keeps only the part of the label before ':'
// ("LOC:city" → "LOC").

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::dataset::DataSet;
use crate::domain::example::RawExample;
use crate::domain::labels::LabelIndex;
use crate::domain::sparse_vector::SparseVector;
use crate::domain::traits::ExampleSource;

/// One line of featurizer output.
#[derive(Debug, Deserialize)]
struct FeaturizedRecord {
    label: String,

    #[serde(default)]
    text: String,

    features: BTreeMap<String, f64>,
}

/// Reduce a fine label to its coarse category.
pub fn coarse_label(label: &str) -> &str {
    label.split(':').next().unwrap_or(label)
}

/// Loads featurized examples from a JSON Lines file or directory.
pub struct FeaturizedLoader {
    path:   PathBuf,
    coarse: bool,
}

impl FeaturizedLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:   path.into(),
            coarse: false,
        }
    }

    /// Index coarse labels instead of fine ones.
    pub fn coarse(mut self, coarse: bool) -> Self {
        self.coarse = coarse;
        self
    }

    /// Files to read, in a stable order.
    fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.path.exists() {
            bail!("Data path '{}' does not exist", self.path.display());
        }
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)
            .with_context(|| format!("Cannot read directory '{}'", self.path.display()))?
        {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'));
            if path.is_file() && !hidden {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_file(&self, path: &Path, labels: &mut LabelIndex, data: &mut DataSet) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let before = data.len();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let record: FeaturizedRecord = serde_json::from_str(line)
                .with_context(|| format!("{}:{}: malformed example", path.display(), n + 1))?;

            let label = if self.coarse {
                coarse_label(&record.label).to_string()
            } else {
                record.label
            };

            let index = labels.index_of(&label);
            data.push(
                RawExample::new(label, record.text),
                index,
                SparseVector::from(record.features),
            );
        }

        tracing::debug!("Loaded {} examples from '{}'", data.len() - before, path.display());
        Ok(())
    }
}

impl ExampleSource for FeaturizedLoader {
    fn load_into(&self, labels: &mut LabelIndex) -> Result<DataSet> {
        let mut data = DataSet::new();
        for file in self.files()? {
            self.read_file(&file, labels, &mut data)?;
        }

        tracing::info!(
            "Loaded {} examples ({} labels known) from '{}'",
            data.len(),
            labels.len(),
            self.path.display()
        );
        Ok(data)
    }
}

/// Parse a single feature object, e.g. `{"wh_what": 1.0}`.
pub fn parse_features(json: &str) -> Result<SparseVector> {
    let features: BTreeMap<String, f64> =
        serde_json::from_str(json).context("Features must be a JSON object of name → number")?;
    Ok(SparseVector::from(features))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TRAIN: &str = r#"{"label": "LOC:city", "text": "Where is Paris?", "features": {"wh_where": 1.0, "w_paris": 1.0}}

{"label": "HUM:ind", "text": "Who wrote Hamlet?", "features": {"wh_who": 1.0}}
{"label": "LOC:country", "text": "Where is Peru?", "features": {"wh_where": 1.0, "w_peru": 0.5}}
"#;

    #[test]
    fn test_loads_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("train.jsonl");
        fs::write(&file, TRAIN).unwrap();

        let mut labels = LabelIndex::new();
        let data = FeaturizedLoader::new(&file).load_into(&mut labels).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(labels.len(), 3);
        assert_eq!(data.raw_points()[1].text, "Who wrote Hamlet?");
        assert_eq!(data.points()[2].features.value("w_peru"), 0.5);
        assert_eq!(labels.label_of(data.points()[2].label).unwrap(), "LOC:country");
    }

    #[test]
    fn test_coarse_labels() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("train.jsonl");
        fs::write(&file, TRAIN).unwrap();

        let mut labels = LabelIndex::new();
        let data = FeaturizedLoader::new(&file)
            .coarse(true)
            .load_into(&mut labels)
            .unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(data.points()[0].label, data.points()[2].label);
        assert_eq!(data.raw_points()[0].label, "LOC");
    }

    #[test]
    fn test_directory_read_in_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), r#"{"label": "B", "features": {}}"#).unwrap();
        fs::write(dir.path().join("a.jsonl"), r#"{"label": "A", "features": {}}"#).unwrap();
        fs::write(dir.path().join(".hidden"), "not json").unwrap();

        let mut labels = LabelIndex::new();
        let data = FeaturizedLoader::new(dir.path()).load_into(&mut labels).unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(labels.label_of(0).unwrap(), "A");
        assert_eq!(labels.label_of(1).unwrap(), "B");
    }

    #[test]
    fn test_shared_label_index() {
        let dir = tempdir().unwrap();
        let train = dir.path().join("train.jsonl");
        let test = dir.path().join("test.jsonl");
        fs::write(&train, r#"{"label": "A", "features": {"x": 1.0}}"#).unwrap();
        fs::write(&test, "{\"label\": \"B\", \"features\": {}}\n{\"label\": \"A\", \"features\": {}}").unwrap();

        let mut labels = LabelIndex::new();
        FeaturizedLoader::new(&train).load_into(&mut labels).unwrap();
        let test_data = FeaturizedLoader::new(&test).load_into(&mut labels).unwrap();

        assert_eq!(test_data.points()[0].label, 1);
        assert_eq!(test_data.points()[1].label, 0);
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.jsonl");
        fs::write(&file, "{\"label\": \"A\", \"features\": {}}\n{oops}\n").unwrap();

        let err = FeaturizedLoader::new(&file)
            .load_into(&mut LabelIndex::new())
            .unwrap_err();
        assert!(format!("{err}").contains(":2:"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let res = FeaturizedLoader::new("/definitely/not/here").load_into(&mut LabelIndex::new());
        assert!(res.is_err());
    }

    #[test]
    fn test_coarse_label_helper() {
        assert_eq!(coarse_label("NUM:date"), "NUM");
        assert_eq!(coarse_label("YESNO"), "YESNO");
    }

    #[test]
    fn test_parse_features() {
        let v = parse_features(r#"{"a": 2.0, "b": -1}"#).unwrap();
        assert_eq!(v.value("a"), 2.0);
        assert_eq!(v.value("b"), -1.0);
        assert!(parse_features("[1, 2]").is_err());
    }
}
