//! Record of processed raw files (raw_index.json).
//!
//! Maps each raw file name to the digest it had when last parsed, so later
//! runs only reparse files whose content changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::output::write_json;

/// Processed-file state for one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIndex {
    /// HEAD of the raw repository at the last successful run
    #[serde(default)]
    pub last_parsed_commit: String,

    /// Entries keyed by raw file name
    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
}

/// What a raw file produced the last time it was parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub sha256: String,
    pub verse: u32,
    /// Generated file name (e.g., "verse-007.json")
    pub target: String,
}

impl RawIndex {
    /// Load state, or an empty state if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| StoreError::StateError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Write state, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json(path, self)
    }

    /// Digest recorded for a raw file, if any.
    pub fn digest(&self, rel: &str) -> Option<&str> {
        self.files.get(rel).map(|e| e.sha256.as_str())
    }

    /// Check whether a raw file's current digest differs from the recorded one.
    pub fn is_changed(&self, rel: &str, digest: &str) -> bool {
        self.digest(rel) != Some(digest)
    }

    pub fn record(&mut self, rel: impl Into<String>, entry: FileEntry) {
        self.files.insert(rel.into(), entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let temp = tempdir().unwrap();

        let state = RawIndex::load(&temp.path().join("raw_index.json")).unwrap();

        assert_eq!(state, RawIndex::default());
    }

    #[test]
    fn saves_and_reloads() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("vv/state/raw_index.json");

        let mut state = RawIndex::default();
        state.record(
            "verse-1.txt",
            FileEntry {
                sha256: "abc".to_string(),
                verse: 1,
                target: "verse-001.json".to_string(),
            },
        );
        state.save(&path).unwrap();

        let loaded = RawIndex::load(&path).unwrap();

        assert_eq!(loaded, state);
        assert!(!loaded.is_changed("verse-1.txt", "abc"));
        assert!(loaded.is_changed("verse-1.txt", "def"));
        assert!(loaded.is_changed("verse-2.txt", "abc"));
    }

    #[test]
    fn reads_state_without_commit_field() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("raw_index.json");
        fs::write(
            &path,
            r#"{"files": {"verse-2.txt": {"sha256": "FORCED", "verse": 2, "target": "verse-002.json"}}}"#,
        )
        .unwrap();

        let state = RawIndex::load(&path).unwrap();

        assert_eq!(state.last_parsed_commit, "");
        assert_eq!(state.digest("verse-2.txt"), Some("FORCED"));
    }

    #[test]
    fn corrupt_state_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("raw_index.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            RawIndex::load(&path),
            Err(StoreError::StateError { .. })
        ));
    }
}
