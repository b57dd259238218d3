//! Structured verse records as written to the data repository.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::traits::ParseError;

/// Language keys every verse record must carry.
pub const REQUIRED_KEYS: [&str; 3] = ["sa", "te", "en"];

/// One verse, normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Sanskrit text
    pub sa: String,

    /// Telugu text
    pub te: String,

    /// English rendering
    pub en: String,

    /// Stable identifier (format: {collection}/{NNN})
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Any additional keys supplied by the raw file
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Provenance information attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// UTC timestamp of the last regeneration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VerseRecord {
    /// Create a record from the three language texts.
    pub fn new(sa: impl Into<String>, te: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            sa: sa.into(),
            te: te.into(),
            en: en.into(),
            ..Default::default()
        }
    }

    /// Fill in collection-derived defaults and stamp the modification time.
    ///
    /// `id` and `metadata.source` are only set when absent;
    /// `metadata.last_modified` is always overwritten.
    pub fn normalize(&mut self, collection: &str, verse: u32, now: &str) {
        if self.id.is_none() {
            self.id = Some(verse_id(collection, verse));
        }
        if self.metadata.source.is_none() {
            let source = collection.split('/').next().unwrap_or(collection);
            self.metadata.source = Some(source.to_string());
        }
        self.metadata.last_modified = Some(now.to_string());
    }
}

/// Identifier for a verse within a collection.
pub fn verse_id(collection: &str, verse: u32) -> String {
    format!("{}/{:03}", collection, verse)
}

/// Check that a raw JSON object carries every required language key.
pub fn validate_minimal(obj: &Map<String, Value>, verse_id: &str) -> Result<(), ParseError> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|k| !obj.contains_key(**k))
        .map(|k| k.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MissingKeys {
            verse: verse_id.to_string(),
            keys: missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalize_fills_defaults() {
        let mut record = VerseRecord::new("a", "b", "c");
        record.normalize("mvr/vishnu", 7, "2024-01-01T00:00:00+00:00");

        assert_eq!(record.id.as_deref(), Some("mvr/vishnu/007"));
        assert_eq!(record.metadata.source.as_deref(), Some("mvr"));
        assert_eq!(
            record.metadata.last_modified.as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn normalize_keeps_existing_id_and_source() {
        let mut record = VerseRecord::new("a", "b", "c");
        record.id = Some("custom".to_string());
        record.metadata.source = Some("manual".to_string());
        record.metadata.last_modified = Some("old".to_string());

        record.normalize("mvr/vishnu", 1, "new");

        assert_eq!(record.id.as_deref(), Some("custom"));
        assert_eq!(record.metadata.source.as_deref(), Some("manual"));
        assert_eq!(record.metadata.last_modified.as_deref(), Some("new"));
    }

    #[test]
    fn serializes_in_stable_key_order() {
        let mut record = VerseRecord::new("ॐ", "ఓం", "Om");
        record.normalize("mvr/vishnu", 1, "t");

        let out = serde_json::to_string_pretty(&record).unwrap();
        let sa = out.find("\"sa\"").unwrap();
        let id = out.find("\"id\"").unwrap();
        let meta = out.find("\"metadata\"").unwrap();

        assert!(sa < id && id < meta);
        // Non-ASCII text is written verbatim.
        assert!(out.contains("ॐ"));
    }

    #[test]
    fn extra_keys_round_trip() {
        let value = json!({
            "sa": "a", "te": "b", "en": "c",
            "meaning": "m",
            "metadata": { "reviewer": "r" }
        });

        let record: VerseRecord = serde_json::from_value(value).unwrap();

        assert_eq!(record.extra.get("meaning"), Some(&json!("m")));
        assert_eq!(record.metadata.extra.get("reviewer"), Some(&json!("r")));
        assert!(record.metadata.source.is_none());
    }

    #[test]
    fn reports_every_missing_key() {
        let obj = json!({ "sa": "only sanskrit" });

        let err = validate_minimal(obj.as_object().unwrap(), "verse-003.json").unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"verse-003.json: missing keys ["te", "en"]"#
        );
    }
}
