//! Generated collection files: verse index, manifest and host headers.

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use vvdata_parse::parse_output_file_name;

use crate::error::StoreError;

/// Manifest schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Static host headers allowing cross-origin reads and disabling caching.
pub const HEADERS: &str = "/vv/data/*
  Access-Control-Allow-Origin: *
  Cache-Control: no-store

/vv/manifests/*
  Access-Control-Allow-Origin: *
  Cache-Control: no-store

";

/// Listing of the verse files present in a collection directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionIndex {
    pub collection: String,
    pub count: usize,
    pub items: Vec<IndexItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    pub file: String,
    pub verse: u32,
}

/// Entry point the site uses to find a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Public path of the collection, with a leading slash
    pub base: String,
    pub total: usize,
    pub schema_version: String,
    pub last_updated: String,
}

impl Manifest {
    pub fn new(base: &str, total: usize, now: &str) -> Self {
        Self {
            base: format!("/{}", base.trim_matches('/')),
            total,
            schema_version: SCHEMA_VERSION.to_string(),
            last_updated: now.to_string(),
        }
    }
}

/// Current UTC time as ISO-8601 with seconds precision (e.g., "2024-05-01T12:00:00+00:00").
pub fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Build the index from the generated verse files actually present in `dir`.
pub fn scan_index(collection: &str, dir: &Path) -> CollectionIndex {
    let mut items: Vec<IndexItem> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            let verse = parse_output_file_name(&name)?;
            Some(IndexItem { file: name, verse })
        })
        .collect();

    items.sort_by(|a, b| a.verse.cmp(&b.verse).then_with(|| a.file.cmp(&b.file)));

    CollectionIndex {
        collection: collection.to_string(),
        count: items.len(),
        items,
    }
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| StoreError::WriteError(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::WriteError(e.to_string()))?;
    }

    fs::write(path, json)
        .map_err(|e| StoreError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Write the host headers file if its content differs.
///
/// Returns whether the file was written.
pub fn ensure_headers(path: &Path) -> Result<bool, StoreError> {
    let current = fs::read_to_string(path).unwrap_or_default();
    if current == HEADERS {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::WriteError(e.to_string()))?;
    }
    fs::write(path, HEADERS)
        .map_err(|e| StoreError::WriteError(format!("{}: {}", path.display(), e)))?;

    Ok(true)
}
