//! Optional YAML header on raw verse files.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Keys a header may not set because the parser owns them.
const RESERVED_KEYS: [&str; 4] = ["sa", "te", "en", "metadata"];

/// Parsed header from a raw verse file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Explicit record id, overriding the collection-derived one
    #[serde(default)]
    pub id: Option<String>,

    /// Source tag for `metadata.source`
    #[serde(default)]
    pub source: Option<String>,

    /// Everything else is carried into the record as-is
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// Extract a header block from raw verse text.
///
/// Returns the parsed header and the remaining text after the header block.
/// Text that opens with `---` but never closes it has no header and is
/// returned unchanged.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Ok((None, source));
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    if let Some(key) = frontmatter
        .fields
        .keys()
        .find(|k| RESERVED_KEYS.contains(&k.as_str()))
    {
        return Err(FrontmatterError::ReservedKey(key.clone()));
    }

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing a header.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Invalid YAML in header: {0}")]
    InvalidYaml(String),

    #[error("Header may not set reserved key '{0}'")]
    ReservedKey(String),
}
