//! Trait definitions for raw verse parsers.

use crate::frontmatter::FrontmatterError;
use crate::record::VerseRecord;

/// Errors that can occur while turning a raw file into a record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Header error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("{verse}: missing keys {keys:?}")]
    MissingKeys { verse: String, keys: Vec<String> },

    #[error("{verse}: key '{key}' must be a string, found {found}")]
    NotText {
        verse: String,
        key: String,
        found: &'static str,
    },

    #[error("Unknown parser: {0}")]
    UnknownParser(String),

    #[error("No parser handles extension '{0}'")]
    UnsupportedExtension(String),
}

/// A format-specific raw verse parser.
pub trait VerseParser: Send + Sync {
    /// Parser identifier (e.g., "markers", "json")
    fn name(&self) -> &'static str;

    /// File extensions this parser handles
    fn extensions(&self) -> &[&'static str];

    /// Parse raw file contents into a record.
    ///
    /// # Arguments
    /// * `source` - Contents of the raw file
    /// * `label` - Name used in error messages (usually the output file name)
    fn parse(&self, source: &str, label: &str) -> Result<VerseRecord, ParseError>;
}
