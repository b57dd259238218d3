//! Parser registry for choosing a parser per raw file.
//!
//! A registry is either pinned to one named parser, used for every file,
//! or in `auto` mode, where the parser is picked by file extension.

use std::path::Path;
use std::sync::Arc;

use crate::json::JsonParser;
use crate::markers::MarkerParser;
use crate::traits::{ParseError, VerseParser};

/// Name that selects parsers by extension.
pub const AUTO: &str = "auto";

/// The set of available parsers and the selection policy.
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn VerseParser>>,
    pinned: Option<Arc<dyn VerseParser>>,
}

impl ParserRegistry {
    /// Create a registry with the built-in parsers, selected by `name`.
    ///
    /// `name` is either a parser name or [`AUTO`].
    pub fn new(name: &str) -> Result<Self, ParseError> {
        let parsers: Vec<Arc<dyn VerseParser>> =
            vec![Arc::new(MarkerParser::new()), Arc::new(JsonParser::new())];

        let pinned = if name.eq_ignore_ascii_case(AUTO) {
            None
        } else {
            let parser = parsers
                .iter()
                .find(|p| p.name().eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| ParseError::UnknownParser(name.to_string()))?;
            Some(parser)
        };

        Ok(Self { parsers, pinned })
    }

    /// Look up a parser by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&dyn VerseParser> {
        self.parsers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.as_ref())
    }

    /// Get all registered parser names.
    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Pick the parser for a raw file.
    pub fn for_path(&self, path: &Path) -> Result<&dyn VerseParser, ParseError> {
        if let Some(ref parser) = self.pinned {
            return Ok(parser.as_ref());
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.parsers
            .iter()
            .find(|p| p.extensions().contains(&ext.as_str()))
            .map(|p| p.as_ref())
            .ok_or(ParseError::UnsupportedExtension(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_parser_handles_every_extension() {
        let registry = ParserRegistry::new("markers").unwrap();

        let parser = registry.for_path(Path::new("verse-1.json")).unwrap();

        assert_eq!(parser.name(), "markers");
    }

    #[test]
    fn auto_selects_by_extension() {
        let registry = ParserRegistry::new("auto").unwrap();

        assert_eq!(
            registry.for_path(Path::new("verse-1.JSON")).unwrap().name(),
            "json"
        );
        assert_eq!(
            registry.for_path(Path::new("verse-1.md")).unwrap().name(),
            "markers"
        );
        assert!(matches!(
            registry.for_path(Path::new("verse-1.csv")),
            Err(ParseError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            ParserRegistry::new("yaml"),
            Err(ParseError::UnknownParser(_))
        ));
    }

    #[test]
    fn lists_builtin_parsers() {
        let registry = ParserRegistry::new(AUTO).unwrap();

        assert_eq!(registry.names(), vec!["markers", "json"]);
        assert!(registry.get("JSON").is_some());
    }
}
