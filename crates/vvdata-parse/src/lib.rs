//! Raw verse parsers.
//!
//! Turns raw verse files (line-marked text, optionally with a YAML header,
//! or JSON objects) into normalized [`VerseRecord`]s.

pub mod filename;
pub mod frontmatter;
pub mod json;
pub mod markers;
pub mod record;
pub mod registry;
pub mod traits;

pub use filename::{is_verse_file, output_file_name, parse_output_file_name, verse_number};
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use json::JsonParser;
pub use markers::MarkerParser;
pub use record::{validate_minimal, verse_id, Metadata, VerseRecord, REQUIRED_KEYS};
pub use registry::{ParserRegistry, AUTO};
pub use traits::{ParseError, VerseParser};
