//! Raw and generated verse file names.

use std::sync::LazyLock;

use regex::Regex;

static RAW_VERSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)verse[-_]?(\d+)\.(txt|md|json)$").expect("Invalid raw verse regex")
});

// Exactly the names `output_file_name` produces: three padded digits, or an
// unpadded number from 1000 up.
static OUTPUT_VERSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^verse-(\d{3}|[1-9]\d{3,})\.json$").expect("Invalid output verse regex")
});

/// Check whether a raw file name looks like a verse file.
///
/// Matches names such as `verse12.txt`, `Verse_003.md` or `mvr-verse-4.json`.
pub fn is_verse_file(name: &str) -> bool {
    RAW_VERSE_RE.is_match(name)
}

/// Extract the verse number from a raw file name.
///
/// Returns `None` when the name does not match or the number does not fit in `u32`.
pub fn verse_number(name: &str) -> Option<u32> {
    RAW_VERSE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Name of the generated JSON file for a verse.
pub fn output_file_name(verse: u32) -> String {
    format!("verse-{:03}.json", verse)
}

/// Parse a generated file name back to its verse number.
pub fn parse_output_file_name(name: &str) -> Option<u32> {
    OUTPUT_VERSE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_raw_names() {
        assert_eq!(verse_number("verse12.txt"), Some(12));
        assert_eq!(verse_number("Verse_003.MD"), Some(3));
        assert_eq!(verse_number("mvr-verse-4.json"), Some(4));
        assert_eq!(verse_number("verse-5.txt.bak"), None);
        assert_eq!(verse_number("notes.txt"), None);
        assert!(!is_verse_file("verse.txt"));
    }

    #[test]
    fn overflowing_number_is_unnumbered() {
        let name = "verse-99999999999.txt";

        assert!(is_verse_file(name));
        assert_eq!(verse_number(name), None);
    }

    #[test]
    fn output_names_are_zero_padded() {
        assert_eq!(output_file_name(7), "verse-007.json");
        assert_eq!(output_file_name(1000), "verse-1000.json");
        assert_eq!(parse_output_file_name("verse-007.json"), Some(7));
        assert_eq!(parse_output_file_name("verse-1000.json"), Some(1000));
        assert_eq!(parse_output_file_name("verse-7.json"), None);
        assert_eq!(parse_output_file_name("index.json"), None);
    }

    #[test]
    fn over_padded_output_names_are_not_indexed() {
        assert_eq!(parse_output_file_name("verse-0001.json"), None);
        assert_eq!(parse_output_file_name("verse-01000.json"), None);
        assert_eq!(parse_output_file_name("verse-000.json"), Some(0));
    }
}
