//! Parser for plain-text verses with `sa:` / `te:` / `en:` line markers.
//!
//! A marker switches the current language bucket; unmarked lines go to the
//! current bucket, or to Sanskrit before any marker has been seen.

use crate::frontmatter::extract_frontmatter;
use crate::record::VerseRecord;
use crate::traits::{ParseError, VerseParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Sa,
    Te,
    En,
}

impl Bucket {
    fn index(self) -> usize {
        match self {
            Self::Sa => 0,
            Self::Te => 1,
            Self::En => 2,
        }
    }
}

/// Split a trimmed line into its marker and the remaining text.
fn split_marker(line: &str) -> Option<(Bucket, &str)> {
    let (head, rest) = (line.get(..3)?, &line[3..]);
    let bucket = if head.eq_ignore_ascii_case("sa:") {
        Bucket::Sa
    } else if head.eq_ignore_ascii_case("te:") {
        Bucket::Te
    } else if head.eq_ignore_ascii_case("en:") {
        Bucket::En
    } else {
        return None;
    };
    Some((bucket, rest.trim()))
}

/// Distribute marked text into (sa, te, en).
pub fn split_languages(text: &str) -> (String, String, String) {
    let mut buckets = [String::new(), String::new(), String::new()];
    let mut current = Bucket::Sa;

    for line in text.trim().lines() {
        let line = line.trim();
        let content = match split_marker(line) {
            Some((bucket, rest)) => {
                current = bucket;
                rest
            }
            None => line,
        };
        let buf = &mut buckets[current.index()];
        buf.push_str(content);
        buf.push('\n');
    }

    let [sa, te, en] = buckets.map(|b| b.trim().to_string());
    (sa, te, en)
}

/// Line-marker parser, the default for `.txt` and `.md` raw files.
#[derive(Debug, Default)]
pub struct MarkerParser;

impl MarkerParser {
    pub fn new() -> Self {
        Self
    }
}

impl VerseParser for MarkerParser {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt", "md"]
    }

    fn parse(&self, source: &str, _label: &str) -> Result<VerseRecord, ParseError> {
        let (frontmatter, body) = extract_frontmatter(source)?;
        let (sa, te, en) = split_languages(body);

        let mut record = VerseRecord::new(sa, te, en);
        if let Some(fm) = frontmatter {
            record.id = fm.id;
            record.metadata.source = fm.source;
            record.extra = fm.fields;
        }

        Ok(record)
    }
}
