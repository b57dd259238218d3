//! Parser for raw verses already authored as JSON objects.

use serde_json::Value;

use crate::record::{validate_minimal, VerseRecord};
use crate::traits::{ParseError, VerseParser};

/// Keys that must hold strings. `id` may also be null.
const TEXT_KEYS: [&str; 4] = ["sa", "te", "en", "id"];

/// Accepts a JSON object with at least `sa`, `te` and `en`; other keys pass through.
#[derive(Debug, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl VerseParser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn parse(&self, source: &str, label: &str) -> Result<VerseRecord, ParseError> {
        let value: Value = serde_json::from_str(source)?;
        let obj = match value {
            Value::Object(obj) => obj,
            other => return Err(ParseError::NotAnObject(kind(&other))),
        };

        validate_minimal(&obj, label)?;

        if let Some((key, value)) = TEXT_KEYS
            .iter()
            .filter_map(|key| obj.get(*key).map(|value| (key, value)))
            .find(|(key, value)| !(value.is_string() || (**key == "id" && value.is_null())))
        {
            return Err(ParseError::NotText {
                verse: label.to_string(),
                key: key.to_string(),
                found: kind(value),
            });
        }

        Ok(serde_json::from_value(Value::Object(obj))?)
    }
}
