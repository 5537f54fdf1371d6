//! Decoding of aggregated option values.

use crate::parser::ast::OptionValue;

/// Flatten an option value into `(key, value)` pairs.
///
/// Keys are trimmed. String values arrive from the lexer with their quotes
/// removed. Nested blocks and lists are passed through with an empty value.
/// A scalar option has nothing to decode and yields no pairs.
pub fn decode(value: &OptionValue) -> Vec<(String, String)> {
    match value {
        OptionValue::Scalar(_) => Vec::new(),
        OptionValue::Aggregated(entries) => entries
            .iter()
            .map(|(key, literal)| {
                let text = literal.as_text().unwrap_or_default();
                (key.trim().to_string(), text.to_string())
            })
            .collect(),
    }
}
