use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::Messages;
use crate::ast::{Message, MessageSequence};
use crate::error::{PseudoError, PseudoResult};

/// Load a compiled message catalog from a JSON string
///
/// The JSON should have the following structure:
/// ```json
/// {
///     "@metadata": { ... },
///     "greeting": "Hello, {name}!",
///     "farewell": [{"type": 0, "value": "Goodbye"}]
/// }
/// ```
///
/// Values are either ICU message strings or pre-parsed element arrays. Keys
/// starting with `@` are skipped, as is any other kind of value.
///
/// # Errors
/// - Invalid JSON
/// - Root is not an object
/// - An element array that does not decode as a message AST
pub fn load_messages_from_str(content: &str) -> PseudoResult<Messages> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| PseudoError::Catalog(format!("Failed to parse JSON: {}", e)))?;
    messages_from_value(json)
}

/// Load a compiled message catalog from a single JSON file
///
/// See [`load_messages_from_str`] for the accepted shape.
///
/// # Errors
/// - File not found or unreadable
/// - Any error from [`load_messages_from_str`]
pub fn load_messages_from_file(path: &Path) -> PseudoResult<Messages> {
    let content = fs::read_to_string(path).map_err(|e| {
        PseudoError::Catalog(format!("Failed to read file '{}': {}", path.display(), e))
    })?;

    load_messages_from_str(&content).map_err(|e| match e {
        PseudoError::Catalog(reason) => {
            PseudoError::Catalog(format!("{} (in '{}')", reason, path.display()))
        }
        other => other,
    })
}

fn messages_from_value(json: Value) -> PseudoResult<Messages> {
    let Value::Object(entries) = json else {
        return Err(PseudoError::Catalog("root must be an object".to_string()));
    };

    let mut messages = Messages::new();
    for (key, value) in entries {
        if key.starts_with('@') {
            continue;
        }

        match value {
            Value::String(text) => {
                messages.with_message(&key, Message::Text(text));
            }
            Value::Array(_) => {
                let elements: MessageSequence = serde_json::from_value(value).map_err(|e| {
                    PseudoError::Catalog(format!("Message '{}' is not a valid AST: {}", key, e))
                })?;
                messages.with_message(&key, Message::Elements(elements));
            }
            other => {
                tracing::warn!(
                    key = %key,
                    kind = json_kind(&other),
                    "skipping catalog entry that is neither a string nor an AST"
                );
            }
        }
    }

    tracing::debug!(count = messages.len(), "loaded message catalog");
    Ok(messages)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
