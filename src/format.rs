//! Seam for the external ICU message formatter.
//!
//! A formatter renders an element sequence plus substitution values for a
//! locale. The result is plain text unless some substituted value is a
//! rich object, in which case it is a list of parts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use icu_locale::Locale;

use crate::ast::MessageSequence;
use crate::error::PseudoResult;

/// Renders the already-formatted children of a tag element.
pub type TagFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A value substituted into a message.
#[derive(Clone)]
pub enum FormatValue {
    Text(String),
    Number(f64),
    /// Handler for a tag element such as `<b>...</b>`
    Tag(TagFn),
    /// A structured value the formatter cannot flatten into text
    Object(serde_json::Value),
}

impl FormatValue {
    pub fn tag<F>(render: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        FormatValue::Tag(Arc::new(render))
    }
}

impl fmt::Debug for FormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            FormatValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            FormatValue::Tag(_) => f.write_str("Tag(<fn>)"),
            FormatValue::Object(value) => f.debug_tuple("Object").field(value).finish(),
        }
    }
}

impl From<&str> for FormatValue {
    fn from(text: &str) -> Self {
        FormatValue::Text(text.to_string())
    }
}

impl From<String> for FormatValue {
    fn from(text: String) -> Self {
        FormatValue::Text(text)
    }
}

impl From<f64> for FormatValue {
    fn from(n: f64) -> Self {
        FormatValue::Number(n)
    }
}

impl From<i32> for FormatValue {
    fn from(n: i32) -> Self {
        FormatValue::Number(f64::from(n))
    }
}

impl From<u32> for FormatValue {
    fn from(n: u32) -> Self {
        FormatValue::Number(f64::from(n))
    }
}

impl From<serde_json::Value> for FormatValue {
    fn from(value: serde_json::Value) -> Self {
        FormatValue::Object(value)
    }
}

/// Substitution values keyed by argument or tag name.
#[derive(Debug, Clone, Default)]
pub struct FormatValues(pub HashMap<String, FormatValue>);

impl FormatValues {
    pub fn new() -> Self {
        FormatValues(HashMap::new())
    }

    pub fn with(mut self, name: &str, value: impl Into<FormatValue>) -> Self {
        self.0.insert(name.to_owned(), value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FormatValue>) -> &mut Self {
        self.0.insert(name.to_owned(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormatValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormattedPart {
    Text(String),
    Object(serde_json::Value),
}

/// Output of a formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedMessage {
    Text(String),
    Rich(Vec<FormattedPart>),
}

impl FormattedMessage {
    /// Collapse adjacent text parts; stays `Text` unless an object is present.
    pub fn from_parts(parts: Vec<FormattedPart>) -> Self {
        if parts.iter().all(|part| matches!(part, FormattedPart::Text(_))) {
            let text = parts
                .into_iter()
                .filter_map(|part| match part {
                    FormattedPart::Text(text) => Some(text),
                    FormattedPart::Object(_) => None,
                })
                .collect();
            return FormattedMessage::Text(text);
        }

        let mut merged: Vec<FormattedPart> = Vec::with_capacity(parts.len());
        for part in parts {
            if let (Some(FormattedPart::Text(prev)), FormattedPart::Text(text)) =
                (merged.last_mut(), &part)
            {
                prev.push_str(text);
                continue;
            }
            merged.push(part);
        }
        FormattedMessage::Rich(merged)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormattedMessage::Text(text) => Some(text),
            FormattedMessage::Rich(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            FormattedMessage::Text(text) => Some(text),
            FormattedMessage::Rich(_) => None,
        }
    }
}

/// Renders element sequences for a locale.
pub trait MessageFormatter {
    fn format(
        &self,
        locale: &Locale,
        elements: &MessageSequence,
        values: &FormatValues,
    ) -> PseudoResult<FormattedMessage>;
}
