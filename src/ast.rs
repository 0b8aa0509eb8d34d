//! Message AST shared with the external ICU parser and formatter.
//!
//! The element set mirrors the formatjs message AST. On the wire every
//! element is a JSON object tagged by a numeric `type`:
//!
//! | kind     | type | payload                                  |
//! |----------|------|------------------------------------------|
//! | literal  | 0    | `value`                                  |
//! | argument | 1    | `value`                                  |
//! | number   | 2    | `value`, `style`                         |
//! | date     | 3    | `value`, `style`                         |
//! | time     | 4    | `value`, `style`                         |
//! | select   | 5    | `value`, `options`                       |
//! | plural   | 6    | `value`, `options`, `offset`, `pluralType` |
//! | pound    | 7    |                                          |
//! | tag      | 8    | `value`, `children`                      |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PseudoError, PseudoResult};
use crate::parser::MessageParser;

/// Numeric kind tag used by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    Literal = 0,
    Argument = 1,
    Number = 2,
    Date = 3,
    Time = 4,
    Select = 5,
    Plural = 6,
    Pound = 7,
    Tag = 8,
}

impl ElementKind {
    pub fn from_code(code: u8) -> Option<Self> {
        let kind = match code {
            0 => ElementKind::Literal,
            1 => ElementKind::Argument,
            2 => ElementKind::Number,
            3 => ElementKind::Date,
            4 => ElementKind::Time,
            5 => ElementKind::Select,
            6 => ElementKind::Plural,
            7 => ElementKind::Pound,
            8 => ElementKind::Tag,
            _ => return None,
        };
        Some(kind)
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralType {
    #[default]
    Cardinal,
    Ordinal,
}

/// One branch of a plural or select element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageOption {
    pub value: MessageSequence,
}

impl MessageOption {
    pub fn new(value: impl Into<MessageSequence>) -> Self {
        MessageOption {
            value: value.into(),
        }
    }
}

/// Branch key (`one`, `other`, `=0`, `male`, ...) to branch body.
pub type Options = BTreeMap<String, MessageOption>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub enum MessageElement {
    Literal {
        value: String,
    },
    Argument {
        value: String,
    },
    Number {
        value: String,
        style: Option<Value>,
    },
    Date {
        value: String,
        style: Option<Value>,
    },
    Time {
        value: String,
        style: Option<Value>,
    },
    Select {
        value: String,
        options: Options,
    },
    Plural {
        value: String,
        options: Options,
        offset: i64,
        plural_type: PluralType,
    },
    Pound,
    Tag {
        value: String,
        children: MessageSequence,
    },
}

impl MessageElement {
    pub fn literal(value: impl Into<String>) -> Self {
        MessageElement::Literal {
            value: value.into(),
        }
    }

    pub fn argument(name: impl Into<String>) -> Self {
        MessageElement::Argument { value: name.into() }
    }

    pub fn tag(name: impl Into<String>, children: impl Into<MessageSequence>) -> Self {
        MessageElement::Tag {
            value: name.into(),
            children: children.into(),
        }
    }

    pub fn select<K, I>(name: impl Into<String>, options: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MessageSequence)>,
    {
        MessageElement::Select {
            value: name.into(),
            options: collect_options(options),
        }
    }

    /// Cardinal plural without offset.
    pub fn plural<K, I>(name: impl Into<String>, options: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MessageSequence)>,
    {
        MessageElement::Plural {
            value: name.into(),
            options: collect_options(options),
            offset: 0,
            plural_type: PluralType::Cardinal,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            MessageElement::Literal { .. } => ElementKind::Literal,
            MessageElement::Argument { .. } => ElementKind::Argument,
            MessageElement::Number { .. } => ElementKind::Number,
            MessageElement::Date { .. } => ElementKind::Date,
            MessageElement::Time { .. } => ElementKind::Time,
            MessageElement::Select { .. } => ElementKind::Select,
            MessageElement::Plural { .. } => ElementKind::Plural,
            MessageElement::Pound => ElementKind::Pound,
            MessageElement::Tag { .. } => ElementKind::Tag,
        }
    }

    pub fn literal_value(&self) -> Option<&str> {
        match self {
            MessageElement::Literal { value } => Some(value),
            _ => None,
        }
    }
}

fn collect_options<K, I>(options: I) -> Options
where
    K: Into<String>,
    I: IntoIterator<Item = (K, MessageSequence)>,
{
    options
        .into_iter()
        .map(|(key, value)| (key.into(), MessageOption::new(value)))
        .collect()
}

/// Ordered list of elements; concatenated left to right it forms the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageSequence(pub Vec<MessageElement>);

impl MessageSequence {
    pub fn new() -> Self {
        MessageSequence(Vec::new())
    }

    pub fn push(&mut self, element: MessageElement) {
        self.0.push(element);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MessageElement> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&MessageElement> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&MessageElement> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageElement> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[MessageElement] {
        &self.0
    }
}

impl From<Vec<MessageElement>> for MessageSequence {
    fn from(elements: Vec<MessageElement>) -> Self {
        MessageSequence(elements)
    }
}

impl FromIterator<MessageElement> for MessageSequence {
    fn from_iter<I: IntoIterator<Item = MessageElement>>(iter: I) -> Self {
        MessageSequence(iter.into_iter().collect())
    }
}

impl IntoIterator for MessageSequence {
    type Item = MessageElement;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageSequence {
    type Item = &'a MessageElement;
    type IntoIter = std::slice::Iter<'a, MessageElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A message as handed to the pseudolocalizer: raw ICU text or a parsed AST.
///
/// Deserializes from either a JSON string or an AST array, which is how
/// compiled catalogs store their entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Elements(MessageSequence),
}

impl Message {
    /// Resolve to an element sequence, running `parser` for raw text.
    /// Parser failures propagate unchanged.
    pub fn into_elements<P>(self, parser: &P) -> PseudoResult<MessageSequence>
    where
        P: MessageParser + ?Sized,
    {
        match self {
            Message::Text(source) => parser.parse(&source),
            Message::Elements(elements) => Ok(elements),
        }
    }
}

impl From<&str> for Message {
    fn from(source: &str) -> Self {
        Message::Text(source.to_string())
    }
}

impl From<String> for Message {
    fn from(source: String) -> Self {
        Message::Text(source)
    }
}

impl From<MessageSequence> for Message {
    fn from(elements: MessageSequence) -> Self {
        Message::Elements(elements)
    }
}

impl From<Vec<MessageElement>> for Message {
    fn from(elements: Vec<MessageElement>) -> Self {
        Message::Elements(elements.into())
    }
}

/// Flat wire representation; every payload field is optional here and
/// checked per kind when converting into [`MessageElement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Options>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    #[serde(
        default,
        rename = "pluralType",
        skip_serializing_if = "Option::is_none"
    )]
    plural_type: Option<PluralType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<MessageSequence>,
}

impl RawElement {
    fn bare(kind: ElementKind) -> Self {
        RawElement {
            kind: kind.code(),
            value: None,
            style: None,
            options: None,
            offset: None,
            plural_type: None,
            children: None,
        }
    }

    fn named(kind: ElementKind, value: String) -> Self {
        RawElement {
            value: Some(value),
            ..RawElement::bare(kind)
        }
    }

    fn take_value(&mut self, kind: ElementKind) -> PseudoResult<String> {
        self.value.take().ok_or_else(|| {
            PseudoError::InvalidElement(format!("{:?} element is missing 'value'", kind))
        })
    }

    fn take_options(&mut self, kind: ElementKind) -> PseudoResult<Options> {
        self.options.take().ok_or_else(|| {
            PseudoError::InvalidElement(format!("{:?} element is missing 'options'", kind))
        })
    }
}

impl TryFrom<RawElement> for MessageElement {
    type Error = PseudoError;

    fn try_from(mut raw: RawElement) -> Result<Self, Self::Error> {
        let kind = ElementKind::from_code(raw.kind).ok_or_else(|| {
            PseudoError::InvalidElement(format!("unknown element type {}", raw.kind))
        })?;

        let element = match kind {
            ElementKind::Literal => MessageElement::Literal {
                value: raw.take_value(kind)?,
            },
            ElementKind::Argument => MessageElement::Argument {
                value: raw.take_value(kind)?,
            },
            ElementKind::Number => MessageElement::Number {
                value: raw.take_value(kind)?,
                style: raw.style,
            },
            ElementKind::Date => MessageElement::Date {
                value: raw.take_value(kind)?,
                style: raw.style,
            },
            ElementKind::Time => MessageElement::Time {
                value: raw.take_value(kind)?,
                style: raw.style,
            },
            ElementKind::Select => MessageElement::Select {
                value: raw.take_value(kind)?,
                options: raw.take_options(kind)?,
            },
            ElementKind::Plural => MessageElement::Plural {
                value: raw.take_value(kind)?,
                options: raw.take_options(kind)?,
                offset: raw.offset.unwrap_or(0),
                plural_type: raw.plural_type.unwrap_or_default(),
            },
            ElementKind::Pound => MessageElement::Pound,
            ElementKind::Tag => MessageElement::Tag {
                value: raw.take_value(kind)?,
                children: raw.children.unwrap_or_default(),
            },
        };
        Ok(element)
    }
}

impl From<MessageElement> for RawElement {
    fn from(element: MessageElement) -> Self {
        let kind = element.kind();
        match element {
            MessageElement::Literal { value } | MessageElement::Argument { value } => {
                RawElement::named(kind, value)
            }
            MessageElement::Number { value, style }
            | MessageElement::Date { value, style }
            | MessageElement::Time { value, style } => RawElement {
                style,
                ..RawElement::named(kind, value)
            },
            MessageElement::Select { value, options } => RawElement {
                options: Some(options),
                ..RawElement::named(kind, value)
            },
            MessageElement::Plural {
                value,
                options,
                offset,
                plural_type,
            } => RawElement {
                options: Some(options),
                offset: Some(offset),
                plural_type: Some(plural_type),
                ..RawElement::named(kind, value)
            },
            MessageElement::Pound => RawElement::bare(kind),
            MessageElement::Tag { value, children } => RawElement {
                children: Some(children),
                ..RawElement::named(kind, value)
            },
        }
    }
}
