//! Mock parser and formatter for testing
//!
//! Deterministic stand-ins for the external ICU collaborators so the
//! strategies and the adapter can be exercised end to end without binding a
//! real ICU implementation. They understand just enough message syntax for
//! that purpose:
//!
//! - literal text with apostrophe quoting (`''`, `'{'`, `'}'`, `'<'`, `'#'`)
//! - simple arguments `{name}`
//! - `{n, number}`, `{d, date, short}`, `{t, time}` with an optional style
//! - `{n, plural, offset:1 =0 {...} one {...} other {...}}` and
//!   `selectordinal`, with `#` inside plural branches
//! - `{g, select, male {...} other {...}}`
//! - paired tags `<b>...</b>`
//!
//! # Example
//!
//! ```no_run
//! use pseudolocalize::mock::{MockFormatter, MockParser};
//! use pseudolocalize::{FormatValues, MessageFormatter, MessageParser, PseudoError, PseudoLocale};
//!
//! fn main() -> Result<(), PseudoError> {
//!     let ast = MockParser.parse("my name is {name}")?;
//!     let pseudo = PseudoLocale::EnXA.apply(ast);
//!     let text = MockFormatter.format(
//!         &PseudoLocale::EnXA.locale(),
//!         &pseudo,
//!         &FormatValues::new().with("name", "Minh"),
//!     )?;
//!     assert_eq!(text.as_text(), Some("ṁẏ ńâṁè íś Minh"));
//!     Ok(())
//! }
//! ```

use fixed_decimal::Decimal;
use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};
use serde_json::Value;

use crate::ast::{MessageElement, MessageOption, MessageSequence, Options, PluralType};
use crate::error::{PseudoError, PseudoResult};
use crate::format::{FormatValue, FormatValues, FormattedMessage, FormattedPart, MessageFormatter};
use crate::parser::MessageParser;

/// Parser for the subset of ICU message syntax listed in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockParser;

impl MessageParser for MockParser {
    fn parse(&self, source: &str) -> PseudoResult<MessageSequence> {
        let mut cursor = Cursor::new(source);
        let elements = cursor.parse_message(false, None)?;
        match cursor.peek() {
            None => Ok(elements),
            Some(c) => Err(PseudoError::parse(
                cursor.position,
                format!("unexpected '{}'", c),
            )),
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    /// Consumes the current character and advances the position.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: char) -> PseudoResult<()> {
        match self.consume() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(PseudoError::parse(
                self.position - 1,
                format!("expected '{}', found '{}'", expected, c),
            )),
            None => Err(PseudoError::parse(
                self.position,
                format!("expected '{}', found end of message", expected),
            )),
        }
    }

    fn take_while<P>(&mut self, predicate: P) -> String
    where
        P: Fn(char) -> bool,
    {
        let mut taken = String::new();
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            taken.push(c);
            self.position += 1;
        }
        taken
    }

    /// Parse elements until end of input, a closing `}`, or a closing tag.
    fn parse_message(
        &mut self,
        in_plural: bool,
        parent_tag: Option<&str>,
    ) -> PseudoResult<MessageSequence> {
        let mut elements = MessageSequence::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '}' => break,
                '{' => {
                    flush_literal(&mut elements, &mut text);
                    elements.push(self.parse_argument(in_plural)?);
                }
                '#' if in_plural => {
                    flush_literal(&mut elements, &mut text);
                    self.consume();
                    elements.push(MessageElement::Pound);
                }
                '<' if self.peek_at(1) == Some('/') => {
                    if parent_tag.is_none() {
                        return Err(PseudoError::parse(
                            self.position,
                            "closing tag without opening tag",
                        ));
                    }
                    break;
                }
                '<' if self.peek_at(1).is_some_and(|n| n.is_ascii_alphabetic()) => {
                    flush_literal(&mut elements, &mut text);
                    elements.push(self.parse_tag(in_plural)?);
                }
                '\'' => self.parse_quoted(&mut text, in_plural),
                _ => {
                    text.push(c);
                    self.consume();
                }
            }
        }

        flush_literal(&mut elements, &mut text);
        Ok(elements)
    }

    fn parse_quoted(&mut self, text: &mut String, in_plural: bool) {
        self.consume(); // opening apostrophe
        match self.peek() {
            Some('\'') => {
                self.consume();
                text.push('\'');
            }
            Some(c) if matches!(c, '{' | '}' | '<') || (c == '#' && in_plural) => {
                while let Some(c) = self.consume() {
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            self.consume();
                            text.push('\'');
                        } else {
                            break;
                        }
                    } else {
                        text.push(c);
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn parse_argument(&mut self, in_plural: bool) -> PseudoResult<MessageElement> {
        let start = self.position;
        self.expect('{')?;
        self.skip_whitespace();
        let name = self.take_while(|c| !c.is_whitespace() && c != ',' && c != '}');
        if name.is_empty() {
            return Err(PseudoError::parse(start, "empty argument name"));
        }
        self.skip_whitespace();

        if self.peek() == Some('}') {
            self.consume();
            return Ok(MessageElement::Argument { value: name });
        }

        self.expect(',')?;
        self.skip_whitespace();
        let kind = self.take_while(|c| c.is_ascii_alphabetic());
        self.skip_whitespace();

        match kind.as_str() {
            "number" | "date" | "time" => {
                let style = self.parse_style()?;
                let value = name;
                Ok(match kind.as_str() {
                    "number" => MessageElement::Number { value, style },
                    "date" => MessageElement::Date { value, style },
                    _ => MessageElement::Time { value, style },
                })
            }
            "plural" | "selectordinal" => {
                self.expect(',')?;
                let (offset, options) = self.parse_options(true)?;
                let plural_type = if kind == "plural" {
                    PluralType::Cardinal
                } else {
                    PluralType::Ordinal
                };
                Ok(MessageElement::Plural {
                    value: name,
                    options,
                    offset,
                    plural_type,
                })
            }
            "select" => {
                self.expect(',')?;
                let (_, options) = self.parse_options(in_plural)?;
                Ok(MessageElement::Select {
                    value: name,
                    options,
                })
            }
            other => Err(PseudoError::parse(
                start,
                format!("unsupported argument type '{}'", other),
            )),
        }
    }

    fn parse_style(&mut self) -> PseudoResult<Option<Value>> {
        if self.peek() == Some('}') {
            self.consume();
            return Ok(None);
        }
        self.expect(',')?;
        let style = self.take_while(|c| c != '}');
        self.expect('}')?;
        let style = style.trim();
        if style.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Value::String(style.to_string())))
        }
    }

    /// Branches up to and including the closing `}` of the argument.
    fn parse_options(&mut self, plural: bool) -> PseudoResult<(i64, Options)> {
        let start = self.position;
        let mut offset = 0;
        let mut options = Options::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.consume();
                    break;
                }
                None => {
                    return Err(PseudoError::parse(self.position, "unterminated options"));
                }
                _ => {}
            }

            let key = self.take_while(|c| !c.is_whitespace() && c != '{' && c != '}');
            if plural && key.starts_with("offset:") {
                let digits = key["offset:".len()..].to_string();
                offset = digits.parse().map_err(|_| {
                    PseudoError::parse(self.position, format!("invalid offset '{}'", digits))
                })?;
                continue;
            }
            if key.is_empty() {
                return Err(PseudoError::parse(self.position, "empty option key"));
            }

            self.skip_whitespace();
            self.expect('{')?;
            let body = self.parse_message(plural, None)?;
            self.expect('}')?;
            options.insert(key, MessageOption::new(body));
        }

        if !options.contains_key("other") {
            return Err(PseudoError::parse(start, "missing 'other' option"));
        }
        Ok((offset, options))
    }

    fn parse_tag(&mut self, in_plural: bool) -> PseudoResult<MessageElement> {
        let start = self.position;
        self.expect('<')?;
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if self.peek() == Some('/') {
            return Err(PseudoError::parse(start, "self-closing tags are not supported"));
        }
        self.expect('>')?;

        let children = self.parse_message(in_plural, Some(&name))?;

        let close = self.position;
        self.expect('<')?;
        self.expect('/')?;
        let closing = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if closing != name {
            return Err(PseudoError::parse(
                close,
                format!("mismatched closing tag '{}' for '{}'", closing, name),
            ));
        }
        self.expect('>')?;

        Ok(MessageElement::Tag {
            value: name,
            children,
        })
    }
}

fn flush_literal(elements: &mut MessageSequence, text: &mut String) {
    if !text.is_empty() {
        elements.push(MessageElement::Literal {
            value: std::mem::take(text),
        });
    }
}

/// Formatter that renders numbers plainly and picks plural branches with
/// CLDR rules from `icu_plurals`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFormatter;

impl MessageFormatter for MockFormatter {
    fn format(
        &self,
        locale: &Locale,
        elements: &MessageSequence,
        values: &FormatValues,
    ) -> PseudoResult<FormattedMessage> {
        let mut parts = Vec::new();
        render(locale, elements, values, None, &mut parts)?;
        Ok(FormattedMessage::from_parts(parts))
    }
}

fn render(
    locale: &Locale,
    elements: &MessageSequence,
    values: &FormatValues,
    pound: Option<f64>,
    parts: &mut Vec<FormattedPart>,
) -> PseudoResult<()> {
    for element in elements {
        match element {
            MessageElement::Literal { value } => parts.push(FormattedPart::Text(value.clone())),
            MessageElement::Argument { value }
            | MessageElement::Number { value, .. }
            | MessageElement::Date { value, .. }
            | MessageElement::Time { value, .. } => parts.push(argument_part(value, values)?),
            MessageElement::Select { value, options } => {
                let key = match lookup(value, values)? {
                    FormatValue::Text(text) => text.clone(),
                    FormatValue::Number(n) => format_number(*n),
                    other => {
                        return Err(PseudoError::Format(format!(
                            "select argument '{}' must be text, got {:?}",
                            value, other
                        )));
                    }
                };
                let option = pick_option(options, &key, value)?;
                render(locale, option, values, pound, parts)?;
            }
            MessageElement::Plural {
                value,
                options,
                offset,
                plural_type,
            } => {
                let n = match lookup(value, values)? {
                    FormatValue::Number(n) => *n,
                    other => {
                        return Err(PseudoError::Format(format!(
                            "plural argument '{}' must be a number, got {:?}",
                            value, other
                        )));
                    }
                };
                let exact = format!("={}", format_number(n));
                let adjusted = n - *offset as f64;
                let option = match options.get(&exact) {
                    Some(option) => &option.value,
                    None => {
                        let category = plural_category(locale, adjusted, *plural_type)?;
                        pick_option(options, category_key(category), value)?
                    }
                };
                render(locale, option, values, Some(adjusted), parts)?;
            }
            MessageElement::Pound => {
                let text = pound.map(format_number).unwrap_or_else(|| "#".to_string());
                parts.push(FormattedPart::Text(text));
            }
            MessageElement::Tag { value, children } => {
                let mut inner = Vec::new();
                render(locale, children, values, pound, &mut inner)?;
                match lookup(value, values)? {
                    FormatValue::Tag(handler) => match FormattedMessage::from_parts(inner) {
                        FormattedMessage::Text(text) => parts.push(FormattedPart::Text(handler(&text))),
                        FormattedMessage::Rich(_) => {
                            return Err(PseudoError::Format(format!(
                                "tag '{}' has rich children",
                                value
                            )));
                        }
                    },
                    FormatValue::Object(object) => parts.push(FormattedPart::Object(object.clone())),
                    other => {
                        return Err(PseudoError::Format(format!(
                            "tag '{}' needs a handler, got {:?}",
                            value, other
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

fn lookup<'a>(name: &str, values: &'a FormatValues) -> PseudoResult<&'a FormatValue> {
    values
        .get(name)
        .ok_or_else(|| PseudoError::MissingValue(name.to_string()))
}

fn argument_part(name: &str, values: &FormatValues) -> PseudoResult<FormattedPart> {
    match lookup(name, values)? {
        FormatValue::Text(text) => Ok(FormattedPart::Text(text.clone())),
        FormatValue::Number(n) => Ok(FormattedPart::Text(format_number(*n))),
        FormatValue::Object(object) => Ok(FormattedPart::Object(object.clone())),
        FormatValue::Tag(_) => Err(PseudoError::Format(format!(
            "argument '{}' is bound to a tag handler",
            name
        ))),
    }
}

fn pick_option<'a>(
    options: &'a Options,
    key: &str,
    argument: &str,
) -> PseudoResult<&'a MessageSequence> {
    options
        .get(key)
        .or_else(|| options.get("other"))
        .map(|option| &option.value)
        .ok_or_else(|| {
            PseudoError::Format(format!(
                "no option '{}' or 'other' for argument '{}'",
                key, argument
            ))
        })
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn plural_category(locale: &Locale, n: f64, plural_type: PluralType) -> PseudoResult<PluralCategory> {
    let rule_type = match plural_type {
        PluralType::Cardinal => PluralRuleType::Cardinal,
        PluralType::Ordinal => PluralRuleType::Ordinal,
    };
    let rules = PluralRules::try_new(locale.clone().into(), rule_type.into()).map_err(|e| {
        PseudoError::Format(format!(
            "Failed to create PluralRules for locale '{}': {}",
            locale, e
        ))
    })?;

    let n = n.abs();
    if n.fract() == 0.0 && n < 1e15 {
        return Ok(rules.category_for(n as u64));
    }
    let decimal: Decimal = format_number(n).parse().map_err(|e| {
        PseudoError::Format(format!("cannot derive plural operands from {}: {:?}", n, e))
    })?;
    Ok(rules.category_for(PluralOperands::from(&decimal)))
}

fn category_key(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}
