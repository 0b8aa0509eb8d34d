//! Pseudolocalization strategies.
//!
//! Each strategy consumes a [`MessageSequence`] and returns the transformed
//! sequence. Only literal text changes; arguments, number/date/time
//! formats and pound signs pass through, and plural/select branches and tag
//! children are walked recursively with their keys and names untouched.
//!
//! | locale  | literals                                  | outer sequence |
//! |---------|-------------------------------------------|----------------|
//! | `en-XA` | accented                                  | unchanged      |
//! | `en-XB` | accented, every 3rd letter tripled, `[!! … !!]` | unchanged |
//! | `en-XC` | accented                                  | padded         |
//! | `en-XD` | lowercase vowels accented                 | padded         |
//!
//! The input is moved in, so a caller who wants to run two strategies over
//! the same AST has to clone it first.

use std::fmt;
use std::str::FromStr;

use icu_locale::{Locale, locale};

use crate::alphabet::{accent, accented, is_vowel};
use crate::ast::{Message, MessageElement, MessageSequence, Options};
use crate::error::{PseudoError, PseudoResult};
use crate::expansion::pad_sequence;
use crate::parser::MessageParser;

/// Signature shared by all four strategies.
pub type Strategy = fn(MessageSequence) -> MessageSequence;

/// Apply `f` to every literal reachable from `elements`.
fn map_literals<F>(elements: MessageSequence, f: &mut F) -> MessageSequence
where
    F: FnMut(&str) -> String,
{
    elements
        .into_iter()
        .map(|element| map_element(element, f))
        .collect()
}

fn map_options<F>(options: Options, f: &mut F) -> Options
where
    F: FnMut(&str) -> String,
{
    options
        .into_iter()
        .map(|(key, mut option)| {
            option.value = map_literals(option.value, f);
            (key, option)
        })
        .collect()
}

// No wildcard arm: a new element kind must be classified here.
fn map_element<F>(element: MessageElement, f: &mut F) -> MessageElement
where
    F: FnMut(&str) -> String,
{
    match element {
        MessageElement::Literal { value } => MessageElement::Literal { value: f(&value) },
        MessageElement::Select { value, options } => MessageElement::Select {
            value,
            options: map_options(options, f),
        },
        MessageElement::Plural {
            value,
            options,
            offset,
            plural_type,
        } => MessageElement::Plural {
            value,
            options: map_options(options, f),
            offset,
            plural_type,
        },
        MessageElement::Tag { value, children } => MessageElement::Tag {
            value,
            children: map_literals(children, f),
        },
        opaque @ (MessageElement::Argument { .. }
        | MessageElement::Number { .. }
        | MessageElement::Date { .. }
        | MessageElement::Time { .. }
        | MessageElement::Pound) => opaque,
    }
}

fn accent_text(text: &str) -> String {
    text.chars().map(accent).collect()
}

fn accent_vowels(text: &str) -> String {
    text.chars()
        .map(|c| if is_vowel(c) { accent(c) } else { c })
        .collect()
}

/// Accent, then triple letters at 1-indexed positions 3, 6, 9, ...
fn accent_and_triple(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (index, c) in text.chars().enumerate() {
        match accented(c) {
            Some(a) if (index + 1) % 3 == 0 => {
                out.push(a);
                out.push(a);
                out.push(a);
            }
            Some(a) => out.push(a),
            None => out.push(c),
        }
    }
    format!("[!! {} !!]", out)
}

/// Run `transform` over every literal, counting the characters it emits,
/// then pad the outer sequence once for that total.
fn accent_and_pad(elements: MessageSequence, transform: fn(&str) -> String) -> MessageSequence {
    let mut length = 0usize;
    let transformed = map_literals(elements, &mut |text: &str| {
        let pseudo = transform(text);
        length += pseudo.chars().count();
        pseudo
    });
    pad_sequence(transformed, length)
}

/// `en-XA`: accent every ASCII letter.
pub fn generate_en_xa(elements: MessageSequence) -> MessageSequence {
    map_literals(elements, &mut accent_text)
}

/// `en-XB`: accent, triple every third letter and bracket each literal.
pub fn generate_en_xb(elements: MessageSequence) -> MessageSequence {
    map_literals(elements, &mut accent_and_triple)
}

/// `en-XC`: accent and pad the whole message proportionally to its length.
pub fn generate_en_xc(elements: MessageSequence) -> MessageSequence {
    accent_and_pad(elements, accent_text)
}

/// `en-XD`: like `en-XC` but only lowercase vowels are accented.
pub fn generate_en_xd(elements: MessageSequence) -> MessageSequence {
    accent_and_pad(elements, accent_vowels)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoLocale {
    EnXA,
    EnXB,
    EnXC,
    EnXD,
}

impl PseudoLocale {
    pub const ALL: [PseudoLocale; 4] = [
        PseudoLocale::EnXA,
        PseudoLocale::EnXB,
        PseudoLocale::EnXC,
        PseudoLocale::EnXD,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            PseudoLocale::EnXA => "en-XA",
            PseudoLocale::EnXB => "en-XB",
            PseudoLocale::EnXC => "en-XC",
            PseudoLocale::EnXD => "en-XD",
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            PseudoLocale::EnXA => generate_en_xa,
            PseudoLocale::EnXB => generate_en_xb,
            PseudoLocale::EnXC => generate_en_xc,
            PseudoLocale::EnXD => generate_en_xd,
        }
    }

    pub fn apply(self, elements: MessageSequence) -> MessageSequence {
        (self.strategy())(elements)
    }

    /// Resolve `message` (parsing raw text with `parser`) and transform it.
    pub fn pseudolocalize<P>(
        self,
        message: impl Into<Message>,
        parser: &P,
    ) -> PseudoResult<MessageSequence>
    where
        P: MessageParser + ?Sized,
    {
        let elements = message.into().into_elements(parser)?;
        Ok(self.apply(elements))
    }

    /// Pick the pseudo-locale named by the region subtag of `locale`.
    pub fn from_locale(locale: &Locale) -> Option<Self> {
        let region = locale.id.region?;
        match region.as_str() {
            "XA" => Some(PseudoLocale::EnXA),
            "XB" => Some(PseudoLocale::EnXB),
            "XC" => Some(PseudoLocale::EnXC),
            "XD" => Some(PseudoLocale::EnXD),
            _ => None,
        }
    }

    pub fn locale(self) -> Locale {
        match self {
            PseudoLocale::EnXA => locale!("en-XA"),
            PseudoLocale::EnXB => locale!("en-XB"),
            PseudoLocale::EnXC => locale!("en-XC"),
            PseudoLocale::EnXD => locale!("en-XD"),
        }
    }
}

impl fmt::Display for PseudoLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PseudoLocale {
    type Err = PseudoError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let locale = Locale::from_str(tag).map_err(|e| PseudoError::InvalidLocale {
            locale: tag.to_string(),
            reason: e.to_string(),
        })?;
        PseudoLocale::from_locale(&locale).ok_or_else(|| PseudoError::InvalidLocale {
            locale: tag.to_string(),
            reason: "region must be one of XA, XB, XC, XD".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::PADDING_MARKER;

    fn literal(text: &str) -> MessageSequence {
        MessageSequence(vec![MessageElement::literal(text)])
    }

    fn only_literal(ast: &MessageSequence) -> &str {
        assert_eq!(ast.len(), 1, "expected a single element: {:?}", ast);
        ast.0[0].literal_value().expect("literal")
    }

    #[test]
    fn test_xa_accents_letters_only() {
        let ast = generate_en_xa(literal("price: $100"));
        assert_eq!(only_literal(&ast), "ṗŕíćè: $100");
    }

    #[test]
    fn test_xa_keeps_length() {
        let input = "Hello 世界 🌍 123";
        let ast = generate_en_xa(literal(input));
        assert_eq!(
            only_literal(&ast).chars().count(),
            input.chars().count()
        );
    }

    #[test]
    fn test_xa_leaves_arguments() {
        let ast = generate_en_xa(MessageSequence(vec![
            MessageElement::literal("my name is "),
            MessageElement::argument("name"),
        ]));
        assert_eq!(
            ast.0,
            vec![
                MessageElement::literal("ṁẏ ńâṁè íś "),
                MessageElement::argument("name"),
            ]
        );
    }

    #[test]
    fn test_xb_triples_every_third_letter() {
        let ast = generate_en_xb(literal("hello world"));
        assert_eq!(only_literal(&ast), "[!! ḫèĺĺĺĺŏ ẘŏŕŕŕĺḋ !!]");
    }

    #[test]
    fn test_xb_non_letters_at_third_position_stay_single() {
        // position 3 is '1', position 6 is '!'
        let ast = generate_en_xb(literal("ab1cd!"));
        assert_eq!(only_literal(&ast), "[!! âḃ1ćḋ! !!]");
    }

    #[test]
    fn test_xb_wraps_empty_literal() {
        let ast = generate_en_xb(literal(""));
        assert_eq!(only_literal(&ast), "[!!  !!]");
    }

    #[test]
    fn test_xb_wraps_each_literal() {
        let ast = generate_en_xb(MessageSequence(vec![
            MessageElement::literal("Hello, "),
            MessageElement::argument("name"),
            MessageElement::literal("!"),
        ]));
        assert_eq!(ast.0[0].literal_value(), Some("[!! Ḣèĺĺĺĺŏ,  !!]"));
        assert_eq!(ast.0[1], MessageElement::argument("name"));
        assert_eq!(ast.0[2].literal_value(), Some("[!! ! !!]"));
    }

    #[test]
    fn test_positions_count_chars_not_utf16_units() {
        // the globe is one char even though it needs two UTF-16 units
        let ast = generate_en_xb(literal("🌍abc"));
        assert_eq!(only_literal(&ast), "[!! 🌍âḃḃḃć !!]");

        // one char of output: ceil(max(1, 1 * 3.0) / 4) = 1 dot per side
        let ast = generate_en_xc(literal("🌍"));
        assert_eq!(ast.0[0].literal_value(), Some("မြ·"));
        assert_eq!(ast.0[2].literal_value(), Some("·မြ"));
    }

    #[test]
    fn test_xc_pads_short_message() {
        let ast = generate_en_xc(literal("hi"));
        assert_eq!(
            ast.0,
            vec![
                MessageElement::literal("မြ··"),
                MessageElement::literal("ḫí"),
                MessageElement::literal("··မြ"),
            ]
        );
    }

    #[test]
    fn test_xc_empty_sequence_still_padded() {
        let ast = generate_en_xc(MessageSequence::new());
        assert_eq!(
            ast.0,
            vec![
                MessageElement::literal("မြ·"),
                MessageElement::literal("·မြ"),
            ]
        );
    }

    #[test]
    fn test_xc_counts_nested_literals_once() {
        let ast = generate_en_xc(MessageSequence(vec![
            MessageElement::literal("you have: "),
            MessageElement::plural(
                "n",
                [
                    ("one", literal("1 item")),
                    ("other", literal("N")),
                ],
            ),
            MessageElement::tag("b", literal("ab")),
        ]));
        // 10 + 6 + 1 + 2 = 19 characters, ratio 2.0, ceil(38 / 4) = 10
        let fill = "·".repeat(10);
        assert_eq!(ast.len(), 5);
        assert_eq!(
            ast.0[0].literal_value(),
            Some(format!("{}{}", PADDING_MARKER, fill).as_str())
        );
        assert_eq!(
            ast.0[4].literal_value(),
            Some(format!("{}{}", fill, PADDING_MARKER).as_str())
        );
        match &ast.0[2] {
            MessageElement::Plural { options, .. } => {
                // branches are not padded themselves
                assert_eq!(options["one"].value, literal("1 íṭèṁ"));
                assert_eq!(options["other"].value, literal("Ŋ"));
            }
            other => panic!("Expected plural, got {:?}", other),
        }
        assert_eq!(ast.0[3], MessageElement::tag("b", literal("âḃ")));
    }

    #[test]
    fn test_xd_accents_lowercase_vowels_only() {
        let ast = generate_en_xd(literal("aeiouAEIOU"));
        assert_eq!(ast.len(), 3);
        assert_eq!(ast.0[1].literal_value(), Some("âèíŏůAEIOU"));
    }

    #[test]
    fn test_xd_leaves_consonants() {
        let ast = generate_en_xd(literal("bcdfghjklmnpqrstvwxz y"));
        assert_eq!(ast.0[1].literal_value(), Some("bcdfghjklmnpqrstvwxz ẏ"));
    }

    #[test]
    fn test_select_branch_keys_preserved() {
        let ast = generate_en_xa(MessageSequence(vec![MessageElement::select(
            "gender",
            [
                ("male", literal("He is here")),
                ("other", literal("They are here")),
            ],
        )]));
        match &ast.0[0] {
            MessageElement::Select { value, options } => {
                assert_eq!(value, "gender");
                let keys: Vec<&str> = options.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["male", "other"]);
                assert_eq!(options["male"].value, literal("Ḣè íś ḫèŕè"));
            }
            other => panic!("Expected select, got {:?}", other),
        }
    }

    #[test]
    fn test_opaque_elements_untouched() {
        let opaque = vec![
            MessageElement::argument("a"),
            MessageElement::Number {
                value: "n".to_string(),
                style: Some(serde_json::json!("percent")),
            },
            MessageElement::Date {
                value: "d".to_string(),
                style: None,
            },
            MessageElement::Time {
                value: "t".to_string(),
                style: None,
            },
            MessageElement::Pound,
        ];
        for locale in [PseudoLocale::EnXA, PseudoLocale::EnXB] {
            let ast = locale.apply(MessageSequence(opaque.clone()));
            assert_eq!(ast.0, opaque, "{}", locale);
        }
    }

    #[test]
    fn test_pseudo_locale_tags() {
        for locale in PseudoLocale::ALL {
            assert_eq!(locale.tag().parse::<PseudoLocale>().unwrap(), locale);
            assert_eq!(locale.to_string(), locale.tag());
            assert_eq!(PseudoLocale::from_locale(&locale.locale()), Some(locale));
        }
    }

    #[test]
    fn test_pseudo_locale_rejects_other_regions() {
        assert!(matches!(
            "en-US".parse::<PseudoLocale>(),
            Err(PseudoError::InvalidLocale { .. })
        ));
        assert!(matches!(
            "not a locale!".parse::<PseudoLocale>(),
            Err(PseudoError::InvalidLocale { .. })
        ));
    }

    #[test]
    fn test_pseudolocalize_with_parser() {
        let parser = |source: &str| -> PseudoResult<MessageSequence> { Ok(literal(source)) };
        let ast = PseudoLocale::EnXA.pseudolocalize("hello", &parser).unwrap();
        assert_eq!(only_literal(&ast), "ḫèĺĺŏ");
    }
}
