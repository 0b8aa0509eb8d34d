//! Message lookup objects.
//!
//! [`Intl`] resolves descriptors against a catalog and renders them.
//! [`PseudoIntl`] wraps an `Intl` so that every descriptor's default message
//! is routed through a pseudolocalization strategy before rendering.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use icu_locale::{Locale, locale};

use crate::Messages;
use crate::ast::{Message, MessageElement, MessageSequence};
use crate::error::PseudoResult;
use crate::format::{FormatValues, FormattedMessage, MessageFormatter};
use crate::parser::MessageParser;

/// Identifies a message and carries its source-language fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDescriptor {
    pub id: Option<String>,
    pub default_message: Option<Message>,
    pub description: Option<String>,
}

impl MessageDescriptor {
    pub fn new(id: &str) -> Self {
        MessageDescriptor {
            id: Some(id.to_owned()),
            ..Default::default()
        }
    }

    pub fn with_default_message(mut self, message: impl Into<Message>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

/// Locale and catalog for an [`Intl`].
#[derive(Debug, Clone)]
pub struct IntlConfig {
    pub locale: Locale,
    pub default_locale: Locale,
    pub messages: Messages,
}

impl IntlConfig {
    /// Empty catalog, default locale `en`.
    pub fn new(locale: Locale) -> Self {
        IntlConfig {
            locale,
            default_locale: locale!("en"),
            messages: Messages::new(),
        }
    }

    pub fn with_default_locale(mut self, default_locale: Locale) -> Self {
        self.default_locale = default_locale;
        self
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }
}

/// Shared cache of parsed message sources.
///
/// Clones share the same map, so one cache can back several lookup objects.
/// Callers always get their own copy of a cached sequence.
#[derive(Debug, Clone, Default)]
pub struct IntlCache {
    parsed: Arc<RwLock<HashMap<String, MessageSequence>>>,
}

impl IntlCache {
    pub fn new() -> Self {
        IntlCache::default()
    }

    /// Parse `source` once and hand out clones afterwards.
    pub fn get_or_parse<P>(&self, source: &str, parser: &P) -> PseudoResult<MessageSequence>
    where
        P: MessageParser + ?Sized,
    {
        let cached = self
            .parsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .cloned();
        if let Some(elements) = cached {
            tracing::trace!(source, "parse cache hit");
            return Ok(elements);
        }

        tracing::trace!(source, "parse cache miss");
        let elements = parser.parse(source)?;
        self.parsed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source.to_owned(), elements.clone());
        Ok(elements)
    }

    /// Element sequence for `message`; raw text goes through the cache.
    pub fn resolve<P>(&self, message: &Message, parser: &P) -> PseudoResult<MessageSequence>
    where
        P: MessageParser + ?Sized,
    {
        match message {
            Message::Text(source) => self.get_or_parse(source, parser),
            Message::Elements(elements) => Ok(elements.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.parsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.parsed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Shape shared by [`Intl`] and [`PseudoIntl`].
pub trait IntlShape {
    fn locale(&self) -> &Locale;
    fn default_locale(&self) -> &Locale;
    fn messages(&self) -> &Messages;
    fn get_message(&self, id: &str) -> Option<&Message>;
    fn format_message(
        &self,
        descriptor: &MessageDescriptor,
        values: &FormatValues,
    ) -> PseudoResult<FormattedMessage>;
}

/// Catalog-backed message lookup.
pub struct Intl<P, F> {
    config: IntlConfig,
    parser: P,
    formatter: F,
    cache: IntlCache,
}

impl<P, F> Intl<P, F> {
    /// A fresh cache is created when `cache` is `None`.
    pub fn new(config: IntlConfig, parser: P, formatter: F, cache: Option<IntlCache>) -> Self {
        Intl {
            config,
            parser,
            formatter,
            cache: cache.unwrap_or_default(),
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    pub fn cache(&self) -> &IntlCache {
        &self.cache
    }
}

impl<P, F> IntlShape for Intl<P, F>
where
    P: MessageParser,
    F: MessageFormatter,
{
    fn locale(&self) -> &Locale {
        &self.config.locale
    }

    fn default_locale(&self) -> &Locale {
        &self.config.default_locale
    }

    fn messages(&self) -> &Messages {
        &self.config.messages
    }

    fn get_message(&self, id: &str) -> Option<&Message> {
        self.config.messages.get_message(id)
    }

    /// Catalog entry first, then the default message, then the id itself.
    fn format_message(
        &self,
        descriptor: &MessageDescriptor,
        values: &FormatValues,
    ) -> PseudoResult<FormattedMessage> {
        let message = descriptor
            .id
            .as_deref()
            .and_then(|id| self.get_message(id))
            .or(descriptor.default_message.as_ref());

        let elements = match (message, descriptor.id.as_deref()) {
            (Some(message), _) => self.cache.resolve(message, &self.parser)?,
            (None, Some(id)) => {
                tracing::warn!(
                    id,
                    locale = %self.config.locale,
                    "missing message and no default, rendering the id"
                );
                MessageSequence(vec![MessageElement::literal(id)])
            }
            (None, None) => {
                tracing::warn!("descriptor has neither id nor default message");
                return Ok(FormattedMessage::Text(String::new()));
            }
        };

        self.formatter
            .format(&self.config.locale, &elements, values)
    }
}

/// Lookup object that pseudolocalizes every descriptor's default message.
///
/// Catalog entries are ignored by `format_message`; the default message is
/// the source text being pseudolocalized. Everything else delegates to the
/// wrapped [`Intl`].
pub struct PseudoIntl<P, F, S> {
    inner: Intl<P, F>,
    strategy: S,
}

impl<P, F, S> PseudoIntl<P, F, S> {
    pub fn new(inner: Intl<P, F>, strategy: S) -> Self {
        PseudoIntl { inner, strategy }
    }

    pub fn inner(&self) -> &Intl<P, F> {
        &self.inner
    }
}

impl<P, F, S> PseudoIntl<P, F, S>
where
    P: MessageParser,
    F: MessageFormatter,
    S: Fn(MessageSequence) -> MessageSequence,
{
    /// Like [`IntlShape::format_message`], flattened to its text.
    pub fn format_message_text(
        &self,
        descriptor: &MessageDescriptor,
        values: &FormatValues,
    ) -> PseudoResult<String> {
        Ok(self
            .format_message(descriptor, values)?
            .into_text()
            .unwrap_or_default())
    }
}

impl<P, F, S> IntlShape for PseudoIntl<P, F, S>
where
    P: MessageParser,
    F: MessageFormatter,
    S: Fn(MessageSequence) -> MessageSequence,
{
    fn locale(&self) -> &Locale {
        self.inner.locale()
    }

    fn default_locale(&self) -> &Locale {
        self.inner.default_locale()
    }

    fn messages(&self) -> &Messages {
        self.inner.messages()
    }

    fn get_message(&self, id: &str) -> Option<&Message> {
        self.inner.get_message(id)
    }

    /// Always `Text`; empty when there is no default message or the
    /// formatter produced a rich result.
    fn format_message(
        &self,
        descriptor: &MessageDescriptor,
        values: &FormatValues,
    ) -> PseudoResult<FormattedMessage> {
        let Some(default_message) = &descriptor.default_message else {
            tracing::debug!(id = ?descriptor.id, "no default message to pseudolocalize");
            return Ok(FormattedMessage::Text(String::new()));
        };

        let elements = self.inner.cache.resolve(default_message, &self.inner.parser)?;
        let pseudo = (self.strategy)(elements);

        match self
            .inner
            .formatter
            .format(self.inner.locale(), &pseudo, values)?
        {
            FormattedMessage::Text(text) => Ok(FormattedMessage::Text(text)),
            FormattedMessage::Rich(parts) => {
                tracing::warn!(
                    id = ?descriptor.id,
                    parts = parts.len(),
                    "pseudolocalized message rendered to rich parts, returning empty text"
                );
                Ok(FormattedMessage::Text(String::new()))
            }
        }
    }
}

/// Build a [`PseudoIntl`] for `locale` over `messages`.
pub fn pseudo_intl<P, F, S>(
    strategy: S,
    messages: Messages,
    locale: Locale,
    cache: Option<IntlCache>,
    parser: P,
    formatter: F,
) -> PseudoIntl<P, F, S>
where
    P: MessageParser,
    F: MessageFormatter,
    S: Fn(MessageSequence) -> MessageSequence,
{
    let config = IntlConfig::new(locale).with_messages(messages);
    PseudoIntl::new(Intl::new(config, parser, formatter, cache), strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PseudoError;
    use crate::format::FormatValue;
    use crate::mock::{MockFormatter, MockParser};
    use crate::pseudo::{generate_en_xa, generate_en_xb};
    use std::cell::Cell;

    fn catalog() -> Messages {
        let mut messages = Messages::new();
        messages
            .with_message("greeting", "Hello, {name}!")
            .with_message("farewell", "Goodbye, {name}!");
        messages
    }

    fn greeting() -> MessageDescriptor {
        MessageDescriptor::new("greeting").with_default_message("Hello, {name}!")
    }

    fn name(value: &str) -> FormatValues {
        FormatValues::new().with("name", value)
    }

    #[test]
    fn test_descriptor_and_config_builders() {
        let descriptor = MessageDescriptor::new("save")
            .with_default_message("Save")
            .with_description("Button label in the settings dialog");
        assert_eq!(descriptor.id.as_deref(), Some("save"));
        assert_eq!(descriptor.default_message, Some(Message::Text("Save".to_string())));
        assert_eq!(
            descriptor.description.as_deref(),
            Some("Button label in the settings dialog")
        );

        let config = IntlConfig::new(locale!("en-XA")).with_default_locale(locale!("fr"));
        let intl = Intl::new(config, MockParser, MockFormatter, None);
        assert_eq!(intl.default_locale(), &locale!("fr"));
        assert_eq!(intl.locale(), &locale!("en-XA"));
        assert!(intl.messages().is_empty());
    }

    #[test]
    fn test_intl_prefers_catalog() {
        let mut messages = Messages::new();
        messages.with_message("greeting", "Hi, {name}!");
        let intl = Intl::new(
            IntlConfig::new(locale!("en")).with_messages(messages),
            MockParser,
            MockFormatter,
            None,
        );
        let result = intl.format_message(&greeting(), &name("World")).unwrap();
        assert_eq!(result, FormattedMessage::Text("Hi, World!".to_string()));
    }

    #[test]
    fn test_intl_falls_back_to_default_then_id() {
        let intl = Intl::new(IntlConfig::new(locale!("en")), MockParser, MockFormatter, None);
        assert_eq!(
            intl.format_message(&greeting(), &name("World")).unwrap(),
            FormattedMessage::Text("Hello, World!".to_string())
        );
        assert_eq!(
            intl.format_message(&MessageDescriptor::new("missing.id"), &FormatValues::new())
                .unwrap(),
            FormattedMessage::Text("missing.id".to_string())
        );
        assert_eq!(
            intl.format_message(&MessageDescriptor::default(), &FormatValues::new())
                .unwrap(),
            FormattedMessage::Text(String::new())
        );
    }

    #[test]
    fn test_pseudo_intl_xa() {
        let intl = pseudo_intl(
            generate_en_xa,
            catalog(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        assert_eq!(
            intl.format_message_text(&greeting(), &name("World")).unwrap(),
            "Ḣèĺĺŏ, World!"
        );
    }

    #[test]
    fn test_pseudo_intl_xb() {
        let intl = pseudo_intl(
            generate_en_xb,
            catalog(),
            locale!("en-XB"),
            None,
            MockParser,
            MockFormatter,
        );
        assert_eq!(
            intl.format_message_text(&greeting(), &name("World")).unwrap(),
            "[!! Ḣèĺĺĺĺŏ,  !!]World[!! ! !!]"
        );
    }

    #[test]
    fn test_pseudo_intl_without_default_is_empty() {
        let intl = pseudo_intl(
            generate_en_xa,
            catalog(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        // the catalog has "greeting" but the adapter only looks at defaults
        let result = intl
            .format_message(&MessageDescriptor::new("greeting"), &FormatValues::new())
            .unwrap();
        assert_eq!(result, FormattedMessage::Text(String::new()));
        assert_eq!(
            intl.format_message_text(&MessageDescriptor::new("missing"), &FormatValues::new())
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_pseudo_intl_rich_result_is_empty() {
        let intl = pseudo_intl(
            generate_en_xa,
            Messages::new(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        let descriptor = MessageDescriptor::new("logo").with_default_message("Logo: {icon}");
        let values = FormatValues::new().with("icon", serde_json::json!({"element": "img"}));
        assert_eq!(
            intl.format_message(&descriptor, &values).unwrap(),
            FormattedMessage::Text(String::new())
        );
    }

    #[test]
    fn test_pseudo_intl_delegates_lookups() {
        let intl = pseudo_intl(
            generate_en_xa,
            catalog(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        assert_eq!(intl.locale(), &locale!("en-XA"));
        assert_eq!(intl.default_locale(), &locale!("en"));
        assert_eq!(intl.messages().len(), 2);
        assert_eq!(
            intl.get_message("farewell"),
            Some(&Message::Text("Goodbye, {name}!".to_string()))
        );
        assert_eq!(intl.get_message("nope"), None);
    }

    #[test]
    fn test_pseudo_intl_propagates_errors() {
        let intl = pseudo_intl(
            generate_en_xa,
            Messages::new(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        let broken = MessageDescriptor::new("broken").with_default_message("{name");
        assert!(matches!(
            intl.format_message(&broken, &FormatValues::new()),
            Err(PseudoError::Parse { .. })
        ));
        assert_eq!(
            intl.format_message(&greeting(), &FormatValues::new()),
            Err(PseudoError::MissingValue("name".to_string()))
        );
    }

    #[test]
    fn test_shared_cache_parses_once() {
        let calls = Cell::new(0);
        let parser = |source: &str| {
            calls.set(calls.get() + 1);
            MockParser.parse(source)
        };
        let cache = IntlCache::new();

        let first = pseudo_intl(
            generate_en_xa,
            Messages::new(),
            locale!("en-XA"),
            Some(cache.clone()),
            &parser,
            MockFormatter,
        );
        let second = pseudo_intl(
            generate_en_xb,
            Messages::new(),
            locale!("en-XB"),
            Some(cache.clone()),
            &parser,
            MockFormatter,
        );

        assert_eq!(
            first.format_message_text(&greeting(), &name("Test")).unwrap(),
            "Ḣèĺĺŏ, Test!"
        );
        assert_eq!(
            second.format_message_text(&greeting(), &name("Test")).unwrap(),
            "[!! Ḣèĺĺĺĺŏ,  !!]Test[!! ! !!]"
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);

        // the cached sequence is still the untransformed source
        let cached = cache.get_or_parse("Hello, {name}!", &parser).unwrap();
        assert_eq!(cached.0[0], MessageElement::literal("Hello, "));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_pre_parsed_default_message() {
        let intl = pseudo_intl(
            generate_en_xa,
            Messages::new(),
            locale!("en-XA"),
            None,
            MockParser,
            MockFormatter,
        );
        let descriptor = MessageDescriptor::new("bold").with_default_message(vec![
            MessageElement::tag("b", vec![MessageElement::literal("bold")]),
        ]);
        let values =
            FormatValues::new().with("b", FormatValue::tag(|chunks| format!("**{}**", chunks)));
        assert_eq!(
            intl.format_message_text(&descriptor, &values).unwrap(),
            "**ḃŏĺḋ**"
        );
        assert!(intl.inner().cache().is_empty());
    }
}
