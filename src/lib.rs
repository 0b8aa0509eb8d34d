//! Pseudolocalization for ICU message ASTs.
//!
//! Pseudolocalization rewrites the literal text of a message so that
//! untranslated strings, hard-coded concatenation and layouts that cannot
//! absorb longer translations stand out during testing, while placeholders,
//! plurals, selects and tags keep working.
//!
//! # Example
//!
//! ```no_run
//! use pseudolocalize::mock::{MockFormatter, MockParser};
//! use pseudolocalize::{
//!     FormatValues, MessageDescriptor, Messages, PseudoError, PseudoLocale, pseudo_intl,
//! };
//!
//! fn main() -> Result<(), PseudoError> {
//!     let locale: PseudoLocale = "en-XA".parse()?;
//!     let intl = pseudo_intl(
//!         locale.strategy(),
//!         Messages::new(),
//!         locale.locale(),
//!         None,
//!         MockParser,
//!         MockFormatter,
//!     );
//!     let text = intl.format_message_text(
//!         &MessageDescriptor::new("greeting").with_default_message("Hello, {name}!"),
//!         &FormatValues::new().with("name", "World"),
//!     )?;
//!     assert_eq!(text, "Ḣèĺĺŏ, World!");
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;

pub mod alphabet;
pub mod ast;
pub mod error;
pub mod expansion;
pub mod format;
pub mod intl;
pub mod loader;
pub mod mock;
pub mod parser;
pub mod pseudo;


pub use ast::{
    ElementKind, Message, MessageElement, MessageOption, MessageSequence, Options, PluralType,
};
pub use error::{PseudoError, PseudoResult};
pub use format::{FormatValue, FormatValues, FormattedMessage, FormattedPart, MessageFormatter};
pub use intl::{
    Intl, IntlCache, IntlConfig, IntlShape, MessageDescriptor, PseudoIntl, pseudo_intl,
};
pub use loader::{load_messages_from_file, load_messages_from_str};
pub use parser::MessageParser;
pub use pseudo::{
    PseudoLocale, Strategy, generate_en_xa, generate_en_xb, generate_en_xc, generate_en_xd,
};

/// Message catalog: identifier to message source or pre-parsed AST.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Messages(pub HashMap<String, Message>);

impl Messages {
    pub fn new() -> Self {
        Messages(HashMap::new())
    }
    pub fn with_message(&mut self, key: &str, message: impl Into<Message>) -> &mut Self {
        self.0.insert(key.to_owned(), message.into());
        self
    }
    pub fn get_message(&self, key: &str) -> Option<&Message> {
        self.0.get(key)
    }
    pub fn get_messages(&self) -> &HashMap<String, Message> {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Messages
where
    K: Into<String>,
    V: Into<Message>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Messages(
            iter.into_iter()
                .map(|(key, message)| (key.into(), message.into()))
                .collect(),
        )
    }
}
