use thiserror::Error;

/// Error types for pseudolocalization and the collaborators it drives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PseudoError {
    /// A message parser rejected its input
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },
    /// A message formatter could not render a sequence
    #[error("Format error: {0}")]
    Format(String),
    /// A formatter was asked to render an argument nobody supplied
    #[error("Missing value for argument '{0}'")]
    MissingValue(String),
    /// A locale tag could not be parsed or does not name a pseudo-locale
    #[error("Invalid locale '{locale}': {reason}")]
    InvalidLocale { locale: String, reason: String },
    /// A serialized message element did not match the AST wire shape
    #[error("Invalid message element: {0}")]
    InvalidElement(String),
    /// A message catalog could not be read or decoded
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl PseudoError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        PseudoError::Parse {
            offset,
            message: message.into(),
        }
    }
}

/// Result type for pseudolocalization operations
pub type PseudoResult<T> = Result<T, PseudoError>;
