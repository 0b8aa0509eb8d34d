//! Seam for the external ICU message parser.
//!
//! This crate never parses ICU syntax itself. Callers plug in whatever
//! parser produces [`MessageSequence`] values (a binding to a real ICU
//! parser, a precompiled catalog lookup, or [`crate::mock::MockParser`] in
//! tests).

use crate::ast::MessageSequence;
use crate::error::PseudoResult;

/// Turns message source text into an element sequence.
///
/// Implementations report malformed input as [`crate::PseudoError::Parse`];
/// callers in this crate propagate that error unchanged.
pub trait MessageParser {
    fn parse(&self, source: &str) -> PseudoResult<MessageSequence>;
}

impl<F> MessageParser for F
where
    F: Fn(&str) -> PseudoResult<MessageSequence>,
{
    fn parse(&self, source: &str) -> PseudoResult<MessageSequence> {
        self(source)
    }
}
