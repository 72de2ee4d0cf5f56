//! Statement segments produced by the splitter.

use crate::ast::Position;
use std::fmt;

/// A trimmed, non-empty slice of the script holding one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The trimmed statement text.
    pub text: &'a str,
    /// Position of the first non-whitespace character.
    pub position: Position,
}

impl<'a> Segment<'a> {
    /// Creates a new segment.
    pub fn new(text: &'a str, position: Position) -> Self {
        Self { text, position }
    }

    /// Returns the leading whitespace-delimited word.
    pub fn leading_word(&self) -> &'a str {
        let text = self.text.trim_start();
        text.split(char::is_whitespace).next().unwrap_or_default()
    }

    /// Returns the trimmed text following the leading word.
    pub fn remainder(&self) -> &'a str {
        let text = self.text.trim_start();
        text[self.leading_word().len()..].trim()
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.text, self.position)
    }
}
