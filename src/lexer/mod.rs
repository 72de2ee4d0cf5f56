//! Statement splitting for GQL scripts.
//!
//! The splitter makes a single left-to-right pass over the script and cuts it
//! into statement [`Segment`]s at top-level semicolons. Semicolons inside
//! single- or double-quoted strings, or inside any open `(`, `[` or `{`, do
//! not end a statement.
//!
//! Only an unterminated quote is an error. Brackets left open at end of input
//! are accepted and the trailing text is flushed as the last segment.

pub mod keywords;
pub mod token;

use crate::ast::Position;
use crate::diag::{Diagnostic, DiagnosticCode, DiagnosticError};
use log::{debug, trace};
use token::Segment;

/// A statement splitter over GQL source text.
pub struct Splitter<'a> {
    /// The source text being split.
    source: &'a str,
    /// Current 1-based line.
    line: usize,
    /// Current 1-based column, in characters.
    column: usize,
    /// Start of the segment being collected, once a non-space was seen.
    start: Option<Position>,
    /// The open quote character, if inside a string.
    quote: Option<char>,
    /// Set right after a backslash inside a quote.
    escape: bool,
    /// Open brackets, innermost last.
    brackets: Vec<char>,
    /// Accumulated segments.
    segments: Vec<Segment<'a>>,
}

impl<'a> Splitter<'a> {
    /// Creates a new splitter for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            start: None,
            quote: None,
            escape: false,
            brackets: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Splits the source into segments.
    ///
    /// Fails with a single diagnostic if a string literal is still open at
    /// end of input.
    pub fn split(mut self) -> Result<Vec<Segment<'a>>, DiagnosticError> {
        for (idx, ch) in self.source.char_indices() {
            if self.start.is_none() {
                if ch.is_whitespace() {
                    self.advance(ch);
                    continue;
                }
                self.start = Some(Position::new(idx, self.line, self.column));
            }

            if let Some(quote) = self.quote {
                if self.escape {
                    self.escape = false;
                } else if ch == '\\' {
                    self.escape = true;
                } else if ch == quote {
                    self.quote = None;
                }
            } else {
                match ch {
                    '\'' | '"' => self.quote = Some(ch),
                    '(' | '[' | '{' => self.brackets.push(ch),
                    ')' | ']' | '}' => {
                        if self.brackets.last().copied().and_then(closer_for) == Some(ch) {
                            self.brackets.pop();
                        }
                    }
                    ';' if self.brackets.is_empty() => self.finish_segment(idx),
                    _ => {}
                }
            }

            self.advance(ch);
        }

        if self.quote.is_some() {
            debug!(
                "unterminated string literal at {}:{}",
                self.line, self.column
            );
            return Err(DiagnosticError::single(
                "gql: unterminated string literal",
                Diagnostic::error("unterminated string literal")
                    .with_code(DiagnosticCode::ParseError)
                    .at(self.line, self.column),
            ));
        }

        if !self.brackets.is_empty() {
            trace!(
                "flushing final segment with {} unclosed bracket(s)",
                self.brackets.len()
            );
        }
        self.finish_segment(self.source.len());
        Ok(self.segments)
    }

    /// Closes the current segment at byte `end` and resets per-segment state.
    fn finish_segment(&mut self, end: usize) {
        if let Some(start) = self.start.take() {
            let text = self.source[start.offset..end].trim();
            if text.is_empty() {
                trace!("dropping empty segment at {start}");
            } else {
                debug!("segment at {start}: {text:?}");
                self.segments.push(Segment::new(text, start));
            }
        }
        self.quote = None;
        self.escape = false;
        self.brackets.clear();
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

/// Returns the closing character for an opening bracket.
fn closer_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Convenience function to split source text into statement segments.
pub fn split_statements(source: &str) -> Result<Vec<Segment<'_>>, DiagnosticError> {
    Splitter::new(source).split()
}
