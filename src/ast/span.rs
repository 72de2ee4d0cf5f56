//! Source positions for statements.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A byte range in source text.
pub type Span = Range<usize>;

/// The location of the first character of a statement.
///
/// `offset` is a byte index into the script; `line` and `column` are 1-based,
/// with columns counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// 0-based byte offset.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Returns the span of `len` bytes starting at this position.
    pub fn span(&self, len: usize) -> Span {
        self.offset..self.offset + len
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
