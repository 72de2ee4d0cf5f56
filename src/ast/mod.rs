//! AST foundation types and statement structures.

pub mod program;
mod span;

// Re-export span types
pub use span::{Position, Span};

// Re-export program structure
pub use program::{CommandStatement, MatchStatement, Script, Statement, UseGraphStatement};
