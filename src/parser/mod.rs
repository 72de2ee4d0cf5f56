//! Statement parser for GQL scripts.
//!
//! The parser consumes the segments produced by the splitter and classifies
//! each one as a `USE`, `MATCH` or generic command statement. Pattern and
//! predicate bodies are kept as raw text.
//!
//! Parsing is fail-fast: the first malformed statement aborts the whole
//! script with exactly one diagnostic, and no partial script is returned.

mod program;
pub mod projection;
pub mod references;

use crate::ast::Script;
use crate::diag::DiagnosticError;
use crate::lexer::Splitter;
use log::debug;

pub use program::parse_statement;

/// Parses a script into an ordered list of statements.
pub fn parse_script(source: &str) -> Result<Script, DiagnosticError> {
    let segments = Splitter::new(source).split()?;
    let statements = segments
        .iter()
        .map(parse_statement)
        .collect::<Result<Vec<_>, _>>()?;
    debug!("parsed {} statement(s)", statements.len());
    Ok(Script { statements })
}
