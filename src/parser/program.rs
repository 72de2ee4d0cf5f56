//! Statement classification.

use crate::ast::{CommandStatement, MatchStatement, Statement, UseGraphStatement};
use crate::diag::{Diagnostic, DiagnosticCode, DiagnosticError};
use crate::lexer::keywords::{self, StatementKeyword};
use crate::lexer::token::Segment;
use crate::parser::projection::split_projection;
use crate::parser::references::normalize_identifier;
use log::debug;
use smol_str::SmolStr;

const RETURN_MARKER: &str = " RETURN ";
const WHERE_MARKER: &str = " WHERE ";

const INVALID_USE: &str = "gql: invalid USE statement";
const INVALID_MATCH: &str = "gql: invalid MATCH statement";

/// Parses one segment into a statement.
///
/// The leading word, compared case-insensitively, selects the statement
/// shape. Unknown keywords produce a [`Statement::Command`].
pub fn parse_statement(segment: &Segment<'_>) -> Result<Statement, DiagnosticError> {
    let leading = segment.leading_word();
    if leading.is_empty() {
        return Err(DiagnosticError::single(
            "gql: empty statement",
            syntax_error("statement is empty", segment, ""),
        ));
    }

    let statement = match keywords::lookup_keyword(leading) {
        Some(StatementKeyword::Use) => parse_use(segment)?,
        Some(StatementKeyword::Match) => parse_match(segment)?,
        None => parse_command(leading, segment),
    };
    debug!(
        "classified {} statement at {}",
        statement.kind_name(),
        segment.position
    );
    Ok(statement)
}

/// Parses `USE [GRAPH] <name>`.
fn parse_use(segment: &Segment<'_>) -> Result<Statement, DiagnosticError> {
    let rest = segment.remainder();
    if rest.is_empty() {
        return Err(DiagnosticError::single(
            INVALID_USE,
            syntax_error("USE statement must specify a graph name", segment, "USE"),
        ));
    }

    let fields: Vec<&str> = rest.split_whitespace().collect();
    let name_idx = if fields.len() > 1 && keywords::is_graph_keyword(fields[0]) {
        1
    } else {
        0
    };
    let Some(raw) = fields.get(name_idx) else {
        return Err(DiagnosticError::single(
            INVALID_USE,
            syntax_error(
                "USE statement must specify a graph name",
                segment,
                segment.text,
            ),
        ));
    };

    let Some(graph) = normalize_identifier(raw) else {
        return Err(DiagnosticError::single(
            INVALID_USE,
            syntax_error(
                "graph name must be a quoted string or identifier",
                segment,
                segment.text,
            ),
        ));
    };

    Ok(Statement::UseGraph(UseGraphStatement {
        position: segment.position,
        text: segment.text.to_string(),
        graph,
    }))
}

/// Parses `MATCH <pattern> [WHERE <predicate>] RETURN <items>`.
///
/// Clause markers are located by plain case-insensitive substring search,
/// so they must be surrounded by single spaces.
fn parse_match(segment: &Segment<'_>) -> Result<Statement, DiagnosticError> {
    let invalid = |message: &str| {
        DiagnosticError::single(INVALID_MATCH, syntax_error(message, segment, segment.text))
    };

    let body = segment.remainder();
    if body.is_empty() {
        return Err(invalid("MATCH requires a pattern"));
    }

    // ASCII upper-casing keeps byte offsets aligned with `body`.
    let upper = body.to_ascii_uppercase();
    let Some(return_idx) = upper.find(RETURN_MARKER) else {
        return Err(invalid("RETURN clause is required"));
    };

    let (pattern, where_clause) = match upper[..return_idx].find(WHERE_MARKER) {
        Some(where_idx) => (
            body[..where_idx].trim(),
            body[where_idx + WHERE_MARKER.len()..return_idx].trim(),
        ),
        None => (body[..return_idx].trim(), ""),
    };
    if pattern.is_empty() {
        return Err(invalid("MATCH pattern cannot be empty"));
    }

    let projection = body[return_idx + RETURN_MARKER.len()..].trim();
    if projection.is_empty() {
        return Err(invalid("RETURN clause cannot be empty"));
    }
    let projections = split_projection(projection);
    if projections.is_empty() {
        return Err(invalid("RETURN clause must project at least one item"));
    }

    Ok(Statement::Match(MatchStatement {
        position: segment.position,
        text: segment.text.to_string(),
        pattern: pattern.to_string(),
        where_clause: where_clause.to_string(),
        projections,
    }))
}

/// Wraps any other statement as a keyword plus raw body.
fn parse_command(leading: &str, segment: &Segment<'_>) -> Statement {
    Statement::Command(CommandStatement {
        position: segment.position,
        text: segment.text.to_string(),
        keyword: SmolStr::new(leading.to_uppercase()),
        body: segment.remainder().to_string(),
    })
}

fn syntax_error(message: &str, segment: &Segment<'_>, statement: &str) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(DiagnosticCode::ParseError)
        .with_statement(statement)
        .at(segment.position.line, segment.position.column)
}
