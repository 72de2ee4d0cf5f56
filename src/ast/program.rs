//! AST node types for a parsed script.

use crate::ast::{Position, Span};
use serde::Serialize;
use smol_str::SmolStr;

/// An ordered list of statements parsed from one input text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    /// Returns the number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the script holds no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates over the statements in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `USE [GRAPH] <name>`
    UseGraph(UseGraphStatement),
    /// `MATCH <pattern> [WHERE <predicate>] RETURN <items>`
    Match(MatchStatement),
    /// Any other statement, kept as keyword plus raw body.
    Command(CommandStatement),
}

impl Statement {
    /// Returns the position of the statement's first character.
    pub fn position(&self) -> Position {
        match self {
            Statement::UseGraph(s) => s.position,
            Statement::Match(s) => s.position,
            Statement::Command(s) => s.position,
        }
    }

    /// Returns the trimmed source text of the statement.
    pub fn text(&self) -> &str {
        match self {
            Statement::UseGraph(s) => &s.text,
            Statement::Match(s) => &s.text,
            Statement::Command(s) => &s.text,
        }
    }

    /// Returns the byte span the statement text covers in the script.
    pub fn span(&self) -> Span {
        self.position().span(self.text().len())
    }

    /// Short name of the statement kind, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::UseGraph(_) => "USE",
            Statement::Match(_) => "MATCH",
            Statement::Command(_) => "COMMAND",
        }
    }
}

/// Selects the active graph for subsequent statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseGraphStatement {
    pub position: Position,
    pub text: String,
    /// Normalized graph name.
    pub graph: SmolStr,
}

/// A pattern query. Pattern and predicate bodies are kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchStatement {
    pub position: Position,
    pub text: String,
    pub pattern: String,
    /// Raw WHERE body, empty when absent.
    pub where_clause: String,
    /// Raw projection items in source order, never empty.
    pub projections: Vec<String>,
}

/// A statement identified only by its leading keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandStatement {
    pub position: Position,
    pub text: String,
    /// Upper-cased leading keyword.
    pub keyword: SmolStr,
    pub body: String,
}
