//! GQL front-end: statement parsing, catalog-aware semantic validation and
//! structured diagnostics.
//!
//! Scripts are split into `;`-separated statements, classified as `USE`,
//! `MATCH` or generic commands, then validated against a graph catalog for
//! graph existence, role permissions and variable references. Every failure
//! is reported as a [`DiagnosticError`] that renders through miette and
//! serializes to a stable JSON payload.
//!
//! # Example
//!
//! ```
//! use gql_frontend::{DiagnosticCode, parse_script};
//!
//! let script = parse_script("USE GRAPH social; MATCH (n:Person) RETURN n").unwrap();
//! assert_eq!(script.len(), 2);
//!
//! let err = parse_script("MATCH (n) WHERE n.age > 30").unwrap_err();
//! assert!(err.diagnostics[0].has_code(DiagnosticCode::ParseError));
//! assert_eq!(err.diagnostics[0].message, "RETURN clause is required");
//! ```

pub mod ast;
pub mod config;
pub mod diag;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod semantic;
pub mod session;

pub use ast::{Position, Script, Span, Statement};
pub use diag::{Diagnostic, DiagnosticCode, DiagnosticError, Severity, SourceFile};
pub use lexer::split_statements;
pub use parser::parse_script;
pub use registry::{Language, LanguageRegistry};
pub use semantic::{ExecutionContext, InMemoryCatalog, Options, Validator};
pub use session::{ExecuteError, Session, http_error};

/// Name under which this front-end registers.
pub const LANGUAGE_NAME: &str = "gql";

fn default_session() -> Session {
    Session::default()
}

/// Returns the descriptor for the GQL language.
pub fn language() -> Language {
    Language {
        name: LANGUAGE_NAME,
        session: default_session,
        http_error,
    }
}
