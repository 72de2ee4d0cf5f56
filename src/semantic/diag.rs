//! Semantic diagnostics built on the base diagnostic model.
//!
//! Every semantic diagnostic is an error anchored to the statement that
//! produced it and tagged with a [`DiagnosticCode`].

use crate::ast::Statement;
use crate::diag::{Diagnostic, DiagnosticCode};

/// Builder for semantic diagnostics.
#[derive(Debug, Clone)]
pub struct SemanticDiagBuilder {
    code: DiagnosticCode,
    message: String,
    statement: String,
    line: usize,
    column: usize,
    detail: String,
}

impl SemanticDiagBuilder {
    /// Creates a new semantic diagnostic builder.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            statement: String::new(),
            line: 0,
            column: 0,
            detail: String::new(),
        }
    }

    /// Anchors the diagnostic at `statement`'s text and position.
    pub fn for_statement(mut self, statement: &Statement) -> Self {
        let position = statement.position();
        self.statement = statement.text().to_string();
        self.line = position.line;
        self.column = position.column;
        self
    }

    /// Adds a hint rendered after the message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Builds the diagnostic.
    pub fn build(self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.message)
            .with_code(self.code)
            .with_statement(self.statement)
            .at(self.line, self.column);
        if !self.detail.is_empty() {
            diag = diag.with_detail(self.detail);
        }
        diag
    }
}

/// Helper functions for creating common semantic diagnostics.
impl SemanticDiagBuilder {
    /// `USE` named a graph the catalog does not know.
    pub fn graph_undefined(graph: &str) -> Self {
        Self::new(
            DiagnosticCode::CatalogGraphUndefined,
            format!("graph {graph:?} not found"),
        )
    }

    /// A statement needs a graph but none is active.
    pub fn graph_missing() -> Self {
        Self::new(DiagnosticCode::CatalogGraphMissing, "no active graph selected")
    }

    /// The role may not read the active graph.
    pub fn read_denied(role: &str, graph: &str) -> Self {
        Self::new(
            DiagnosticCode::AuthorizationDenied,
            format!("role {role:?} is not authorized to query graph {graph:?}"),
        )
    }

    /// The role may not write the active graph.
    pub fn write_denied(role: &str, graph: &str) -> Self {
        Self::new(
            DiagnosticCode::AuthorizationDenied,
            format!("role {role:?} is not authorized to modify graph {graph:?}"),
        )
    }

    /// `RETURN` projects names the pattern never binds.
    pub fn unknown_variables(missing: &[String]) -> Self {
        Self::new(
            DiagnosticCode::SemanticUnknownVariable,
            format!(
                "RETURN references undefined variables: {}",
                missing.join(", ")
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Position, UseGraphStatement};
    use crate::diag::Severity;

    fn use_stmt() -> Statement {
        Statement::UseGraph(UseGraphStatement {
            position: Position::new(12, 2, 3),
            text: "USE nope".into(),
            graph: "nope".into(),
        })
    }

    #[test]
    fn graph_undefined_is_anchored() {
        let diag = SemanticDiagBuilder::graph_undefined("nope")
            .for_statement(&use_stmt())
            .build();
        assert_eq!(diag.message, "graph \"nope\" not found");
        assert_eq!(diag.code, "CATALOG_GRAPH_UNDEFINED");
        assert_eq!(diag.statement, "USE nope");
        assert_eq!((diag.line, diag.column), (2, 3));
        assert_eq!(diag.severity, Severity::Error);
    }

    #[test]
    fn authorization_messages() {
        let read = SemanticDiagBuilder::read_denied("reader", "g").build();
        assert_eq!(
            read.message,
            "role \"reader\" is not authorized to query graph \"g\""
        );
        assert!(read.has_code(DiagnosticCode::AuthorizationDenied));

        let write = SemanticDiagBuilder::write_denied("reader", "g").build();
        assert_eq!(
            write.message,
            "role \"reader\" is not authorized to modify graph \"g\""
        );
    }

    #[test]
    fn unknown_variables_joins_names() {
        let diag =
            SemanticDiagBuilder::unknown_variables(&["a".to_string(), "b".to_string()]).build();
        assert_eq!(diag.message, "RETURN references undefined variables: a, b");
        assert_eq!(diag.code, "SEMANTIC_UNKNOWN_VARIABLE");
    }

    #[test]
    fn unanchored_diagnostic_has_no_position() {
        let diag = SemanticDiagBuilder::graph_missing()
            .with_detail("run USE first")
            .build();
        assert_eq!(diag.line, 0);
        assert!(diag.statement.is_empty());
        assert_eq!(diag.detail, "run USE first");
    }
}
