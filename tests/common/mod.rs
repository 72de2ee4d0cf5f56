//! Common test utilities
//!
//! Shared fixtures and assertion helpers for the integration tests.
//!
//! # Fixtures
//! - [`social_catalog`] - Catalog with a `social` graph and reader/writer roles
//!
//! # Helpers
//! - [`parse_cleanly`] - Parse source, panicking on diagnostics
//! - [`validate`] - Parse and validate against a catalog
//! - [`expect_diagnostics`] - Parse and validate, expecting a semantic failure
//! - [`codes`] - Extract diagnostic codes for compact assertions

#![allow(dead_code)]

use std::sync::Arc;

use gql_frontend::diag::{Diagnostic, DiagnosticError, format_diagnostics};
use gql_frontend::semantic::{
    ExecutionContext, Graph, GraphRole, InMemoryCatalog, Options, Schema, ValidateError,
    ValidationOutput, Validator,
};
use gql_frontend::{Script, parse_script};

// ============================================================================
// Fixtures
// ============================================================================

/// Builds a catalog with one `social` graph, set as default.
///
/// Roles: `reader` (read only), `writer` (read and write).
pub fn social_catalog() -> Arc<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();
    catalog.register_graph(
        Graph::new("social")
            .with_default_schema("public")
            .with_schema(Schema::new("public").with_type("Person").with_type("City"))
            .with_role(GraphRole::reader("reader"))
            .with_role(GraphRole::writer("writer")),
    );
    catalog.set_default_graph("social");
    Arc::new(catalog)
}

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Parses `source`, panicking with rendered diagnostics on failure.
pub fn parse_cleanly(source: &str) -> Script {
    parse_script(source).unwrap_or_else(|err| {
        panic!(
            "unexpected diagnostics for `{source}`:\n{}",
            format_diagnostics(&err.diagnostics)
        )
    })
}

/// Parses `source`, expecting exactly one parse diagnostic.
pub fn parse_failure(source: &str) -> (DiagnosticError, Diagnostic) {
    let err = parse_script(source)
        .err()
        .unwrap_or_else(|| panic!("expected `{source}` to fail parsing"));
    assert_eq!(
        err.diagnostics.len(),
        1,
        "parser must report exactly one diagnostic:\n{}",
        format_diagnostics(&err.diagnostics)
    );
    let diag = err.diagnostics[0].clone();
    (err, diag)
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// Parses and validates `source` against `catalog`.
pub fn validate(
    catalog: Arc<InMemoryCatalog>,
    source: &str,
    options: &Options,
) -> Result<ValidationOutput, ValidateError> {
    let script = parse_cleanly(source);
    Validator::new(catalog).validate(&ExecutionContext::new(), &script, options)
}

/// Parses and validates, expecting a semantic failure.
pub fn expect_diagnostics(
    catalog: Arc<InMemoryCatalog>,
    source: &str,
    options: &Options,
) -> Vec<Diagnostic> {
    match validate(catalog, source, options) {
        Err(ValidateError::Semantic(err)) => {
            assert_eq!(err.summary, "gql: semantic analysis failed");
            err.diagnostics
        }
        Err(other) => panic!("expected semantic failure, got {other}"),
        Ok(output) => panic!("expected semantic failure, got {} statement(s)", output.len()),
    }
}

/// Returns the code of every diagnostic, in order.
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.code.as_str()).collect()
}
